//! Shared evaluation logic used by both CLI and TUI front-ends.
//!
//! reference data (cached) -> household cost -> optional comparison
//!
//! The front-ends only collect inputs and present the `Evaluation`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compare::build_comparison;
use crate::cost::compute_household;
use crate::data::{DataSource, ReferenceStore, SourceId};
use crate::domain::{AgeBand, ComparisonRow, CostParams, HouseholdResult, MAX_CHILDREN, WagePair};
use crate::error::AppError;

/// Inputs of one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub ages: Vec<f64>,
    pub params: CostParams,
    /// Price level to use instead of the published series.
    pub price_level_override: Option<f64>,
    /// Wages to use instead of the published scale.
    pub wage_override: Option<WagePair>,
    /// Build the comparison against the external childcare-cost series.
    pub compare: bool,
}

impl Default for EvaluationRequest {
    fn default() -> Self {
        Self {
            ages: Vec::new(),
            params: CostParams::default(),
            price_level_override: None,
            wage_override: None,
            compare: true,
        }
    }
}

/// Comparison rows with the period of the external series they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub period: NaiveDate,
    pub rows: Vec<ComparisonRow>,
}

/// Everything one calculation produced, including the reference data it used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ages: Vec<f64>,
    pub params: CostParams,
    pub price_level: f64,
    /// `None` when the price level was supplied directly.
    pub price_period: Option<NaiveDate>,
    pub wages: WagePair,
    pub full_time_rate: f64,
    pub household: HouseholdResult,
    pub comparison: Option<Comparison>,
}

/// Reject more children than the form allows.
///
/// Ages without a band are not an error: they are skipped by the cost model
/// and logged here.
pub fn validate_ages(ages: &[f64]) -> Result<(), AppError> {
    if ages.len() > MAX_CHILDREN {
        return Err(AppError::usage(format!(
            "At most {MAX_CHILDREN} children are supported, got {}.",
            ages.len()
        )));
    }
    for age in ages.iter().filter(|a| AgeBand::classify(**a).is_none()) {
        warn!(age, "age outside 0-17 is not costed");
    }
    Ok(())
}

/// Run one calculation.
///
/// The childcare-cost series is only loaded when there is something to
/// compare: a non-empty household with comparison enabled.
pub fn evaluate<S: DataSource>(
    store: &mut ReferenceStore<S>,
    request: &EvaluationRequest,
) -> Result<Evaluation, AppError> {
    validate_ages(&request.ages)?;

    let (price_level, price_period) = match request.price_level_override {
        Some(value) => (value, None),
        None => {
            let level = store.price_level()?;
            (level.value, Some(level.period))
        }
    };
    let wages = match request.wage_override {
        Some(wages) => wages,
        None => store.wage()?,
    };

    let household = compute_household(&request.ages, price_level, &wages, &request.params);
    debug!(children = household.children.len(), total = household.total, "household costed");

    let comparison = if request.compare && !household.is_empty() {
        let reference = store.canasta()?;
        let rows = build_comparison(&request.ages, price_level, &wages, &request.params, &reference);
        Some(Comparison {
            period: reference.period,
            rows,
        })
    } else {
        None
    };

    info!(
        children = household.children.len(),
        cached_canasta = store.is_cached(SourceId::Canasta),
        "evaluation complete"
    );

    Ok(Evaluation {
        ages: request.ages.clone(),
        params: request.params,
        price_level,
        price_period,
        full_time_rate: wages.full_time_rate(),
        wages,
        household,
        comparison,
    })
}
