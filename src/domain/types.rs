//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - computed fresh per evaluation
//! - exported to JSON/CSV
//! - injected as fixtures in tests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AgeBand, ReferenceBand};

/// Default basic-basket to full-consumption multiplier.
pub const DEFAULT_PRICE_MULTIPLIER: f64 = 3.14;

/// Default adult-equivalence scale.
pub const DEFAULT_EQUIVALENCE_ADULT: f64 = 1.7;

/// Working days per week times average days per month; divides the monthly wage
/// into a full-time-equivalent hourly rate.
pub const FULL_TIME_HOURS_DIVISOR: f64 = 6.0 * 30.5;

/// Most children the interactive form accepts.
pub const MAX_CHILDREN: usize = 10;

/// Basic-food-basket value for one adult-equivalent, with its publication period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePriceLevel {
    pub period: NaiveDate,
    pub value: f64,
}

/// Domestic care-work wages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagePair {
    pub hourly: f64,
    pub monthly: f64,
}

impl WagePair {
    /// Hourly rate derived from the monthly wage, rounded once.
    ///
    /// This is the value both the cost model and the reference summary use.
    pub fn full_time_rate(&self) -> f64 {
        crate::cost::round_currency(self.monthly / FULL_TIME_HOURS_DIVISOR)
    }
}

/// Policy constants of the cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub price_multiplier: f64,
    pub equivalence_adult: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            price_multiplier: DEFAULT_PRICE_MULTIPLIER,
            equivalence_adult: DEFAULT_EQUIVALENCE_ADULT,
        }
    }
}

/// Sub-categories of a child's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCategory {
    Goods,
    CareTime,
    Total,
}

impl SubCategory {
    pub const ALL: [SubCategory; 3] = [SubCategory::Goods, SubCategory::CareTime, SubCategory::Total];

    /// Keyword the external series uses in the column header.
    pub fn keyword(self) -> &'static str {
        match self {
            SubCategory::Goods => "bienes",
            SubCategory::CareTime => "cuidado",
            SubCategory::Total => "total",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SubCategory::Goods => "Goods & services",
            SubCategory::CareTime => "Care time",
            SubCategory::Total => "Total",
        }
    }
}

/// Goods / care-time / total values for one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTriple {
    pub goods: f64,
    pub care_time: f64,
    pub total: f64,
}

impl BandTriple {
    pub fn get(&self, sub: SubCategory) -> f64 {
        match sub {
            SubCategory::Goods => self.goods,
            SubCategory::CareTime => self.care_time,
            SubCategory::Total => self.total,
        }
    }
}

/// Unscaled cost of exactly one child in a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCost {
    pub band: AgeBand,
    pub goods: f64,
    pub care_time: f64,
    pub total: f64,
}

impl BandCost {
    pub fn triple(&self) -> BandTriple {
        BandTriple {
            goods: self.goods,
            care_time: self.care_time,
            total: self.total,
        }
    }
}

/// Cost breakdown for one child of the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCostRecord {
    pub age: f64,
    pub band: AgeBand,
    pub goods: f64,
    pub care_time: f64,
    pub unscaled_total: f64,
    pub scale_factor: f64,
    pub scaled_cost: f64,
}

/// Household cost: children ordered by descending unscaled cost, plus the sum of
/// their scaled costs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HouseholdResult {
    pub children: Vec<ChildCostRecord>,
    pub total: f64,
}

impl HouseholdResult {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Column sums used by the household total row.
    pub fn column_totals(&self) -> BandTriple {
        let mut goods = 0.0;
        let mut care_time = 0.0;
        let mut total = 0.0;
        for c in &self.children {
            goods += c.goods;
            care_time += c.care_time;
            total += c.unscaled_total;
        }
        BandTriple {
            goods,
            care_time,
            total,
        }
    }
}

/// Latest row of the external childcare-cost series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCrianzaRow {
    pub period: NaiveDate,
    pub under_1: BandTriple,
    pub from_1_to_3: BandTriple,
    pub from_4_to_5: BandTriple,
    pub from_6_to_12: BandTriple,
}

impl ReferenceCrianzaRow {
    pub fn band(&self, band: ReferenceBand) -> &BandTriple {
        match band {
            ReferenceBand::Under1 => &self.under_1,
            ReferenceBand::From1To3 => &self.from_1_to_3,
            ReferenceBand::From4To5 => &self.from_4_to_5,
            ReferenceBand::From6To12 => &self.from_6_to_12,
        }
    }
}

/// One household band side by side with its external counterpart.
///
/// `external` is `None` when the band has no counterpart in the external series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub band: AgeBand,
    pub reference_band: Option<ReferenceBand>,
    pub internal: BandTriple,
    pub external: Option<BandTriple>,
}

/// Internal minus external, absolute and relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub absolute: f64,
    /// `None` when the external value is zero.
    pub percent: Option<f64>,
}
