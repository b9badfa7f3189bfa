//! Formatted terminal output.
//!
//! Everything returns a `String` so the CLI can print it and the TUI can put it
//! in a paragraph widget.

use chrono::NaiveDate;

use crate::app::pipeline::{Comparison, Evaluation};
use crate::domain::{HouseholdResult, SubCategory, WagePair};
use crate::report::{format_age, format_currency, format_factor, format_percent};

/// Message shown instead of results when no child can be costed.
pub const NO_CHILDREN_WARNING: &str = "Enter at least one child age.";

/// Reference data behind a calculation.
pub fn format_reference_data(
    price_level: f64,
    price_period: Option<NaiveDate>,
    wages: &WagePair,
    canasta_period: Option<NaiveDate>,
) -> String {
    let mut out = String::new();

    out.push_str("=== Reference data ===\n");
    let period = price_period
        .map(|p| p.format("%Y-%m").to_string())
        .unwrap_or_else(|| "supplied".to_string());
    out.push_str(&format!(
        "Basic food basket (adult equivalent): {} [{period}]\n",
        format_currency(price_level)
    ));
    out.push_str(&format!(
        "Care wage, hourly (< 24 h/week):     {}\n",
        format_currency(wages.hourly)
    ));
    out.push_str(&format!(
        "Care wage, hourly (>= 24 h/week):    {}  (monthly {} / 183 h)\n",
        format_currency(wages.full_time_rate()),
        format_currency(wages.monthly)
    ));
    if let Some(p) = canasta_period {
        out.push_str(&format!("Childcare cost series: latest period {}\n", p.format("%Y-%m")));
    }

    out
}

/// Per-child detail table followed by the household total row.
pub fn format_household(household: &HouseholdResult) -> String {
    let mut out = String::new();

    push_row(
        &mut out,
        format!(
            "{:<5} {:<15} {:>12} {:>12} {:>12} {:>6} {:>12}",
            "age", "band", "goods", "care time", "unscaled", "factor", "scaled"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<5} {:-<15} {:-<12} {:-<12} {:-<12} {:-<6} {:-<12}",
            "", "", "", "", "", "", ""
        ),
    );

    for c in &household.children {
        push_row(
            &mut out,
            format!(
                "{:<5} {:<15} {:>12} {:>12} {:>12} {:>6} {:>12}",
                format_age(c.age),
                c.band.label(),
                format_currency(c.goods),
                format_currency(c.care_time),
                format_currency(c.unscaled_total),
                format_factor(c.scale_factor),
                format_currency(c.scaled_cost),
            ),
        );
    }

    let totals = household.column_totals();
    push_row(
        &mut out,
        format!(
            "{:<5} {:<15} {:>12} {:>12} {:>12} {:>6} {:>12}",
            "",
            "Household total",
            format_currency(totals.goods),
            format_currency(totals.care_time),
            format_currency(totals.total),
            "",
            format_currency(household.total),
        ),
    );

    out
}

/// Comparison tables: the total always, goods and care time when `breakdown` is set.
pub fn format_comparison(comparison: &Comparison, breakdown: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Comparison with the external childcare-cost series ({}) ===\n",
        comparison.period.format("%Y-%m")
    ));
    out.push_str("Only bands present in the household are shown; internal figures are for one child, unscaled.\n");

    let subs: &[SubCategory] = if breakdown {
        &[SubCategory::Total, SubCategory::Goods, SubCategory::CareTime]
    } else {
        &[SubCategory::Total]
    };
    for &sub in subs {
        out.push('\n');
        out.push_str(&format!("{}:\n", sub.display_name()));
        out.push_str(&comparison_table(comparison, sub));
    }

    out
}

fn comparison_table(comparison: &Comparison, sub: SubCategory) -> String {
    let mut out = String::new();

    push_row(
        &mut out,
        format!(
            "{:<30} {:>12} {:>12} {:>12} {:>8}",
            "band", "external", "internal", "difference", "diff %"
        ),
    );
    push_row(
        &mut out,
        format!("{:-<30} {:-<12} {:-<12} {:-<12} {:-<8}", "", "", "", "", ""),
    );

    for row in &comparison.rows {
        let diff = row.difference(sub);
        push_row(
            &mut out,
            format!(
                "{:<30} {:>12} {:>12} {:>12} {:>8}",
                row.label(),
                row.external_value(sub).map(format_currency).unwrap_or_default(),
                format_currency(row.internal_value(sub)),
                diff.map(|d| format_currency(d.absolute)).unwrap_or_default(),
                diff.and_then(|d| d.percent).map(format_percent).unwrap_or_default(),
            ),
        );
    }

    out
}

/// Full report for one evaluation.
pub fn format_evaluation(eval: &Evaluation, breakdown: bool) -> String {
    let mut out = String::new();

    out.push_str(&format_reference_data(
        eval.price_level,
        eval.price_period,
        &eval.wages,
        eval.comparison.as_ref().map(|c| c.period),
    ));
    out.push('\n');

    if eval.household.is_empty() {
        out.push_str(NO_CHILDREN_WARNING);
        out.push('\n');
        return out;
    }

    out.push_str(&format!(
        "Monthly household cost: {}\n\n",
        format_currency(eval.household.total)
    ));
    out.push_str(&format_household(&eval.household));
    out.push_str("The costliest child counts in full; the next one at 0,7 and every further child at 0,5.\n");

    if let Some(comparison) = &eval.comparison {
        out.push('\n');
        out.push_str(&format_comparison(comparison, breakdown));
    }

    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}
