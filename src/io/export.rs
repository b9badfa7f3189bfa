//! Export the per-child detail to CSV.
//!
//! Plain numbers (no thousands separators) so spreadsheets read them as numbers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::HouseholdResult;
use crate::error::AppError;

/// Write the household detail, one row per child plus a `total` row, to a CSV file.
pub fn write_household_csv(path: &Path, household: &HouseholdResult) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_household_rows(&mut file, household)?;
    info!(path = %path.display(), rows = household.children.len(), "household CSV written");
    Ok(())
}

pub fn write_household_rows<W: Write>(out: &mut W, household: &HouseholdResult) -> Result<(), AppError> {
    writeln!(out, "age,band,goods,care_time,unscaled_total,scale_factor,scaled_cost")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for c in &household.children {
        writeln!(
            out,
            "{},{},{:.0},{:.0},{:.0},{:.1},{:.0}",
            c.age,
            c.band.label(),
            c.goods,
            c.care_time,
            c.unscaled_total,
            c.scale_factor,
            c.scaled_cost,
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    let totals = household.column_totals();
    writeln!(
        out,
        ",total,{:.0},{:.0},{:.0},,{:.0}",
        totals.goods, totals.care_time, totals.total, household.total
    )
    .map_err(|e| AppError::io(format!("Failed to write export CSV total row: {e}")))?;

    Ok(())
}
