//! Basic-food-basket (price level) series.
//!
//! First sheet, five leading rows skipped, one header row, then period in the
//! first column and the adult-equivalent value in the second.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::data::table::{Cell, RawTable};
use crate::domain::ReferencePriceLevel;
use crate::error::AppError;

/// Leading rows skipped before the header row.
pub const SKIP_ROWS: usize = 5;

/// Latest (period, value) pair of the series.
pub fn latest_price_level(table: &RawTable) -> Result<ReferencePriceLevel, AppError> {
    let first_data_row = SKIP_ROWS + 1;

    let mut rows: Vec<ReferencePriceLevel> = (first_data_row..table.len())
        .filter_map(|r| {
            let period = parse_period(table.cell(r, 0))?;
            let value = table.cell(r, 1).as_number()?;
            Some(ReferencePriceLevel { period, value })
        })
        .collect();

    rows.sort_by_key(|r| r.period);
    rows.pop().ok_or_else(|| {
        AppError::empty_after_cleaning(
            "Price-level series: no rows with both a period and a value (the source format changed).",
        )
    })
}

/// Period cell to a date.
///
/// Accepts spreadsheet dates, Excel serial numbers and a few text layouts.
pub fn parse_period(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(dt) => Some(dt.date()),
        Cell::Number(serial) => excel_serial_date(*serial),
        Cell::Text(s) => parse_period_text(s),
        Cell::Empty => None,
    }
}

fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    // Serials below 1 are times of day, not dates.
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

fn parse_period_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    // Month-only periods (`2025-06`, `06/2025`) mean the first of the month.
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("01/{s}"), "%d/%m/%Y"))
        .ok()
}
