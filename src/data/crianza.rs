//! Childcare-cost series normalization.
//!
//! The published sheet has a two-row header (age band on top, sub-category
//! below, band labels merged across their sub-columns), a year column that is
//! only filled on the first month of each year, and Spanish month names.
//! This module turns it into the single latest `ReferenceCrianzaRow`:
//!
//! 1. flatten the header rows into one label per column
//! 2. resolve every (band, sub-category) column from its token set, failing
//!    loudly on the first one that is missing
//! 3. forward-fill the year, resolve the month, build the period
//! 4. coerce the resolved columns to numbers and drop incomplete rows
//! 5. keep the most recent row

use chrono::NaiveDate;

use crate::data::table::{Cell, RawTable};
use crate::domain::{BandTriple, ReferenceBand, ReferenceCrianzaRow, SubCategory};
use crate::error::AppError;

/// Absolute (0-based) rows holding the multi-level header of the published sheet.
pub const HEADER_ROWS: [usize; 2] = [3, 4];

const YEAR_COL: usize = 0;
const MONTH_COL: usize = 1;
/// First column searched for band/sub-category labels.
const FIRST_VALUE_COL: usize = 2;

/// Where the header sits inside the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// Absolute header row indices, top level first. Data starts on the row after
    /// the last one.
    pub header_rows: Vec<usize>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: HEADER_ROWS.to_vec(),
        }
    }
}

impl SheetLayout {
    fn data_start(&self) -> usize {
        self.header_rows.iter().max().map(|r| r + 1).unwrap_or(0)
    }
}

/// Resolved column index per (band, sub-category).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [[usize; 3]; 4],
}

impl ColumnMap {
    pub fn column(&self, band: ReferenceBand, sub: SubCategory) -> usize {
        self.columns[band_index(band)][sub_index(sub)]
    }
}

fn band_index(band: ReferenceBand) -> usize {
    match band {
        ReferenceBand::Under1 => 0,
        ReferenceBand::From1To3 => 1,
        ReferenceBand::From4To5 => 2,
        ReferenceBand::From6To12 => 3,
    }
}

fn sub_index(sub: SubCategory) -> usize {
    match sub {
        SubCategory::Goods => 0,
        SubCategory::CareTime => 1,
        SubCategory::Total => 2,
    }
}

/// Normalize the published sheet with its default layout.
pub fn latest_canasta(table: &RawTable) -> Result<ReferenceCrianzaRow, AppError> {
    latest_canasta_with_layout(table, &SheetLayout::default())
}

pub fn latest_canasta_with_layout(table: &RawTable, layout: &SheetLayout) -> Result<ReferenceCrianzaRow, AppError> {
    if layout.header_rows.is_empty() || table.len() <= layout.header_rows.iter().copied().max().unwrap_or(0) {
        return Err(AppError::schema_drift(format!(
            "Childcare-cost series: sheet has {} rows, expected a header on rows {:?}.",
            table.len(),
            layout.header_rows
        )));
    }

    let labels = flatten_headers(table, &layout.header_rows);
    let columns = resolve_columns(&labels)?;

    let data_rows = layout.data_start().min(table.len())..table.len();
    let years = forward_fill_years(data_rows.clone().map(|r| table.cell(r, YEAR_COL)));

    let mut parsed: Vec<ReferenceCrianzaRow> = Vec::new();
    for (r, year) in data_rows.zip(years) {
        let row = &table.rows()[r];
        let month = month_number(&table.cell(r, MONTH_COL).as_text());
        let Some(period) = period_from(year, month) else {
            continue;
        };
        if let Some(values) = row_values(row, &columns, period) {
            parsed.push(values);
        }
    }

    // Stable sort: for duplicated periods the row published last wins.
    parsed.sort_by_key(|r| r.period);
    parsed.pop().ok_or_else(|| {
        AppError::empty_after_cleaning(
            "Childcare-cost series: no usable rows after cleaning (the source format or headers changed).",
        )
    })
}

/// Join the header rows into one descriptive label per column.
///
/// Upper rows are forward-filled across columns first: a merged band label only
/// carries its text in the first cell. Placeholder segments are skipped and the
/// rest joined with `" | "`.
pub fn flatten_headers(table: &RawTable, header_rows: &[usize]) -> Vec<String> {
    let width = table.width();
    let last = header_rows.len().saturating_sub(1);

    let mut levels: Vec<Vec<String>> = Vec::with_capacity(header_rows.len());
    for (level, &row) in header_rows.iter().enumerate() {
        let mut values = Vec::with_capacity(width);
        let mut carry = String::new();
        for col in 0..width {
            let text = table.cell(row, col).as_text().trim().to_string();
            if is_placeholder(&text) {
                values.push(if level < last { carry.clone() } else { String::new() });
            } else {
                carry = text.clone();
                values.push(text);
            }
        }
        levels.push(values);
    }

    (0..width)
        .map(|col| {
            let parts: Vec<&str> = levels
                .iter()
                .map(|values| values[col].as_str())
                .filter(|s| !is_placeholder(s))
                .collect();
            parts.join(" | ")
        })
        .collect()
}

/// Empty or filler header segments.
pub fn is_placeholder(segment: &str) -> bool {
    let s = segment.trim().to_lowercase();
    s.is_empty() || s == "nan" || s == "none" || s.starts_with("unnamed:")
}

/// First column (from `from` on) whose label contains every token, case-insensitively.
pub fn find_column(labels: &[String], tokens: &[&str], from: usize) -> Option<usize> {
    labels.iter().enumerate().skip(from).find_map(|(idx, label)| {
        let label = label.to_lowercase();
        tokens
            .iter()
            .all(|t| label.contains(&t.to_lowercase()))
            .then_some(idx)
    })
}

/// Resolve every (band, sub-category) column or fail naming the missing token set.
pub fn resolve_columns(labels: &[String]) -> Result<ColumnMap, AppError> {
    let mut columns = [[0usize; 3]; 4];
    for band in ReferenceBand::ALL {
        for sub in SubCategory::ALL {
            let mut tokens: Vec<&str> = band.tokens().to_vec();
            tokens.push(sub.keyword());
            let idx = find_column(labels, &tokens, FIRST_VALUE_COL).ok_or_else(|| {
                AppError::schema_drift(format!(
                    "Childcare-cost series: no column contains all of {tokens:?}."
                ))
            })?;
            columns[band_index(band)][sub_index(sub)] = idx;
        }
    }
    Ok(ColumnMap { columns })
}

/// Numeric year per row, gaps filled with the most recent preceding year.
pub fn forward_fill_years<'a>(cells: impl Iterator<Item = &'a Cell>) -> Vec<Option<f64>> {
    let mut last = None;
    cells
        .map(|cell| {
            if let Some(year) = cell.as_number() {
                last = Some(year);
            }
            last
        })
        .collect()
}

/// Spanish month name to `1..=12`; case and surrounding whitespace are ignored.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.trim().to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

/// First day of the month, when both parts are usable.
pub fn period_from(year: Option<f64>, month: Option<u32>) -> Option<NaiveDate> {
    let year = year?;
    if year.fract() != 0.0 || !(1.0..=9999.0).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month?, 1)
}

fn row_values(row: &[Cell], columns: &ColumnMap, period: NaiveDate) -> Option<ReferenceCrianzaRow> {
    let triple = |band: ReferenceBand| -> Option<BandTriple> {
        let value = |sub: SubCategory| row.get(columns.column(band, sub)).and_then(Cell::as_number);
        Some(BandTriple {
            goods: value(SubCategory::Goods)?,
            care_time: value(SubCategory::CareTime)?,
            total: value(SubCategory::Total)?,
        })
    };

    Some(ReferenceCrianzaRow {
        period,
        under_1: triple(ReferenceBand::Under1)?,
        from_1_to_3: triple(ReferenceBand::From1To3)?,
        from_4_to_5: triple(ReferenceBand::From4To5)?,
        from_6_to_12: triple(ReferenceBand::From6To12)?,
    })
}
