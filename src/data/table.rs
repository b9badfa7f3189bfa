//! Untyped tabular data as read from the published spreadsheets.
//!
//! Both the `.xls`/`.xlsx` series and CSV fixtures are loaded into the same
//! `RawTable` so the normalizers never care where the cells came from. Cell
//! positions are absolute: a sheet whose used range starts below or right of
//! `A1` is padded with empty cells, so fixed row offsets keep their meaning.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() { Cell::Empty } else { Cell::Text(s) }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text rendering used for header labels and month names.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Date(dt) => dt.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric coercion: numbers pass through, text is parsed, anything else is
    /// missing.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Date(_) => return None,
        };
        if v.is_finite() { Some(v) } else { None }
    }
}

/// Rows of cells, ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for fixtures: empty strings become empty cells,
    /// everything else is text.
    pub fn from_strings(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|s| Cell::text(*s)).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at `(row, col)`; out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Read the first sheet of an `.xls`, `.xlsx` or `.ods` workbook.
    pub fn from_spreadsheet(bytes: &[u8]) -> Result<Self, AppError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| AppError::fetch(format!("Failed to open spreadsheet: {e}")))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::schema_drift("Spreadsheet has no sheets."))?
            .map_err(|e| AppError::fetch(format!("Failed to read first sheet: {e}")))?;

        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row0 as usize];
        for r in range.rows() {
            let mut row = vec![Cell::Empty; col0 as usize];
            row.extend(r.iter().map(cell_from_data));
            rows.push(row);
        }

        Ok(Self::new(rows))
    }

    /// Read a headerless CSV; every non-blank field is kept as text.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| AppError::fetch(format!("CSV parse error on line {}: {e}", idx + 1)))?;
            rows.push(record.iter().map(|field| Cell::text(field.trim_start_matches('\u{feff}'))).collect());
        }

        Ok(Self::new(rows))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Date(value),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => Cell::Date(value),
            None => Cell::text(s.clone()),
        },
        Data::DurationIso(s) => Cell::text(s.clone()),
        _ => Cell::Empty,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
