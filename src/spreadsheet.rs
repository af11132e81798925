//! Reading load and carrier lists from disk into a row-oriented [`Table`].
//!
//! Excel and OpenDocument workbooks go through calamine (first worksheet
//! only); `.csv` files go through the csv crate. The first row is always
//! the header row.

use crate::errors::AppError;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s.trim()),
            Cell::Int(i) => write!(f, "{i}"),
            // weights come back from Excel as floats; 42000.0 should read 42000
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) if dt.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Error(e) => write!(f, "#{e}"),
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(v) => Cell::Float(*v),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => Cell::DateTime(dt),
                None => Cell::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(Cell::DateTime)
                .unwrap_or_else(|_| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source: String,
    headers: Vec<String>,
    /// each row with its 1-based line in the sheet
    rows: Vec<(usize, Vec<Cell>)>,
}

impl Table {
    /// Rows are taken to follow the header on row 1 with no gaps.
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| (i + 2, row))
            .collect();
        Self::with_row_numbers(source, headers, rows)
    }

    pub fn with_row_numbers(
        source: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<(usize, Vec<Cell>)>,
    ) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        // blank lines are not records, but they still count towards row numbers
        let rows = rows
            .into_iter()
            .filter(|(_, row)| !row.iter().all(Cell::is_empty))
            .collect();
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    pub fn missing_columns<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<(), AppError> {
        match self.missing_columns(names).first() {
            Some(missing) => Err(AppError::MissingColumn {
                file: self.source.clone(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Ragged rows are padded with [`Cell::Empty`].
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|(_, r)| r.get(column))
            .unwrap_or(&Cell::Empty)
    }

    pub fn cell_by_name(&self, row: usize, name: &str) -> &Cell {
        match self.column(name) {
            Some(column) => self.cell(row, column),
            None => &Cell::Empty,
        }
    }

    /// Row number as the user sees it in the spreadsheet (header is row 1).
    pub fn display_row_number(&self, row: usize) -> usize {
        self.rows.get(row).map_or(row + 2, |(line, _)| *line)
    }

    /// `Header=value` pairs for log lines.
    pub fn describe_row(&self, row: usize) -> String {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{h}={}", self.cell(row, i)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table, AppError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AppError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        other => {
            return Err(AppError::Spreadsheet(format!(
                "unsupported file type `{other}` for {}",
                path.display()
            )));
        }
    };

    tracing::debug!(
        file = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "loaded table"
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table, AppError> {
    let source = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::Spreadsheet(format!("{source}: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet(format!("{source}: workbook has no sheets")))?
        .map_err(|e| AppError::Spreadsheet(format!("{source}: {e}")))?;

    // the range begins at the first used cell, not necessarily A1
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|c| Cell::from(c).to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .enumerate()
        .map(|(i, row)| (header_line + 1 + i, row.iter().map(Cell::from).collect()))
        .collect();

    Ok(Table::with_row_numbers(source, headers, rows))
}

fn load_csv(path: &Path) -> Result<Table, AppError> {
    let source = path.display().to_string();
    let csv_error = |e: csv::Error| AppError::Spreadsheet(format!("{source}: {e}"));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        // the reader skips blank lines, so prefer its own line count
        let line = record
            .position()
            .map_or(i + 2, |pos| pos.line() as usize);
        rows.push((
            line,
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        ));
    }

    Ok(Table::with_row_numbers(source, headers, rows))
}
