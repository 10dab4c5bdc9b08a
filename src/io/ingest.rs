//! CSV ingest and schema validation.
//!
//! This module turns the survey-response CSV into an in-memory `RawTable` of
//! string cells. It does no typing or recoding; that happens in `prep`.
//!
//! Failure behavior:
//! - a missing file, a permission problem or any other read failure is logged
//!   at ERROR and returned
//! - absent required columns are a hard validation error
//! - missing cells are only a warning

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, error, info, warn};

use crate::error::AppError;

/// Cell values treated as missing (the pandas `read_csv` defaults).
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when `cell` denotes a missing value.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    NA_TOKENS.contains(&cell)
}

/// The CSV as read: header names plus untyped records.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    header_map: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl RawTable {
    /// Parse a CSV stream with a header row.
    ///
    /// Short rows are accepted (their trailing cells read as missing); a row
    /// with more fields than the header is an error, as is a repeated header
    /// name. Only header names are trimmed; data cells are kept verbatim.
    pub fn from_reader<R: Read>(reader: R, path: impl Into<PathBuf>) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let header_record = reader.headers()?.clone();
        if header_record.is_empty() {
            return Err(invalid_data("No columns to parse from file"));
        }
        let headers: Vec<String> = header_record.iter().map(normalize_header_name).collect();
        let mut seen = HashSet::with_capacity(headers.len());
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(invalid_data(format!("Duplicate column name '{dup}'")));
        }

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > headers.len() {
                return Err(invalid_data(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    idx + 2,
                    record.len()
                )));
            }
            records.push(record);
        }

        Ok(Self {
            path: path.into(),
            header_map: build_header_map(&headers),
            headers,
            records,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// 1-based CSV line number of a data row (the header is line 1).
    pub fn line(&self, row: usize) -> usize {
        row + 2
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header_map.contains_key(&normalize_header_name(name))
    }

    /// Cells of a column; missing cells are `None`.
    ///
    /// Returns `None` when the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = *self.header_map.get(&normalize_header_name(name))?;
        Some(
            self.records
                .iter()
                .map(|r| r.get(idx).filter(|cell| !is_missing(cell)))
                .collect(),
        )
    }

    /// Missing-cell count per header, in header order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let n = self
                    .records
                    .iter()
                    .filter(|r| r.get(idx).is_none_or(is_missing))
                    .count();
                (name.clone(), n)
            })
            .collect()
    }
}

/// Read a CSV file into a `RawTable`, logging and returning any failure.
pub fn read_csv_file(path: &Path) -> Result<RawTable, AppError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return Err(log_read_failure(path, e)),
    };

    match RawTable::from_reader(file, path) {
        Ok(table) => {
            info!("Successfully read data from {}", path.display());
            debug!(
                rows = table.n_rows(),
                columns = table.headers.len(),
                "parsed CSV"
            );
            Ok(table)
        }
        Err(e) => {
            let err = AppError::Read {
                path: path.to_path_buf(),
                source: e,
            };
            error!("{err}");
            Err(err)
        }
    }
}

/// Check that every required column is present and warn about missing cells.
pub fn validate_data(table: &RawTable, required: &[&str]) -> Result<(), AppError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !table.has_column(col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }

    let counts = table.missing_counts();
    if counts.iter().any(|(_, n)| *n > 0) {
        warn!("Data contains missing values.");
        for (name, n) in counts.iter().filter(|(_, n)| *n > 0) {
            debug!(column = %name, missing = n, "missing cells");
        }
    }

    Ok(())
}

fn log_read_failure(path: &Path, e: io::Error) -> AppError {
    let err = match e.kind() {
        ErrorKind::NotFound => AppError::NotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => AppError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => AppError::Read {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        },
    };
    error!("{err}");
    err
}

fn invalid_data(message: impl Into<String>) -> csv::Error {
    csv::Error::from(io::Error::new(ErrorKind::InvalidData, message.into()))
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

/// Header names match exactly (case-sensitive) after BOM and whitespace stripping.
fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim_start_matches('\u{feff}').trim().to_string()
}
