//! Delimited-text loading into a plain header + rows table.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// A table of string cells with a single header row.
///
/// `headers` are normalized and data rows are padded or truncated to the
/// header width, with blank rows dropped. `raw_headers` and `raw_rows` keep
/// the header row and every following row exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub raw_headers: Vec<String>,
    pub raw_rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Build a table from raw rows, using the first non-blank row as header.
    pub fn from_raw_rows(raw_rows: Vec<Vec<String>>) -> Self {
        let mut raw = raw_rows
            .into_iter()
            .skip_while(|row| row.iter().all(|value| value.trim().is_empty()));
        let Some(raw_headers) = raw.next() else {
            return Self::default();
        };
        let raw_rows: Vec<Vec<String>> = raw.collect();
        let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
        let width = headers.len();
        let rows = raw_rows
            .iter()
            .filter(|row| row.iter().any(|value| !value.trim().is_empty()))
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            headers,
            rows,
            raw_headers,
            raw_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trim, drop a UTF-8 byte-order mark and collapse inner whitespace runs.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

pub fn read_csv_table(path: &Path) -> Result<SourceTable> {
    let csv_error = |source: csv::Error| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    // Byte records tolerate stray non-UTF-8 bytes in exported extracts.
    for record in reader.byte_records() {
        let record = record.map_err(csv_error)?;
        let row = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        raw_rows.push(row);
    }
    Ok(SourceTable::from_raw_rows(raw_rows))
}
