//! Spreadsheet loading through calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{IngestError, Result};
use crate::table::SourceTable;

/// Read the first worksheet of an xlsx/xls/xlsb/ods file.
pub fn read_first_sheet(path: &Path) -> Result<SourceTable> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(IngestError::NoSheets {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_error(format!("sheet '{sheet_name}': {e}")))?;
    let raw_rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(SourceTable::from_raw_rows(raw_rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) => format_numeric(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}

/// Integral floats lose their trailing `.0`; Excel stores most numbers as floats.
fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
