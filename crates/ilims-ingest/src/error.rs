#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {path} contains no worksheets")]
    NoSheets { path: PathBuf },

    #[error("{table}: missing required column '{column}' (found: {available})")]
    MissingColumn {
        table: String,
        column: String,
        available: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
