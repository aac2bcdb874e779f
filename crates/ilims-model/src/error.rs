use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("reporting month must be between 1 and 12, got {month}")]
    InvalidMonth { month: u32 },

    #[error("reporting year {year} is out of range")]
    InvalidYear { year: i32 },

    #[error("invalid {field} '{value}': expected {expected}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("cutoff {cutoff} precedes the start of the reporting period ({start})")]
    CutoffBeforePeriod {
        cutoff: NaiveDateTime,
        start: NaiveDateTime,
    },

    #[error("missing {field}: pass it on the command line or set it in the config file")]
    Missing { field: &'static str },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
