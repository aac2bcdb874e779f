//! Report settings: command-line values over the TOML file over defaults.

use std::path::Path;

use chrono::NaiveDate;
use ilims_model::{
    ConfigError, ConfigFile, ReportConfig, ReportingPeriod, load_config_file, parse_as_of,
    parse_cutoff,
};

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub cutoff: Option<String>,
    pub as_of: Option<String>,
    /// Replaces the file's list when non-empty.
    pub cancelled_patients: Vec<String>,
}

pub fn load_optional_config(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match path {
        Some(path) => load_config_file(path),
        None => Ok(ConfigFile::default()),
    }
}

/// Merge overrides and file values into a validated configuration.
///
/// `today` is only used when neither source names an as-of date.
pub fn resolve_report_config(
    overrides: &ReportOverrides,
    file: &ConfigFile,
    today: NaiveDate,
) -> Result<ReportConfig, ConfigError> {
    let month = overrides
        .month
        .or(file.period.month)
        .ok_or(ConfigError::Missing { field: "month" })?;
    let year = overrides
        .year
        .or(file.period.year)
        .ok_or(ConfigError::Missing { field: "year" })?;
    let period = ReportingPeriod::new(month, year)?;

    let as_of = match overrides.as_of.as_deref().or(file.period.as_of.as_deref()) {
        Some(value) => parse_as_of(value)?,
        None => today,
    };
    let mut config = ReportConfig::new(period, as_of).with_rules(file.rules.clone());
    if let Some(cutoff) = overrides.cutoff.as_deref().or(file.period.cutoff.as_deref()) {
        config = config.with_cutoff(parse_cutoff(cutoff)?)?;
    }

    let cancelled = if overrides.cancelled_patients.is_empty() {
        file.reconciliation.cancelled_patients.clone()
    } else {
        overrides.cancelled_patients.clone()
    };
    Ok(config.with_cancelled_patients(cancelled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 12).unwrap()
    }

    #[test]
    fn month_and_year_are_required() {
        let error = resolve_report_config(
            &ReportOverrides::default(),
            &ConfigFile::default(),
            today(),
        )
        .unwrap_err();
        assert!(matches!(error, ConfigError::Missing { field: "month" }));
    }

    #[test]
    fn as_of_defaults_to_today() {
        let overrides = ReportOverrides {
            month: Some(12),
            year: Some(2025),
            ..ReportOverrides::default()
        };
        let config = resolve_report_config(&overrides, &ConfigFile::default(), today()).unwrap();
        assert_eq!(config.as_of, today());
        assert_eq!(config.cutoff, config.period.default_cutoff());
        assert!(config.cancelled_patients.is_empty());
    }
}
