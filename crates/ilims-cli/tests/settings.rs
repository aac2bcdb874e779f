//! Settings precedence with a real config file.

use std::io::Write;

use chrono::NaiveDate;
use ilims_cli::settings::{ReportOverrides, load_optional_config, resolve_report_config};
use ilims_model::ConfigError;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[period]
month = 11
year = 2025
cutoff = "2025-11-12"
as_of = "2025-11-20"

[rules]
bot_account = "robot@lab.example"

[reconciliation]
cancelled_patients = ["A. Sharma", "B. Rao"]
"#;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
}

#[test]
fn file_values_fill_in_when_flags_are_absent() {
    let file = config_file(CONFIG);
    let loaded = load_optional_config(Some(file.path())).unwrap();
    let config = resolve_report_config(&ReportOverrides::default(), &loaded, today()).unwrap();

    assert_eq!(config.period.month(), 11);
    assert_eq!(config.period.year(), 2025);
    assert_eq!(config.cutoff.to_string(), "2025-11-12 23:59:59");
    assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
    assert_eq!(config.rules.bot_account, "robot@lab.example");
    assert!(config.rules.is_international("Egypt"));
    assert_eq!(config.cancelled_patients, vec!["A. Sharma", "B. Rao"]);
}

#[test]
fn flags_win_over_the_file() {
    let file = config_file(CONFIG);
    let loaded = load_optional_config(Some(file.path())).unwrap();
    let overrides = ReportOverrides {
        month: Some(12),
        cutoff: Some("2025-12-05 18:00".to_string()),
        as_of: Some("2025-12-08".to_string()),
        cancelled_patients: vec!["C. Iyer".to_string()],
        ..ReportOverrides::default()
    };
    let config = resolve_report_config(&overrides, &loaded, today()).unwrap();

    assert_eq!(config.period.month(), 12);
    assert_eq!(config.period.year(), 2025);
    assert_eq!(config.cutoff.to_string(), "2025-12-05 18:00:00");
    assert_eq!(config.ordered_window_end().to_string(), "2025-12-07 23:59:59");
    assert_eq!(config.cancelled_patients, vec!["C. Iyer"]);
}

#[test]
fn invalid_values_are_config_errors() {
    let overrides = ReportOverrides {
        month: Some(13),
        year: Some(2025),
        ..ReportOverrides::default()
    };
    let error = resolve_report_config(&overrides, &Default::default(), today()).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidMonth { month: 13 }));

    let overrides = ReportOverrides {
        month: Some(12),
        year: Some(2025),
        cutoff: Some("2025-11-30 10:00".to_string()),
        ..ReportOverrides::default()
    };
    let error = resolve_report_config(&overrides, &Default::default(), today()).unwrap_err();
    assert!(matches!(error, ConfigError::CutoffBeforePeriod { .. }));

    let overrides = ReportOverrides {
        month: Some(12),
        year: Some(2025),
        as_of: Some("08/12/2025".to_string()),
        ..ReportOverrides::default()
    };
    let error = resolve_report_config(&overrides, &Default::default(), today()).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidTimestamp { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let file = config_file("[period]\nmonht = 12\n");
    let error = load_optional_config(Some(file.path())).unwrap_err();
    assert!(matches!(error, ConfigError::Toml { .. }));
}
