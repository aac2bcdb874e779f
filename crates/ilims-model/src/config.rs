//! Reporting period, rule literals and the optional TOML configuration file.

use std::path::Path;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Day of the reporting month whose last second is the default cutoff.
pub const DEFAULT_CUTOFF_DAY: u64 = 9;

const CUTOFF_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Last second (23:59:59) of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default()) + TimeDelta::seconds(86_399)
}

/// Calendar month the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    month: u32,
    year: i32,
    #[serde(skip)]
    first_day: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ConfigError::InvalidMonth { month });
        }
        let first_day =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(ConfigError::InvalidYear { year })?;
        // Leaves room for the cutoff day and the end-of-day arithmetic.
        if first_day.checked_add_days(Days::new(31)).is_none() {
            return Err(ConfigError::InvalidYear { year });
        }
        Ok(Self {
            month,
            year,
            first_day,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Midnight on the first day of the month.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::default())
    }

    /// 23:59:59 on the 9th of the month.
    pub fn default_cutoff(&self) -> NaiveDateTime {
        end_of_day(self.first_day + Days::new(DEFAULT_CUTOFF_DAY - 1))
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp.year() == self.year && timestamp.month() == self.month
    }

    /// Short label such as `Dec2025`, used in the output file name.
    pub fn label(&self) -> String {
        self.first_day.format("%b%Y").to_string()
    }
}

/// Literal lists driving the business-category rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationRules {
    /// Country names treated as international markets, including the
    /// misspellings and mis-encodings seen in the extract.
    pub international_countries: Vec<String>,
    /// Staff allowed to raise free-of-charge orders outside the service line.
    pub foc_authorized_staff: Vec<String>,
    pub excluded_facility: String,
    pub bot_account: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            international_countries: [
                "Egypt",
                "Turkey",
                "Nepal",
                "Malyasia",
                "Uzbekistan",
                "Malaysia",
                "Jordan",
                "Türkiye",
                "TÃ¼rkiye",
                "EGYPT",
                "EGPYT",
                "UAE",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            foc_authorized_staff: [
                "sharmada.wagle@onecelldx.com",
                "priti.thate@onecelldx.com",
                "rajarshi.bhattacharjee@onecelldx.com",
                "navya.nandiraju@onecelldx.com",
                "snehal.kathwate@onecelldx.com",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            excluded_facility: "Cancer institute W.I.A".to_string(),
            bot_account: "indx2.bot@indx.ai".to_string(),
        }
    }
}

impl ClassificationRules {
    pub fn is_international(&self, country: &str) -> bool {
        self.international_countries.iter().any(|c| c == country)
    }

    pub fn is_foc_authorized(&self, creator: &str) -> bool {
        self.foc_authorized_staff.iter().any(|s| s == creator)
    }

    pub fn is_excluded_facility(&self, facility: &str) -> bool {
        self.excluded_facility == facility
    }

    pub fn is_bot(&self, creator: &str) -> bool {
        self.bot_account == creator
    }
}

/// Everything one report run needs besides the input files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    pub period: ReportingPeriod,
    /// Latest order creation time eligible for this run.
    pub cutoff: NaiveDateTime,
    /// Execution date; the Ordered window ends at the close of the day before.
    pub as_of: NaiveDate,
    pub rules: ClassificationRules,
    pub cancelled_patients: Vec<String>,
}

impl ReportConfig {
    pub fn new(period: ReportingPeriod, as_of: NaiveDate) -> Self {
        Self {
            period,
            cutoff: period.default_cutoff(),
            as_of,
            rules: ClassificationRules::default(),
            cancelled_patients: Vec::new(),
        }
    }

    pub fn with_cutoff(mut self, cutoff: NaiveDateTime) -> Result<Self> {
        let start = self.period.start();
        if cutoff < start {
            return Err(ConfigError::CutoffBeforePeriod { cutoff, start });
        }
        self.cutoff = cutoff;
        Ok(self)
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ClassificationRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_cancelled_patients(mut self, patients: Vec<String>) -> Self {
        self.cancelled_patients = patients;
        self
    }

    /// 23:59:59 on the day before `as_of`.
    pub fn ordered_window_end(&self) -> NaiveDateTime {
        end_of_day(self.as_of) - TimeDelta::days(1)
    }
}

/// Parse a cutoff timestamp; a bare date means the end of that day.
pub fn parse_cutoff(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    for format in CUTOFF_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(end_of_day(date));
    }
    Err(ConfigError::InvalidTimestamp {
        field: "cutoff",
        value: value.to_string(),
        expected: "YYYY-MM-DD [HH:MM[:SS]]",
    })
}

pub fn parse_as_of(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigError::InvalidTimestamp {
            field: "as-of date",
            value: value.to_string(),
            expected: "YYYY-MM-DD",
        }
    })
}

/// `[period]` table of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeriodSection {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub cutoff: Option<String>,
    pub as_of: Option<String>,
}

/// `[reconciliation]` table of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconciliationSection {
    pub cancelled_patients: Vec<String>,
}

/// On-disk configuration. Every field is optional; omitted rule lists
/// fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub period: PeriodSection,
    pub rules: ClassificationRules,
    pub reconciliation: ReconciliationSection,
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn default_cutoff_is_ninth_at_end_of_day() {
        let period = ReportingPeriod::new(12, 2025).unwrap();
        assert_eq!(period.default_cutoff(), ts("2025-12-09 23:59:59"));
        assert_eq!(period.start(), ts("2025-12-01 00:00:00"));
        assert_eq!(period.label(), "Dec2025");
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(matches!(
            ReportingPeriod::new(13, 2025),
            Err(ConfigError::InvalidMonth { month: 13 })
        ));
        assert!(ReportingPeriod::new(0, 2025).is_err());
    }

    #[test]
    fn ordered_window_ends_yesterday() {
        let period = ReportingPeriod::new(12, 2025).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let config = ReportConfig::new(period, as_of);
        assert_eq!(config.ordered_window_end(), ts("2025-12-15 23:59:59"));
    }

    #[test]
    fn cutoff_must_not_precede_period() {
        let period = ReportingPeriod::new(12, 2025).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let result = ReportConfig::new(period, as_of).with_cutoff(ts("2025-11-30 10:00:00"));
        assert!(matches!(result, Err(ConfigError::CutoffBeforePeriod { .. })));
    }

    #[test]
    fn parses_cutoff_shapes() {
        assert_eq!(parse_cutoff("2025-12-09").unwrap(), ts("2025-12-09 23:59:59"));
        assert_eq!(
            parse_cutoff("2025-12-09 18:30").unwrap(),
            ts("2025-12-09 18:30:00")
        );
        assert_eq!(
            parse_cutoff("2025-12-09T18:30:05").unwrap(),
            ts("2025-12-09 18:30:05")
        );
        assert!(parse_cutoff("09/12/2025").is_err());
    }

    #[test]
    fn config_file_overrides_only_given_rules() {
        let parsed: ConfigFile = toml::from_str(
            r#"
[period]
month = 11
year = 2025

[rules]
bot_account = "bot@lab.example"

[reconciliation]
cancelled_patients = ["R. Iyer"]
"#,
        )
        .unwrap();
        assert_eq!(parsed.period.month, Some(11));
        assert_eq!(parsed.rules.bot_account, "bot@lab.example");
        assert_eq!(
            parsed.rules.excluded_facility,
            ClassificationRules::default().excluded_facility
        );
        assert_eq!(parsed.reconciliation.cancelled_patients, vec!["R. Iyer"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("[period]\nmonthh = 3\n");
        assert!(result.is_err());
    }
}
