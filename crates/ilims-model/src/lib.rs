pub mod category;
pub mod cohort;
pub mod config;
pub mod error;
pub mod lookup;
pub mod order;
pub mod reconciliation;

pub use category::{AccessionStatus, BusinessCategory, PaymentType};
pub use cohort::{ClassifiedOrder, Cohort, CohortKind, Cohorts};
pub use config::{
    ClassificationRules, ConfigFile, PeriodSection, ReconciliationSection, ReportConfig,
    ReportingPeriod, end_of_day, load_config_file, parse_as_of, parse_cutoff,
};
pub use error::{ConfigError, Result};
pub use lookup::{Assignment, AssignmentLookup, CaseInsensitiveSet};
pub use order::{OrderExtract, OrderRecord};
pub use reconciliation::{
    CancelledLine, PatientLine, Reconciliation, ReconciliationTotals, RepeatVisit, sum_amounts,
};
