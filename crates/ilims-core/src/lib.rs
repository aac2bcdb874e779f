//! Decision logic of the monthly order report.
//!
//! Stages run strictly forward: [`classify`] → [`enrich`] → [`cohort`] →
//! [`reconcile`]. Each stage returns a new table and never mutates its
//! input. [`pipeline::run_pipeline`] wires them together.

pub mod classify;
pub mod cohort;
pub mod datetime;
pub mod dedupe;
pub mod enrich;
pub mod pipeline;
pub mod reconcile;
pub mod redaction;
pub mod text_utils;

pub use classify::{
    BUSINESS_RULES, BusinessRule, Classification, PAYMENT_RULES, PaymentRule, business_category,
    classify, classify_orders, payment_type,
};
pub use cohort::build_cohorts;
pub use datetime::{format_report_date, parse_day_first};
pub use enrich::{EnrichmentStats, Enricher};
pub use pipeline::{PipelineOutput, run_pipeline};
pub use reconcile::reconcile;
pub use text_utils::{normalize_label, title_case};
