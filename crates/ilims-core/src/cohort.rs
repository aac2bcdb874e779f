//! Cohort filters over the classified, enriched order table.

use chrono::NaiveDateTime;
use ilims_model::{
    AccessionStatus, BusinessCategory, ClassifiedOrder, Cohort, CohortKind, Cohorts, ReportConfig,
};
use tracing::debug;

use crate::dedupe::dedupe_by_key;

/// Eligible for every cohort: dated on or before the cutoff, `Service`
/// business, billable payment type.
fn is_cleaned(row: &ClassifiedOrder, config: &ReportConfig) -> bool {
    row.order_date.is_some_and(|date| date <= config.cutoff)
        && row.business_normalized == BusinessCategory::Service.as_str()
        && row.payment_type.is_eligible()
}

/// Ordered in the reporting month, on or before the cutoff.
fn in_reporting_month(date: Option<NaiveDateTime>, config: &ReportConfig) -> bool {
    date.is_some_and(|date| config.period.contains(date) && date <= config.cutoff)
}

/// Ordered between the start of the month and the end of the day before `as_of`.
fn in_ordered_window(date: Option<NaiveDateTime>, config: &ReportConfig) -> bool {
    date.is_some_and(|date| {
        date >= config.period.start() && date <= config.ordered_window_end()
    })
}

fn subset<F>(kind: CohortKind, cleaned: &Cohort, keep: F) -> Cohort
where
    F: Fn(&ClassifiedOrder) -> bool,
{
    Cohort::new(kind, cleaned.iter().filter(|row| keep(row)).cloned().collect())
}

/// Derive every cohort. Rows are deduplicated on their full source row
/// once, in Cleaned; every other cohort is a subset of it.
pub fn build_cohorts(orders: &[ClassifiedOrder], config: &ReportConfig) -> Cohorts {
    let eligible: Vec<ClassifiedOrder> = orders
        .iter()
        .filter(|row| is_cleaned(row, config))
        .cloned()
        .collect();
    let cleaned = Cohort::new(
        CohortKind::Cleaned,
        dedupe_by_key(eligible, |row| row.order.cells.clone()),
    );

    let accessioned = Cohort::new(
        CohortKind::Accessioned,
        cleaned
            .iter()
            .filter(|row| {
                row.accession_status == AccessionStatus::Accessioned
                    && in_reporting_month(row.order_date, config)
            })
            .map(|row| ClassifiedOrder {
                final_date: row.accession_date.or(row.order_date),
                ..row.clone()
            })
            .collect(),
    );
    let ordered = subset(CohortKind::Ordered, &cleaned, |row| {
        row.accession_status.is_pending() && in_ordered_window(row.order_date, config)
    });
    let problem_case = subset(CohortKind::ProblemCase, &cleaned, |row| {
        row.accession_status == AccessionStatus::ProblemCase
            && in_reporting_month(row.order_date, config)
    });
    let on_hold = subset(CohortKind::OnHold, &cleaned, |row| {
        row.accession_status == AccessionStatus::OnHold
            && in_reporting_month(row.order_date, config)
    });

    let cohorts = Cohorts {
        cleaned,
        accessioned,
        ordered,
        problem_case,
        on_hold,
    };
    for cohort in cohorts.iter() {
        debug!(
            cohort = cohort.kind().label(),
            rows = cohort.len(),
            patients = cohort.distinct_patients().len(),
            "cohort built"
        );
    }
    cohorts
}
