//! Cross-cohort matching, duplicate detection and the adjusted total.
//!
//! Patient identity is the trimmed patient name. Distinct patients who
//! share a name are indistinguishable here; blank names never match.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use ilims_model::{
    CancelledLine, ClassifiedOrder, Cohort, Cohorts, PatientLine, Reconciliation,
    ReconciliationTotals, RepeatVisit, ReportConfig, sum_amounts,
};
use tracing::debug;

use crate::dedupe::{amount_key, dedupe_by_key};

fn patient_key(row: &ClassifiedOrder) -> Option<&str> {
    let name = row.patient_name().trim();
    (!name.is_empty()).then_some(name)
}

fn patient_line(row: &ClassifiedOrder) -> PatientLine {
    PatientLine {
        patient_name: row.patient_name().to_string(),
        test_ordered: row.test_ordered().to_string(),
        amount: row.amount(),
    }
}

fn dedupe_lines(lines: Vec<PatientLine>) -> Vec<PatientLine> {
    dedupe_by_key(lines, |line| {
        (
            line.patient_name.clone(),
            line.test_ordered.clone(),
            amount_key(line.amount),
        )
    })
}

fn patients(cohort: &Cohort) -> BTreeSet<&str> {
    cohort.iter().filter_map(patient_key).collect()
}

/// Rows of every patient present in both cohorts, Accessioned rows first.
fn matched_lines(
    matched: &BTreeSet<&str>,
    accessioned: &Cohort,
    ordered: &Cohort,
) -> Vec<PatientLine> {
    let mut lines = Vec::new();
    for name in matched {
        for cohort in [accessioned, ordered] {
            lines.extend(
                cohort
                    .iter()
                    .filter(|row| patient_key(row) == Some(*name))
                    .map(patient_line),
            );
        }
    }
    dedupe_lines(lines)
}

/// Rows of patients that appear more than once within `cohort`.
pub fn duplicate_lines(cohort: &Cohort) -> Vec<PatientLine> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in cohort.iter().filter_map(patient_key) {
        *counts.entry(name).or_default() += 1;
    }
    let lines = cohort
        .iter()
        .filter(|row| patient_key(row).is_some_and(|name| counts[name] > 1))
        .map(patient_line)
        .collect();
    dedupe_lines(lines)
}

fn cancelled_lines(ordered: &Cohort, cancelled_patients: &[String]) -> Vec<CancelledLine> {
    let cancelled: HashSet<&str> = cancelled_patients
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if cancelled.is_empty() {
        return Vec::new();
    }
    let lines = ordered
        .iter()
        .filter(|row| patient_key(row).is_some_and(|name| cancelled.contains(name)))
        .map(|row| CancelledLine {
            patient_name: row.patient_name().to_string(),
            amount: row.amount(),
        })
        .collect();
    dedupe_by_key(lines, |line: &CancelledLine| {
        (line.patient_name.clone(), amount_key(line.amount))
    })
}

/// Join of this month's Cleaned rows with earlier months' rows on patient.
pub fn repeat_patients(cleaned: &Cohort, config: &ReportConfig) -> Vec<RepeatVisit> {
    let start = config.period.start();
    let mut prior: BTreeMap<&str, Vec<&ClassifiedOrder>> = BTreeMap::new();
    for row in cleaned {
        if let (Some(name), Some(date)) = (patient_key(row), row.order_date)
            && date < start
        {
            prior.entry(name).or_default().push(row);
        }
    }

    let mut visits = Vec::new();
    for row in cleaned {
        let (Some(name), Some(current_date)) = (patient_key(row), row.order_date) else {
            continue;
        };
        if !config.period.contains(current_date) {
            continue;
        }
        let Some(earlier) = prior.get(name) else {
            continue;
        };
        for previous in earlier {
            if let Some(prior_date) = previous.order_date {
                visits.push(RepeatVisit {
                    patient_name: name.to_string(),
                    current_order_number: row.order.order_number.clone(),
                    current_order_date: current_date,
                    prior_order_number: previous.order.order_number.clone(),
                    prior_order_date: prior_date,
                });
            }
        }
    }
    visits.sort_by(|a, b| {
        a.patient_name
            .cmp(&b.patient_name)
            .then(a.current_order_date.cmp(&b.current_order_date))
            .then(a.prior_order_date.cmp(&b.prior_order_date))
    });
    visits
}

/// Compare the Accessioned and Ordered cohorts and compute the adjusted
/// Ordered total.
///
/// The matched, cancelled and duplicate deductions can overlap; the
/// adjusted total subtracts each of them in full.
pub fn reconcile(cohorts: &Cohorts, config: &ReportConfig) -> Reconciliation {
    let accessioned_patients = patients(&cohorts.accessioned);
    let ordered_patients = patients(&cohorts.ordered);
    let matched_set: BTreeSet<&str> = accessioned_patients
        .intersection(&ordered_patients)
        .copied()
        .collect();

    let matched = matched_lines(&matched_set, &cohorts.accessioned, &cohorts.ordered);
    let accessioned_duplicates = duplicate_lines(&cohorts.accessioned);
    let ordered_duplicates = duplicate_lines(&cohorts.ordered);
    let cancelled = cancelled_lines(&cohorts.ordered, &config.cancelled_patients);
    let repeat_patients = repeat_patients(&cohorts.cleaned, config);

    let accessioned_total = cohorts.accessioned.total_amount();
    let ordered_total = cohorts.ordered.total_amount();
    let matched_total = sum_amounts(matched.iter().map(|line| &line.amount));
    let cancelled_total = sum_amounts(cancelled.iter().map(|line| &line.amount));
    let duplicates_total = sum_amounts(ordered_duplicates.iter().map(|line| &line.amount));
    let totals = ReconciliationTotals {
        accessioned_total,
        ordered_total,
        matched_total,
        cancelled_total,
        duplicates_total,
        adjusted_ordered_total: ordered_total - (matched_total + cancelled_total + duplicates_total),
    };

    debug!(
        matched_patients = matched_set.len(),
        matched_rows = matched.len(),
        accessioned_duplicates = accessioned_duplicates.len(),
        ordered_duplicates = ordered_duplicates.len(),
        cancelled = cancelled.len(),
        repeat_visits = repeat_patients.len(),
        "reconciliation sets"
    );

    Reconciliation {
        matched_patients: matched_set.into_iter().map(str::to_string).collect(),
        matched,
        accessioned_duplicates,
        ordered_duplicates,
        cancelled,
        repeat_patients,
        totals,
    }
}
