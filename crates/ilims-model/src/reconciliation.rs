//! Read model produced by the reconciler.

use chrono::NaiveDateTime;
use serde::Serialize;

/// (Patient, Test, Amount) projection of a cohort row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientLine {
    pub patient_name: String,
    pub test_ordered: String,
    pub amount: Option<f64>,
}

/// (Patient, Amount) projection of a cancelled Ordered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelledLine {
    pub patient_name: String,
    pub amount: Option<f64>,
}

/// One row of the this-month × prior-months join on patient identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatVisit {
    pub patient_name: String,
    pub current_order_number: String,
    pub current_order_date: NaiveDateTime,
    pub prior_order_number: String,
    pub prior_order_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReconciliationTotals {
    pub accessioned_total: f64,
    pub ordered_total: f64,
    pub matched_total: f64,
    pub cancelled_total: f64,
    pub duplicates_total: f64,
    /// Ordered total minus matched, cancelled and Ordered-duplicate totals.
    /// The three deductions can overlap and are not de-overlapped.
    pub adjusted_ordered_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Patients present in both Accessioned and Ordered, sorted.
    pub matched_patients: Vec<String>,
    pub matched: Vec<PatientLine>,
    pub accessioned_duplicates: Vec<PatientLine>,
    pub ordered_duplicates: Vec<PatientLine>,
    pub cancelled: Vec<CancelledLine>,
    pub repeat_patients: Vec<RepeatVisit>,
    pub totals: ReconciliationTotals,
}

/// Sum of optional amounts, counting missing values as zero.
pub fn sum_amounts<'a, I>(amounts: I) -> f64
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    amounts.into_iter().flatten().sum()
}
