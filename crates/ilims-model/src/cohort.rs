//! Classified orders and the cohorts built from them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::category::{AccessionStatus, BusinessCategory, PaymentType};
use crate::lookup::Assignment;
use crate::order::OrderRecord;

/// An order after classification, enrichment and date parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedOrder {
    pub order: OrderRecord,
    pub business: BusinessCategory,
    /// Trimmed, title-cased business label used for cohort comparisons.
    pub business_normalized: String,
    pub payment_type: PaymentType,
    pub assignment: Assignment,
    pub order_date: Option<NaiveDateTime>,
    pub accession_date: Option<NaiveDateTime>,
    pub collection_date: Option<NaiveDateTime>,
    pub accession_status: AccessionStatus,
    /// Set only for rows of the Accessioned cohort.
    pub final_date: Option<NaiveDateTime>,
}

impl ClassifiedOrder {
    pub fn patient_name(&self) -> &str {
        &self.order.patient_name
    }

    pub fn test_ordered(&self) -> &str {
        &self.order.test_ordered
    }

    pub fn amount(&self) -> Option<f64> {
        self.order.total_payable_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CohortKind {
    Cleaned,
    Accessioned,
    Ordered,
    ProblemCase,
    OnHold,
}

impl CohortKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cleaned => "Cleaned",
            Self::Accessioned => "Accessioned",
            Self::Ordered => "Ordered",
            Self::ProblemCase => "Problem Case",
            Self::OnHold => "On-Hold",
        }
    }
}

impl fmt::Display for CohortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named, immutable subset of the classified order set.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    kind: CohortKind,
    rows: Vec<ClassifiedOrder>,
}

impl Cohort {
    pub fn new(kind: CohortKind, rows: Vec<ClassifiedOrder>) -> Self {
        Self { kind, rows }
    }

    pub fn kind(&self) -> CohortKind {
        self.kind
    }

    pub fn rows(&self) -> &[ClassifiedOrder] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedOrder> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of payable amounts; rows without an amount count as zero.
    pub fn total_amount(&self) -> f64 {
        self.rows.iter().filter_map(ClassifiedOrder::amount).sum()
    }

    pub fn distinct_patients(&self) -> BTreeSet<&str> {
        self.rows.iter().map(ClassifiedOrder::patient_name).collect()
    }
}

impl<'a> IntoIterator for &'a Cohort {
    type Item = &'a ClassifiedOrder;
    type IntoIter = std::slice::Iter<'a, ClassifiedOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// All cohorts of one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohorts {
    pub cleaned: Cohort,
    pub accessioned: Cohort,
    pub ordered: Cohort,
    pub problem_case: Cohort,
    pub on_hold: Cohort,
}

impl Cohorts {
    pub fn iter(&self) -> impl Iterator<Item = &Cohort> {
        [
            &self.cleaned,
            &self.accessioned,
            &self.ordered,
            &self.problem_case,
            &self.on_hold,
        ]
        .into_iter()
    }
}
