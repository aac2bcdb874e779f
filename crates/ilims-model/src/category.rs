//! Business category, payment type and accession status labels.
//!
//! The string forms returned by `as_str` are the labels written to the
//! report and compared against after normalization.

use std::fmt;

use serde::Serialize;

/// Business line an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BusinessCategory {
    International,
    NonService,
    ServiceFoc,
    Service,
}

impl BusinessCategory {
    pub const ALL: [Self; 4] = [
        Self::International,
        Self::NonService,
        Self::ServiceFoc,
        Self::Service,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::International => "International",
            Self::NonService => "Non-Service",
            Self::ServiceFoc => "Service FOC",
            Self::Service => "Service",
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing channel of an order.
///
/// `Unassigned` marks orders no payment rule matched. Only `B2B`, `B2C`
/// and `Other` are eligible for the reporting cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PaymentType {
    B2b,
    B2c,
    Foc,
    Other,
    Unassigned,
}

impl PaymentType {
    pub const ELIGIBLE: [Self; 3] = [Self::B2b, Self::B2c, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::B2b => "B2B",
            Self::B2c => "B2C",
            Self::Foc => "FOC",
            Self::Other => "Other",
            Self::Unassigned => "Unassigned",
        }
    }

    pub fn is_eligible(self) -> bool {
        Self::ELIGIBLE.contains(&self)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lab workflow state of an order, read from a normalized status label.
///
/// Variants are mutually exclusive, so a record can fall into at most one
/// status-filtered cohort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AccessionStatus {
    Accessioned,
    Ordered,
    Collected,
    ProblemCase,
    OnHold,
    Other(String),
}

impl AccessionStatus {
    /// Interpret a label that has already been trimmed and title-cased.
    pub fn from_normalized(label: &str) -> Self {
        match label {
            "Accessioned" => Self::Accessioned,
            "Ordered" => Self::Ordered,
            "Collected" => Self::Collected,
            "Problem Case" => Self::ProblemCase,
            "On-Hold" => Self::OnHold,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Accessioned => "Accessioned",
            Self::Ordered => "Ordered",
            Self::Collected => "Collected",
            Self::ProblemCase => "Problem Case",
            Self::OnHold => "On-Hold",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Ordered or collected but not yet received by the lab.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Ordered | Self::Collected)
    }
}

impl fmt::Display for AccessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
