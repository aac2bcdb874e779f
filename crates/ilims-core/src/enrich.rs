//! Two-tier staff assignment lookup.
//!
//! The staff lookup is keyed by order creator. The physician lookup only
//! fills fields the staff lookup left empty and never overwrites one.

use ilims_model::{Assignment, AssignmentLookup, ClassifiedOrder, OrderRecord};
use tracing::{debug, warn};

use crate::redaction::redact_value;

/// How the assignments of one run were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Orders with at least one field from the staff lookup.
    pub from_staff: usize,
    /// Orders with at least one field filled by the physician fallback.
    pub from_physician: usize,
    /// Orders left with neither assignee nor region.
    pub unassigned: usize,
}

pub struct Enricher<'a> {
    staff: &'a AssignmentLookup,
    physician: &'a AssignmentLookup,
}

impl<'a> Enricher<'a> {
    pub fn new(staff: &'a AssignmentLookup, physician: &'a AssignmentLookup) -> Self {
        Self { staff, physician }
    }

    /// Resolve one order; the flags report which tiers contributed.
    fn resolve(&self, order: &OrderRecord) -> (Assignment, bool, bool) {
        let mut assignment = self
            .staff
            .get(&order.order_created_by)
            .cloned()
            .unwrap_or_default();
        let from_staff = !assignment.is_empty();
        let mut from_physician = false;
        if !assignment.is_complete()
            && let Some(fallback) = self.physician.get(&order.physician_name)
        {
            let before = assignment.clone();
            assignment.fill_missing(fallback);
            from_physician = assignment != before;
        }
        (assignment, from_staff, from_physician)
    }

    pub fn assignment_for(&self, order: &OrderRecord) -> Assignment {
        self.resolve(order).0
    }

    /// Returns a new table with assignments attached.
    pub fn enrich(&self, orders: &[ClassifiedOrder]) -> (Vec<ClassifiedOrder>, EnrichmentStats) {
        let mut stats = EnrichmentStats::default();
        let enriched = orders
            .iter()
            .map(|row| {
                let (assignment, from_staff, from_physician) = self.resolve(&row.order);
                if from_staff {
                    stats.from_staff += 1;
                }
                if from_physician {
                    stats.from_physician += 1;
                }
                if assignment.is_empty() {
                    stats.unassigned += 1;
                    debug!(
                        creator = %row.order.order_created_by,
                        physician = %redact_value(&row.order.physician_name),
                        "no staff assignment"
                    );
                }
                ClassifiedOrder {
                    assignment,
                    ..row.clone()
                }
            })
            .collect();
        if stats.unassigned > 0 {
            warn!(
                count = stats.unassigned,
                "orders matched neither the staff nor the physician lookup"
            );
        }
        (enriched, stats)
    }
}
