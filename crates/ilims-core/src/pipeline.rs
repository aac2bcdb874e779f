//! Stage orchestration: classify → enrich → cohorts → reconcile.

use std::time::Instant;

use ilims_model::{
    AssignmentLookup, ClassifiedOrder, Cohorts, OrderExtract, Reconciliation, ReportConfig,
};
use tracing::{info, info_span};

use crate::classify::classify_orders;
use crate::cohort::build_cohorts;
use crate::enrich::{EnrichmentStats, Enricher};
use crate::reconcile::reconcile;

/// Everything the report writer needs from one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Every source row, classified and enriched, in source order.
    pub orders: Vec<ClassifiedOrder>,
    pub cohorts: Cohorts,
    pub reconciliation: Reconciliation,
    pub enrichment: EnrichmentStats,
}

pub fn run_pipeline(
    extract: &OrderExtract,
    staff: &AssignmentLookup,
    physician: &AssignmentLookup,
    config: &ReportConfig,
) -> PipelineOutput {
    // =========================================================================
    // Stage 1: Classify
    // =========================================================================
    let classify_start = Instant::now();
    let classified = info_span!("classify", rows = extract.len())
        .in_scope(|| classify_orders(&extract.records, &config.rules));
    info!(
        rows = classified.len(),
        duration_ms = classify_start.elapsed().as_millis(),
        "classify complete"
    );

    // =========================================================================
    // Stage 2: Enrich
    // =========================================================================
    let enrich_start = Instant::now();
    let enricher = Enricher::new(staff, physician);
    let (orders, enrichment) = info_span!(
        "enrich",
        staff_entries = staff.len(),
        physician_entries = physician.len()
    )
    .in_scope(|| enricher.enrich(&classified));
    info!(
        from_staff = enrichment.from_staff,
        from_physician = enrichment.from_physician,
        unassigned = enrichment.unassigned,
        duration_ms = enrich_start.elapsed().as_millis(),
        "enrich complete"
    );

    // =========================================================================
    // Stage 3: Cohorts
    // =========================================================================
    let cohort_start = Instant::now();
    let cohorts = info_span!(
        "cohorts",
        period = %config.period.label(),
        cutoff = %config.cutoff,
        ordered_until = %config.ordered_window_end()
    )
    .in_scope(|| build_cohorts(&orders, config));
    info!(
        cleaned = cohorts.cleaned.len(),
        accessioned = cohorts.accessioned.len(),
        ordered = cohorts.ordered.len(),
        problem_case = cohorts.problem_case.len(),
        on_hold = cohorts.on_hold.len(),
        duration_ms = cohort_start.elapsed().as_millis(),
        "cohorts complete"
    );

    // =========================================================================
    // Stage 4: Reconcile
    // =========================================================================
    let reconcile_start = Instant::now();
    let reconciliation = info_span!("reconcile").in_scope(|| reconcile(&cohorts, config));
    info!(
        matched_patients = reconciliation.matched_patients.len(),
        ordered_total = reconciliation.totals.ordered_total,
        adjusted_ordered_total = reconciliation.totals.adjusted_ordered_total,
        duration_ms = reconcile_start.elapsed().as_millis(),
        "reconcile complete"
    );

    PipelineOutput {
        orders,
        cohorts,
        reconciliation,
        enrichment,
    }
}
