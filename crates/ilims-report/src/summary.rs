//! Machine-readable run summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ilims_core::PipelineOutput;
use ilims_model::{
    CancelledLine, Cohort, PatientLine, ReconciliationTotals, RepeatVisit, ReportConfig,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub month: u32,
    pub year: i32,
    pub cutoff: NaiveDateTime,
    pub as_of: NaiveDate,
    pub ordered_window_end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortSummary {
    pub name: &'static str,
    pub rows: usize,
    pub patients: usize,
    pub total_amount: f64,
}

impl CohortSummary {
    fn from_cohort(cohort: &Cohort) -> Self {
        Self {
            name: cohort.kind().label(),
            rows: cohort.len(),
            patients: cohort.distinct_patients().len(),
            total_amount: cohort.total_amount(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnrichmentSummary {
    pub from_staff: usize,
    pub from_physician: usize,
    pub unassigned: usize,
}

/// Period, cohort sizes and the full reconciliation of one run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub period: PeriodSummary,
    pub source_rows: usize,
    pub cohorts: Vec<CohortSummary>,
    pub enrichment: EnrichmentSummary,
    pub totals: ReconciliationTotals,
    pub matched_patients: Vec<String>,
    pub matched: Vec<PatientLine>,
    pub accessioned_duplicates: Vec<PatientLine>,
    pub ordered_duplicates: Vec<PatientLine>,
    pub cancelled: Vec<CancelledLine>,
    pub repeat_patients: Vec<RepeatVisit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook: Option<String>,
}

impl ReportSummary {
    pub fn new(config: &ReportConfig, output: &PipelineOutput, workbook: Option<&Path>) -> Self {
        let reconciliation = &output.reconciliation;
        Self {
            period: PeriodSummary {
                label: config.period.label(),
                month: config.period.month(),
                year: config.period.year(),
                cutoff: config.cutoff,
                as_of: config.as_of,
                ordered_window_end: config.ordered_window_end(),
            },
            source_rows: output.orders.len(),
            cohorts: output
                .cohorts
                .iter()
                .map(CohortSummary::from_cohort)
                .collect(),
            enrichment: EnrichmentSummary {
                from_staff: output.enrichment.from_staff,
                from_physician: output.enrichment.from_physician,
                unassigned: output.enrichment.unassigned,
            },
            totals: reconciliation.totals,
            matched_patients: reconciliation.matched_patients.clone(),
            matched: reconciliation.matched.clone(),
            accessioned_duplicates: reconciliation.accessioned_duplicates.clone(),
            ordered_duplicates: reconciliation.ordered_duplicates.clone(),
            cancelled: reconciliation.cancelled.clone(),
            repeat_patients: reconciliation.repeat_patients.clone(),
            workbook: workbook.map(|path| path.display().to_string()),
        }
    }
}

pub fn write_summary_json(path: &Path, summary: &ReportSummary) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("write {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
