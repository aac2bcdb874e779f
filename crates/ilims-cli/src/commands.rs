use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use ilims_core::{PipelineOutput, run_pipeline};
use ilims_ingest::{PHYSICIAN_LOOKUP, STAFF_LOOKUP, read_lookup, read_order_extract};
use ilims_model::{AssignmentLookup, ClassificationRules, OrderExtract, ReportConfig};
use ilims_report::{
    DEFAULT_OUTPUT_DIR, ReportSummary, default_output_path, write_report, write_summary_json,
};
use tracing::{info, info_span, warn};

use ilims_cli::settings::{ReportOverrides, load_optional_config, resolve_report_config};

use crate::cli::{ReportArgs, RulesArgs};

pub struct ReportRun {
    pub summary: ReportSummary,
    pub sheets: Vec<String>,
}

struct Inputs {
    extract: OrderExtract,
    staff: AssignmentLookup,
    physician: AssignmentLookup,
}

fn overrides(args: &ReportArgs) -> ReportOverrides {
    ReportOverrides {
        month: args.month,
        year: args.year,
        cutoff: args.cutoff.clone(),
        as_of: args.as_of.clone(),
        cancelled_patients: args.cancelled.clone(),
    }
}

fn resolve_config(args: &ReportArgs) -> Result<ReportConfig> {
    let file = load_optional_config(args.config.as_deref())?;
    let today = Local::now().date_naive();
    Ok(resolve_report_config(&overrides(args), &file, today)?)
}

fn output_path(args: &ReportArgs, config: &ReportConfig) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    default_output_path(&dir, &config.period)
}

/// Lookups are read first so schema drift fails before the extract is touched.
fn ingest(orders: &Path, staff: &Path, physician: &Path) -> Result<Inputs> {
    let staff = read_lookup(staff, &STAFF_LOOKUP)?;
    let physician = read_lookup(physician, &PHYSICIAN_LOOKUP)?;
    let extract = read_order_extract(orders)?;
    Ok(Inputs {
        extract,
        staff,
        physician,
    })
}

pub fn run_report(args: &ReportArgs) -> Result<ReportRun> {
    let config = resolve_config(args).context("resolve report settings")?;
    let run_span = info_span!("run", period = %config.period.label());
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let ingest_span = info_span!("ingest", orders = %args.orders.display());
    let ingest_start = Instant::now();
    let Inputs {
        extract,
        staff,
        physician,
    } = ingest_span
        .in_scope(|| ingest(&args.orders, &args.staff_lookup, &args.physician_lookup))?;
    info!(
        rows = extract.len(),
        staff_entries = staff.len(),
        physician_entries = physician.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );
    if extract.is_empty() {
        warn!("order extract has no data rows");
    }

    // =========================================================================
    // Stage 2-5: Classify, enrich, cohorts, reconcile
    // =========================================================================
    let output: PipelineOutput = run_pipeline(&extract, &staff, &physician, &config);

    // =========================================================================
    // Stage 6: Report
    // =========================================================================
    let (workbook, sheets) = if args.dry_run {
        info!("dry run: workbook not written");
        (None, Vec::new())
    } else {
        let path = output_path(args, &config);
        let sheets = write_report(&extract, &output, &path)?;
        (Some(path), sheets)
    };

    let summary = ReportSummary::new(&config, &output, workbook.as_deref());
    if let Some(path) = &args.summary_json {
        write_summary_json(path, &summary)?;
        info!(path = %path.display(), "summary written");
    }
    Ok(ReportRun { summary, sheets })
}

pub fn run_rules(args: &RulesArgs) -> Result<ClassificationRules> {
    let file = load_optional_config(args.config.as_deref())?;
    Ok(file.rules)
}
