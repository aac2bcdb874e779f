//! Output location and the report stage entry point.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use ilims_core::PipelineOutput;
use ilims_model::{OrderExtract, ReportingPeriod};
use tracing::{info, info_span};

use crate::frames::build_sheet_frames;
use crate::xlsx::write_workbook;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// `<dir>/I-LIMS_Cleaned_Ordered_Accessioned_<Mon><YYYY>.xlsx`
pub fn default_output_path(dir: &Path, period: &ReportingPeriod) -> PathBuf {
    dir.join(format!(
        "I-LIMS_Cleaned_Ordered_Accessioned_{}.xlsx",
        period.label()
    ))
}

/// Build every sheet and write the workbook to `path`.
///
/// Returns the sheet names in workbook order.
pub fn write_report(
    extract: &OrderExtract,
    output: &PipelineOutput,
    path: &Path,
) -> Result<Vec<String>> {
    let span = info_span!("report", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let sheets = build_sheet_frames(extract, output)?;
    write_workbook(path, &sheets)?;

    let names: Vec<String> = sheets.iter().map(|sheet| sheet.name.clone()).collect();
    info!(
        sheets = names.len(),
        duration_ms = start.elapsed().as_millis(),
        "report written"
    );
    Ok(names)
}
