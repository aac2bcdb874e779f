//! Report output: sheet frames, the xlsx workbook and the JSON summary.

pub mod frames;
pub mod output;
pub mod polars_utils;
pub mod summary;
pub mod xlsx;

pub use frames::{SheetFrame, build_sheet_frames};
pub use output::{DEFAULT_OUTPUT_DIR, default_output_path, write_report};
pub use summary::{ReportSummary, write_summary_json};
pub use xlsx::write_workbook;
