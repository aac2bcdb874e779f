//! CLI argument definitions for the `ilims` report runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ilims",
    version,
    about = "I-LIMS monthly order report - classify, split and reconcile lab orders",
    long_about = "Classify a daily I-LIMS order extract, split it into Accessioned and\n\
                  Ordered cohorts for one reporting month, reconcile the two and write\n\
                  the result as a multi-sheet xlsx workbook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient and physician names in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the monthly report from an order extract and two lookups.
    Report(ReportArgs),

    /// Print the classification rule tables in evaluation order.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Daily order extract (CSV).
    #[arg(long = "orders", value_name = "CSV")]
    pub orders: PathBuf,

    /// Staff lookup keyed by order creator (xlsx, xls, ods or csv).
    #[arg(long = "staff-lookup", value_name = "FILE")]
    pub staff_lookup: PathBuf,

    /// Physician lookup used when the staff lookup has no match.
    #[arg(long = "physician-lookup", value_name = "FILE")]
    pub physician_lookup: PathBuf,

    /// Reporting month (1-12).
    #[arg(long = "month", value_name = "M")]
    pub month: Option<u32>,

    /// Reporting year.
    #[arg(long = "year", value_name = "Y")]
    pub year: Option<i32>,

    /// Latest order creation time to include (default: the 9th, 23:59:59).
    #[arg(long = "cutoff", value_name = "TIMESTAMP")]
    pub cutoff: Option<String>,

    /// Run date; the Ordered window ends the day before (default: today).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
    pub as_of: Option<String>,

    /// TOML file with period, rule lists and cancelled patients.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the workbook (default: ./output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Explicit workbook path (overrides --output-dir).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Patient whose Ordered rows are cancelled (repeatable).
    #[arg(long = "cancelled", value_name = "NAME")]
    pub cancelled: Vec<String>,

    /// Also write the run summary as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Run the pipeline and print the summary without writing the workbook.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// TOML file whose [rules] table replaces the built-in lists.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
