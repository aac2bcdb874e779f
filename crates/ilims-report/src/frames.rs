//! Sheet tables as polars frames.
//!
//! Every cohort sheet carries the source columns verbatim followed by the
//! derived columns. Dates are rendered as `DD-Mon-YYYY` text.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use ilims_core::{PipelineOutput, format_report_date};
use ilims_model::{ClassifiedOrder, Cohort, OrderExtract};
use polars::prelude::{Column, DataFrame};

use crate::polars_utils::{float_column, string_column};

pub const ACCESSIONED_SHEET: &str = "Accessioned";
pub const ORDERED_SHEET: &str = "Ordered";
pub const PROBLEM_CASE_SHEET: &str = "Problem Case";
pub const ON_HOLD_SHEET: &str = "On-Hold";
pub const RAW_DUMP_SHEET: &str = "Raw Dump";
pub const CLEANED_SHEET: &str = "Cleaned Sheet";
pub const CANCELLED_SHEET: &str = "Cancelled";

pub const ACCESSION_DATE_COLUMN: &str = "Accession Date";

type DerivedValue = fn(&ClassifiedOrder) -> String;

const DERIVED_COLUMNS: &[(&str, DerivedValue)] = &[
    ("Business", |row| row.business.as_str().to_string()),
    ("Payment Type", |row| row.payment_type.as_str().to_string()),
    ("ASM", |row| {
        row.assignment.staff_assignee.clone().unwrap_or_default()
    }),
    ("Region", |row| row.assignment.region.clone().unwrap_or_default()),
    ("Order Date (Parsed)", |row| date_text(row.order_date)),
    ("Accession Timestamp (Parsed)", |row| {
        date_text(row.accession_date)
    }),
    ("Sample Collection Timestamp (Parsed)", |row| {
        date_text(row.collection_date)
    }),
    ("Accession Status (Normalized)", |row| {
        row.accession_status.label().to_string()
    }),
    ("Business (Normalized)", |row| row.business_normalized.clone()),
];

/// One named worksheet.
#[derive(Debug, Clone)]
pub struct SheetFrame {
    pub name: String,
    pub data: DataFrame,
}

impl SheetFrame {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }
}

fn date_text(value: Option<NaiveDateTime>) -> String {
    value.map(format_report_date).unwrap_or_default()
}

/// Make column names unique and non-blank; later duplicates get a numeric suffix.
fn unique_headers<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Column {}", idx + 1)
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut counter = 2;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{counter}");
            counter += 1;
        }
        out.push(name);
    }
    out
}

fn source_columns(headers: &[String], names: &[String], rows: &[&[String]]) -> Vec<Column> {
    (0..headers.len())
        .map(|col| {
            let values = rows
                .iter()
                .map(|cells| cells.get(col).cloned().unwrap_or_default())
                .collect();
            string_column(&names[col], values)
        })
        .collect()
}

fn order_frame(
    headers: &[String],
    rows: &[ClassifiedOrder],
    with_final_date: bool,
) -> Result<DataFrame> {
    let mut all_headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    all_headers.extend(DERIVED_COLUMNS.iter().map(|(name, _)| *name));
    if with_final_date {
        all_headers.push(ACCESSION_DATE_COLUMN);
    }
    let names = unique_headers(all_headers);

    let cells: Vec<&[String]> = rows.iter().map(|row| row.order.cells.as_slice()).collect();
    let mut columns = source_columns(headers, &names, &cells);
    for (offset, (_, value)) in DERIVED_COLUMNS.iter().enumerate() {
        let values = rows.iter().map(value).collect();
        columns.push(string_column(&names[headers.len() + offset], values));
    }
    if with_final_date {
        let values = rows.iter().map(|row| date_text(row.final_date)).collect();
        columns.push(string_column(&names[names.len() - 1], values));
    }
    Ok(DataFrame::new(columns)?)
}

fn cohort_frame(headers: &[String], cohort: &Cohort, name: &str) -> Result<SheetFrame> {
    let data = order_frame(headers, cohort.rows(), false)
        .with_context(|| format!("build {name} sheet"))?;
    Ok(SheetFrame::new(name, data))
}

/// The extract as read. Rows wider than the header get `Column N` headers;
/// without raw rows the parsed records stand in.
fn raw_dump_frame(extract: &OrderExtract) -> Result<SheetFrame> {
    let (mut headers, cells): (Vec<String>, Vec<&[String]>) = if extract.raw_headers.is_empty() {
        let cells = extract
            .records
            .iter()
            .map(|record| record.cells.as_slice())
            .collect();
        (extract.headers.clone(), cells)
    } else {
        let cells = extract.raw_rows.iter().map(Vec::as_slice).collect();
        (extract.raw_headers.clone(), cells)
    };
    let width = cells.iter().map(|row| row.len()).max().unwrap_or(0);
    if width > headers.len() {
        headers.resize(width, String::new());
    }
    let names = unique_headers(headers.iter().map(String::as_str));
    let data =
        DataFrame::new(source_columns(&headers, &names, &cells)).context("build Raw Dump sheet")?;
    Ok(SheetFrame::new(RAW_DUMP_SHEET, data))
}

fn cancelled_frame(output: &PipelineOutput) -> Result<SheetFrame> {
    let cancelled = &output.reconciliation.cancelled;
    let data = DataFrame::new(vec![
        string_column(
            "Patient Name",
            cancelled.iter().map(|line| line.patient_name.clone()).collect(),
        ),
        float_column(
            "Total Payable Amount",
            cancelled.iter().map(|line| line.amount).collect(),
        ),
    ])
    .context("build Cancelled sheet")?;
    Ok(SheetFrame::new(CANCELLED_SHEET, data))
}

/// All sheets in workbook order; empty optional sheets are left out.
pub fn build_sheet_frames(
    extract: &OrderExtract,
    output: &PipelineOutput,
) -> Result<Vec<SheetFrame>> {
    let headers = &extract.headers;
    let cohorts = &output.cohorts;

    let accessioned = order_frame(headers, cohorts.accessioned.rows(), true)
        .context("build Accessioned sheet")?;
    let mut sheets = vec![
        SheetFrame::new(ACCESSIONED_SHEET, accessioned),
        cohort_frame(headers, &cohorts.ordered, ORDERED_SHEET)?,
    ];
    if !cohorts.problem_case.is_empty() {
        sheets.push(cohort_frame(headers, &cohorts.problem_case, PROBLEM_CASE_SHEET)?);
    }
    if !cohorts.on_hold.is_empty() {
        sheets.push(cohort_frame(headers, &cohorts.on_hold, ON_HOLD_SHEET)?);
    }
    sheets.push(raw_dump_frame(extract)?);
    let cleaned = order_frame(headers, &output.orders, false).context("build Cleaned Sheet")?;
    sheets.push(SheetFrame::new(CLEANED_SHEET, cleaned));
    if !output.reconciliation.cancelled.is_empty() {
        sheets.push(cancelled_frame(output)?);
    }
    Ok(sheets)
}
