//! Workbook and summary output for a small run.

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;
use ilims_core::{PipelineOutput, run_pipeline};
use ilims_model::{
    Assignment, AssignmentLookup, OrderExtract, OrderRecord, ReportConfig, ReportingPeriod,
};
use ilims_report::{ReportSummary, default_output_path, write_report, write_summary_json};

const HEADERS: [&str; 8] = [
    "Order Number",
    "Patient Name",
    "Order Created By",
    "Sample Category",
    "Order Type",
    "Accession Status",
    "Order Created Date",
    "Total Payable Amount",
];

fn record(cells: [&str; 8], accession_timestamp: &str) -> OrderRecord {
    let [number, patient, creator, sample, order_type, status, created, amount] = cells;
    OrderRecord {
        order_number: number.to_string(),
        patient_name: patient.to_string(),
        order_created_by: creator.to_string(),
        sample_category: sample.to_string(),
        order_type: order_type.to_string(),
        accession_status: status.to_string(),
        order_created_date: created.to_string(),
        accession_timestamp: accession_timestamp.to_string(),
        total_payable_amount: amount.parse().ok(),
        cells: cells.iter().map(|cell| (*cell).to_string()).collect(),
        ..OrderRecord::default()
    }
}

fn config(cancelled: &[&str]) -> ReportConfig {
    let period = ReportingPeriod::new(12, 2025).unwrap();
    ReportConfig::new(period, NaiveDate::from_ymd_opt(2025, 12, 9).unwrap())
        .with_cancelled_patients(cancelled.iter().map(|name| (*name).to_string()).collect())
}

fn run(cancelled: &[&str]) -> (OrderExtract, PipelineOutput, ReportConfig) {
    let rep = "rep@onecelldx.com";
    let extract = OrderExtract {
        headers: HEADERS.iter().map(|header| (*header).to_string()).collect(),
        records: vec![
            record(
                ["1", "A. Sharma", rep, "Service", "MOU", "Accessioned", "02-12-2025 10:00", "500"],
                "04-12-2025 09:30",
            ),
            record(
                ["2", "A. Sharma", rep, "Service", "MOU", "Ordered", "03-12-2025 10:00", "1200"],
                "",
            ),
            record(
                ["3", "B. Rao", rep, "Service", "Retail", "Ordered", "05-12-2025 10:00", "300"],
                "",
            ),
            record(
                ["4", "C. Iyer", rep, "Routine", "MOU", "Ordered", "05-12-2025 10:00", "800"],
                "",
            ),
        ],
        ..OrderExtract::default()
    };
    let staff = AssignmentLookup::from_entries(
        "staff",
        [(
            rep,
            Assignment::new(Some("Anita".to_string()), Some("West".to_string())),
        )],
    );
    let physician = AssignmentLookup::new("physician");
    let config = config(cancelled);
    let output = run_pipeline(&extract, &staff, &physician, &config);
    (extract, output, config)
}

fn cell(range: &calamine::Range<Data>, row: usize, col: usize) -> String {
    match range.get_value((row as u32, col as u32)) {
        Some(Data::String(value)) => value.clone(),
        Some(Data::Float(value)) => value.to_string(),
        Some(Data::Int(value)) => value.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn column(range: &calamine::Range<Data>, name: &str) -> usize {
    (0..range.width())
        .find(|col| cell(range, 0, *col) == name)
        .unwrap_or_else(|| panic!("missing column {name}"))
}

#[test]
fn workbook_has_sheets_in_report_order() {
    let (extract, output, config) = run(&["B. Rao"]);
    let dir = tempfile::tempdir().unwrap();
    let path = default_output_path(&dir.path().join("output"), &config.period);

    let written = write_report(&extract, &output, &path).unwrap();
    assert_eq!(
        written,
        vec!["Accessioned", "Ordered", "Raw Dump", "Cleaned Sheet", "Cancelled"]
    );

    let mut workbook = open_workbook_auto(&path).unwrap();
    assert_eq!(workbook.sheet_names(), written);

    let accessioned = workbook.worksheet_range("Accessioned").unwrap();
    assert_eq!(accessioned.height(), 2);
    assert_eq!(cell(&accessioned, 1, column(&accessioned, "Accession Date")), "04-Dec-2025");
    assert_eq!(cell(&accessioned, 1, column(&accessioned, "ASM")), "Anita");
    assert_eq!(cell(&accessioned, 1, column(&accessioned, "Payment Type")), "B2B");

    let ordered = workbook.worksheet_range("Ordered").unwrap();
    assert_eq!(ordered.height(), 3);
    assert_eq!(cell(&ordered, 1, column(&ordered, "Order Date (Parsed)")), "03-Dec-2025");

    let raw = workbook.worksheet_range("Raw Dump").unwrap();
    assert_eq!(raw.height(), 5);
    assert_eq!(raw.width(), HEADERS.len());

    let cleaned = workbook.worksheet_range("Cleaned Sheet").unwrap();
    assert_eq!(cleaned.height(), 5);
    assert_eq!(cell(&cleaned, 4, column(&cleaned, "Business")), "Non-Service");

    let cancelled = workbook.worksheet_range("Cancelled").unwrap();
    assert_eq!(cell(&cancelled, 1, 0), "B. Rao");
    assert_eq!(cell(&cancelled, 1, 1), "300");
}

#[test]
fn empty_optional_sheets_are_skipped() {
    let (extract, output, _) = run(&[]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    let written = write_report(&extract, &output, &path).unwrap();
    assert_eq!(
        written,
        vec!["Accessioned", "Ordered", "Raw Dump", "Cleaned Sheet"]
    );
}

#[test]
fn summary_json_carries_totals_and_cohorts() {
    let (_, output, config) = run(&["B. Rao"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("summary.json");
    let summary = ReportSummary::new(&config, &output, None);
    write_summary_json(&path, &summary).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["period"]["label"], "Dec2025");
    assert_eq!(json["period"]["ordered_window_end"], "2025-12-08T23:59:59");
    assert_eq!(json["source_rows"], 4);
    assert_eq!(json["cohorts"][0]["name"], "Cleaned");
    assert_eq!(json["cohorts"][0]["rows"], 3);
    assert_eq!(json["totals"]["ordered_total"], 1500.0);
    assert_eq!(json["totals"]["matched_total"], 1700.0);
    assert_eq!(json["totals"]["cancelled_total"], 300.0);
    assert_eq!(json["totals"]["adjusted_ordered_total"], 1500.0 - 2000.0);
    assert_eq!(json["matched_patients"][0], "A. Sharma");
    assert!(json.get("workbook").is_none());
}
