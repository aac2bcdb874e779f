//! Console summary content for a small run.

use chrono::NaiveDate;
use ilims_cli::summary::{cohort_rows, totals_rows};
use ilims_core::run_pipeline;
use ilims_model::{
    AssignmentLookup, OrderExtract, OrderRecord, ReportConfig, ReportingPeriod,
};
use ilims_report::ReportSummary;

fn record(id: &str, patient: &str, status: &str, created: &str, amount: f64) -> OrderRecord {
    OrderRecord {
        order_number: id.to_string(),
        patient_name: patient.to_string(),
        sample_category: "Service".to_string(),
        order_type: "Retail".to_string(),
        accession_status: status.to_string(),
        order_created_date: created.to_string(),
        test_ordered: format!("Test {id}"),
        total_payable_amount: Some(amount),
        cells: vec![id.to_string()],
        ..OrderRecord::default()
    }
}

fn summary() -> ReportSummary {
    let extract = OrderExtract {
        headers: vec!["Order Number".to_string()],
        records: vec![
            record("1", "A. Sharma", "Accessioned", "02-12-2025 10:00", 1500.0),
            record("2", "A. Sharma", "Ordered", "03-12-2025 10:00", 1200.0),
            record("3", "A. Sharma", "Ordered", "04-12-2025 10:00", 800.0),
            record("4", "B. Rao", "Collected", "05-12-2025 10:00", 2250.5),
            record("5", "C. Iyer", "On-Hold", "05-12-2025 10:00", 400.0),
        ],
        ..OrderExtract::default()
    };
    let period = ReportingPeriod::new(12, 2025).unwrap();
    let config = ReportConfig::new(period, NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
    let empty = AssignmentLookup::new("empty");
    let output = run_pipeline(&extract, &empty, &empty, &config);
    ReportSummary::new(&config, &output, None)
}

#[test]
fn summary_rows_snapshot() {
    let summary = summary();
    let mut lines: Vec<String> = cohort_rows(&summary)
        .into_iter()
        .map(|row| {
            format!(
                "{:<12} rows={} patients={} amount={}",
                row.cohort, row.rows, row.patients, row.amount
            )
        })
        .collect();
    lines.extend(
        totals_rows(&summary.totals)
            .into_iter()
            .map(|(label, amount)| format!("{label}: {amount}")),
    );
    insta::assert_snapshot!(lines.join("\n"), @r"
    Cleaned      rows=5 patients=3 amount=6,150.50
    Accessioned  rows=1 patients=1 amount=1,500.00
    Ordered      rows=3 patients=2 amount=4,250.50
    Problem Case rows=0 patients=0 amount=0.00
    On-Hold      rows=1 patients=1 amount=400.00
    Accessioned total: 1,500.00
    Ordered total: 4,250.50
    Matched total: 3,500.00
    Cancelled total: 0.00
    Duplicates total: 2,000.00
    Adjusted ordered total: -1,249.50
    ");
}
