//! Console tables printed after a run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use ilims_core::{BUSINESS_RULES, PAYMENT_RULES};
use ilims_model::{ClassificationRules, ReconciliationTotals};
use ilims_report::ReportSummary;

/// One line of the cohort table.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRow {
    pub cohort: &'static str,
    pub rows: usize,
    pub patients: usize,
    pub amount: String,
}

pub fn cohort_rows(summary: &ReportSummary) -> Vec<CohortRow> {
    summary
        .cohorts
        .iter()
        .map(|cohort| CohortRow {
            cohort: cohort.name,
            rows: cohort.rows,
            patients: cohort.patients,
            amount: format_amount(cohort.total_amount),
        })
        .collect()
}

pub fn totals_rows(totals: &ReconciliationTotals) -> Vec<(&'static str, String)> {
    vec![
        ("Accessioned total", format_amount(totals.accessioned_total)),
        ("Ordered total", format_amount(totals.ordered_total)),
        ("Matched total", format_amount(totals.matched_total)),
        ("Cancelled total", format_amount(totals.cancelled_total)),
        ("Duplicates total", format_amount(totals.duplicates_total)),
        (
            "Adjusted ordered total",
            format_amount(totals.adjusted_ordered_total),
        ),
    ]
}

/// Two decimals with thousands separators, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

pub fn print_summary(summary: &ReportSummary, sheets: &[String]) {
    println!("Period: {}", summary.period.label);
    println!(
        "Cutoff: {}  Ordered until: {}",
        summary.period.cutoff, summary.period.ordered_window_end
    );
    println!("Source rows: {}", summary.source_rows);
    match &summary.workbook {
        Some(path) => println!("Workbook: {path} ({})", sheets.join(", ")),
        None => println!("Workbook: not written (dry run)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Cohort"),
        header_cell("Rows"),
        header_cell("Patients"),
        header_cell("Amount"),
    ]);
    apply_table_style(&mut table);
    for column in 1..4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for row in cohort_rows(summary) {
        let rows = if row.rows == 0 {
            dim_cell(row.rows)
        } else {
            Cell::new(row.rows)
        };
        table.add_row(vec![
            Cell::new(row.cohort)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            rows,
            Cell::new(row.patients),
            Cell::new(row.amount),
        ]);
    }
    println!("{table}");

    let mut totals = Table::new();
    totals.set_header(vec![header_cell("Reconciliation"), header_cell("Amount")]);
    apply_table_style(&mut totals);
    align_column(&mut totals, 1, CellAlignment::Right);
    let rows = totals_rows(&summary.totals);
    let last = rows.len().saturating_sub(1);
    for (idx, (label, amount)) in rows.into_iter().enumerate() {
        if idx == last {
            totals.add_row(vec![
                Cell::new(label)
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold),
                Cell::new(amount).add_attribute(Attribute::Bold),
            ]);
        } else {
            totals.add_row(vec![Cell::new(label), Cell::new(amount)]);
        }
    }
    println!("{totals}");

    println!(
        "Matched patients: {}  Ordered duplicates: {}  Accessioned duplicates: {}  Cancelled: {}  Repeat visits: {}",
        summary.matched_patients.len(),
        summary.ordered_duplicates.len(),
        summary.accessioned_duplicates.len(),
        summary.cancelled.len(),
        summary.repeat_patients.len()
    );
    if summary.enrichment.unassigned > 0 {
        eprintln!(
            "warning: {} orders have no staff assignment",
            summary.enrichment.unassigned
        );
    }
}

/// Rule tables in evaluation order plus the literal lists they use.
pub fn print_rules(rules: &ClassificationRules) {
    let mut business = Table::new();
    business.set_header(vec![
        header_cell("#"),
        header_cell("Business rule (first match)"),
        header_cell("Category"),
    ]);
    apply_table_style(&mut business);
    for (idx, rule) in BUSINESS_RULES.iter().enumerate() {
        business.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(rule.name),
            Cell::new(rule.category.as_str()),
        ]);
    }
    business.add_row(vec![
        dim_cell("-"),
        dim_cell("otherwise"),
        Cell::new("Non-Service"),
    ]);
    println!("{business}");

    let mut payment = Table::new();
    payment.set_header(vec![
        header_cell("#"),
        header_cell("Payment rule (last match)"),
        header_cell("Payment Type"),
    ]);
    apply_table_style(&mut payment);
    for (idx, rule) in PAYMENT_RULES.iter().enumerate() {
        payment.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(rule.name),
            Cell::new(rule.payment_type.as_str()),
        ]);
    }
    payment.add_row(vec![
        dim_cell("-"),
        dim_cell("none matched"),
        Cell::new("Unassigned"),
    ]);
    println!("{payment}");

    println!(
        "International countries: {}",
        rules.international_countries.join(", ")
    );
    println!("FOC-authorized staff: {}", rules.foc_authorized_staff.join(", "));
    println!("Excluded facility: {}", rules.excluded_facility);
    println!("Bot account: {}", rules.bot_account);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1700.0), "1,700.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-500.0), "-500.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }
}
