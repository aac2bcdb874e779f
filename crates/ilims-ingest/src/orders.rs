//! Order extract loading.

use std::path::Path;

use ilims_model::{OrderExtract, OrderRecord};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::header::HeaderIndex;
use crate::table::{SourceTable, read_csv_table};

const ORDER_NUMBER: &[&str] = &["Order Number", "Order No", "Order ID"];
const PATIENT_NAME: &[&str] = &["Patient Name"];
const PHYSICIAN_NAME: &[&str] = &["Physician Full Name", "Physician Name", "Doctor Name"];
const FACILITY_NAME: &[&str] = &["Facility/Hospital Name", "Facility Name", "Hospital Name"];
const ORDER_CREATED_BY: &[&str] = &["Order Created By"];
const COUNTRY: &[&str] = &["Country"];
const SAMPLE_CATEGORY: &[&str] = &["Sample Category"];
const ORDER_TYPE: &[&str] = &["Order Type"];
const PAYMENT_STATUS: &[&str] = &["Payment Status"];
const ACCESSION_STATUS: &[&str] = &["Accession Status"];
const TEST_ORDERED: &[&str] = &["Test Ordered"];
const ORDER_CREATED_DATE: &[&str] = &["Order Created Date"];
const ACCESSION_TIMESTAMP: &[&str] = &["Accession Timestamp"];
const SAMPLE_COLLECTION_TIMESTAMP: &[&str] = &["Sample Collection TimeStamp"];
const TOTAL_PAYABLE_AMOUNT: &[&str] = &["Total Payable Amount"];

/// Resolved column positions of the extract.
struct OrderColumns {
    order_number: Option<usize>,
    patient_name: usize,
    physician_name: usize,
    facility_name: usize,
    order_created_by: usize,
    country: usize,
    sample_category: usize,
    order_type: usize,
    payment_status: usize,
    accession_status: usize,
    test_ordered: usize,
    order_created_date: usize,
    accession_timestamp: usize,
    sample_collection_timestamp: usize,
    total_payable_amount: usize,
}

impl OrderColumns {
    fn resolve(index: &HeaderIndex) -> Result<Self> {
        Ok(Self {
            order_number: index.find(ORDER_NUMBER),
            patient_name: index.require(PATIENT_NAME)?,
            physician_name: index.require(PHYSICIAN_NAME)?,
            facility_name: index.require(FACILITY_NAME)?,
            order_created_by: index.require(ORDER_CREATED_BY)?,
            country: index.require(COUNTRY)?,
            sample_category: index.require(SAMPLE_CATEGORY)?,
            order_type: index.require(ORDER_TYPE)?,
            payment_status: index.require(PAYMENT_STATUS)?,
            accession_status: index.require(ACCESSION_STATUS)?,
            test_ordered: index.require(TEST_ORDERED)?,
            order_created_date: index.require(ORDER_CREATED_DATE)?,
            accession_timestamp: index.require(ACCESSION_TIMESTAMP)?,
            sample_collection_timestamp: index.require(SAMPLE_COLLECTION_TIMESTAMP)?,
            total_payable_amount: index.require(TOTAL_PAYABLE_AMOUNT)?,
        })
    }

    fn record(&self, cells: Vec<String>) -> OrderRecord {
        let text = |idx: usize| cells.get(idx).map(|v| v.trim().to_string()).unwrap_or_default();
        OrderRecord {
            order_number: self.order_number.map(text).unwrap_or_default(),
            patient_name: text(self.patient_name),
            physician_name: text(self.physician_name),
            facility_name: text(self.facility_name),
            order_created_by: text(self.order_created_by),
            country: text(self.country),
            sample_category: text(self.sample_category),
            order_type: text(self.order_type),
            payment_status: text(self.payment_status),
            accession_status: text(self.accession_status),
            test_ordered: text(self.test_ordered),
            order_created_date: text(self.order_created_date),
            accession_timestamp: text(self.accession_timestamp),
            sample_collection_timestamp: text(self.sample_collection_timestamp),
            total_payable_amount: parse_amount(&text(self.total_payable_amount)),
            cells,
        }
    }
}

/// Load the daily order extract (delimited text).
pub fn read_order_extract(path: &Path) -> Result<OrderExtract> {
    let table = read_csv_table(path)?;
    let extract = order_extract_from_table(table)?;
    info!(
        path = %path.display(),
        rows = extract.len(),
        columns = extract.headers.len(),
        "loaded order extract"
    );
    Ok(extract)
}

/// Convert a loaded table into typed order records.
///
/// Fails when a required column is missing; an extract with a header row
/// and no data rows is valid.
pub fn order_extract_from_table(table: SourceTable) -> Result<OrderExtract> {
    let index = HeaderIndex::new("order extract", &table.headers);
    let columns = OrderColumns::resolve(&index)?;
    let SourceTable {
        headers,
        rows,
        raw_headers,
        raw_rows,
    } = table;
    let records: Vec<OrderRecord> = rows.into_iter().map(|cells| columns.record(cells)).collect();

    let missing_amounts = records
        .iter()
        .filter(|record| record.total_payable_amount.is_none())
        .count();
    if missing_amounts > 0 {
        warn!(
            missing_amounts,
            "rows without a parseable payable amount count as zero"
        );
    }
    debug!(
        has_order_number = columns.order_number.is_some(),
        "resolved order extract columns"
    );
    Ok(OrderExtract {
        headers,
        records,
        raw_headers,
        raw_rows,
    })
}

/// Parse a payable amount, ignoring thousands separators and currency noise on either side.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | ' ' | '\u{a0}'))
        .collect();
    let start = numeric_start(&compact)?;
    let numeric = compact[start..].trim_end_matches(|ch: char| !ch.is_ascii_digit());
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Byte offset where the number begins. A dot directly after a letter (`Rs.`)
/// is currency noise, not a decimal point.
fn numeric_start(text: &str) -> Option<usize> {
    let mut previous: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        let next_is_digit = next.is_some_and(|next| next.is_ascii_digit());
        let begins = match ch {
            '0'..='9' => true,
            '.' => next_is_digit && !previous.is_some_and(char::is_alphabetic),
            '-' => next_is_digit || next == Some('.'),
            _ => false,
        };
        if begins {
            return Some(idx);
        }
        previous = Some(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_amount_variants() {
        assert_eq!(parse_amount("1200"), Some(1200.0));
        assert_eq!(parse_amount(" 1,24,500.50 "), Some(124_500.5));
        assert_eq!(parse_amount("Rs. 3,000"), Some(3000.0));
        assert_eq!(parse_amount("₹450"), Some(450.0));
        assert_eq!(parse_amount("-75"), Some(-75.0));
        assert_eq!(parse_amount(".50"), Some(0.5));
        assert_eq!(parse_amount("₹.75"), Some(0.75));
        assert_eq!(parse_amount("Rs.3000"), Some(3000.0));
        assert_eq!(parse_amount("450 INR"), Some(450.0));
        assert_eq!(parse_amount("1,200/-"), Some(1200.0));
        assert_eq!(parse_amount("-.25"), Some(-0.25));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("nan"), None);
        assert_eq!(parse_amount("N/A"), None);
    }
}
