//! Source order records.

/// One row of the daily order extract.
///
/// The typed fields carry the values the pipeline reasons about, trimmed of
/// surrounding whitespace. `cells` keeps every source cell verbatim, in
/// header order, for the raw dump and for exact-row comparisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRecord {
    pub order_number: String,
    pub patient_name: String,
    pub physician_name: String,
    pub facility_name: String,
    pub order_created_by: String,
    pub country: String,
    pub sample_category: String,
    pub order_type: String,
    pub payment_status: String,
    pub accession_status: String,
    pub test_ordered: String,
    pub order_created_date: String,
    pub accession_timestamp: String,
    pub sample_collection_timestamp: String,
    pub total_payable_amount: Option<f64>,
    pub cells: Vec<String>,
}

/// The loaded extract: normalized header row plus one record per data row.
///
/// `raw_headers` and `raw_rows` hold the file as read, blank and ragged rows
/// included; an extract built in memory may leave them empty.
#[derive(Debug, Clone, Default)]
pub struct OrderExtract {
    pub headers: Vec<String>,
    pub records: Vec<OrderRecord>,
    pub raw_headers: Vec<String>,
    pub raw_rows: Vec<Vec<String>>,
}

impl OrderExtract {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
