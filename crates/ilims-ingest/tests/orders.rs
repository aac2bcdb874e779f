use std::fs;

use ilims_ingest::{IngestError, read_order_extract};

const HEADER: &str = "Order Number,Patient Name,Physician Full Name,Facility/Hospital Name,\
Order Created By,Country,Sample Category,Order Type,Payment Status,Accession Status,\
Test Ordered,Order Created Date,Accession Timestamp,Sample Collection TimeStamp,\
Total Payable Amount";

fn write_extract(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("daily.csv");
    fs::write(&path, contents).expect("write extract");
    (dir, path)
}

#[test]
fn reads_typed_fields_and_keeps_raw_cells() {
    let contents = format!(
        "\u{feff}{HEADER}\n\
         ORD-1, A. Sharma ,Dr. Rao,City Clinic,a@lab.in,India,Service - Oncology,MOU,Paid,\
         accessioned,BRCA Panel,03-12-2025 10:15,04-12-2025 09:00,03-12-2025 11:00,\"12,500\"\n"
    );
    let (_dir, path) = write_extract(&contents);

    let extract = read_order_extract(&path).expect("read extract");
    assert_eq!(extract.headers[0], "Order Number");
    assert_eq!(extract.len(), 1);

    let record = &extract.records[0];
    assert_eq!(record.order_number, "ORD-1");
    assert_eq!(record.patient_name, "A. Sharma");
    assert_eq!(record.physician_name, "Dr. Rao");
    assert_eq!(record.order_type, "MOU");
    assert_eq!(record.total_payable_amount, Some(12_500.0));
    // Raw cells are not trimmed.
    assert_eq!(record.cells[1], " A. Sharma ");
    assert_eq!(record.cells.len(), extract.headers.len());
    assert!(extract.raw_headers[0].ends_with("Order Number"));
    assert_eq!(extract.raw_rows.len(), 1);
}

#[test]
fn header_only_extract_is_empty_not_an_error() {
    let (_dir, path) = write_extract(&format!("{HEADER}\n"));
    let extract = read_order_extract(&path).expect("read extract");
    assert!(extract.is_empty());
}

#[test]
fn missing_required_column_is_reported() {
    let header = HEADER.replace("Payment Status,", "");
    let (_dir, path) = write_extract(&format!("{header}\n"));
    let error = read_order_extract(&path).unwrap_err();
    match error {
        IngestError::MissingColumn { table, column, .. } => {
            assert_eq!(table, "order extract");
            assert_eq!(column, "Payment Status");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn order_number_column_is_optional() {
    let header = HEADER.replace("Order Number,", "");
    let row = "B. Nair,Dr. Rao,City Clinic,a@lab.in,India,Service,Retail,Paid,Ordered,CBC,\
               05-12-2025,,,900";
    let (_dir, path) = write_extract(&format!("{header}\n{row}\n"));
    let extract = read_order_extract(&path).expect("read extract");
    assert_eq!(extract.records[0].order_number, "");
    assert_eq!(extract.records[0].total_payable_amount, Some(900.0));
}
