pub mod error;
pub mod header;
pub mod lookup;
pub mod orders;
pub mod table;
pub mod workbook;

pub use error::{IngestError, Result};
pub use header::HeaderIndex;
pub use lookup::{LookupSchema, PHYSICIAN_LOOKUP, STAFF_LOOKUP, lookup_from_table, read_lookup};
pub use orders::{order_extract_from_table, parse_amount, read_order_extract};
pub use table::{SourceTable, normalize_header, read_csv_table};
pub use workbook::read_first_sheet;
