//! Staff and physician assignment lookups.

use std::path::Path;

use ilims_model::{Assignment, AssignmentLookup};
use tracing::{info, warn};

use crate::error::Result;
use crate::header::HeaderIndex;
use crate::table::{SourceTable, read_csv_table};
use crate::workbook::read_first_sheet;

/// Expected columns of an assignment lookup, each with accepted aliases.
#[derive(Debug, Clone, Copy)]
pub struct LookupSchema {
    pub name: &'static str,
    pub key: &'static [&'static str],
    pub staff_assignee: &'static [&'static str],
    pub region: &'static [&'static str],
}

/// Order-creator email → ASM and region.
pub const STAFF_LOOKUP: LookupSchema = LookupSchema {
    name: "staff lookup",
    key: &["Email - Id", "Order Created By"],
    staff_assignee: &["ASM NAME", "ASM"],
    region: &["Region"],
};

/// Physician name → ASM and region.
pub const PHYSICIAN_LOOKUP: LookupSchema = LookupSchema {
    name: "physician lookup",
    key: &["Doctor Name", "Physician Full Name"],
    staff_assignee: &["ASM", "ASM NAME"],
    region: &["Region"],
};

/// Load a lookup table from a spreadsheet, or from CSV when the file has a
/// `.csv` extension.
pub fn read_lookup(path: &Path, schema: &LookupSchema) -> Result<AssignmentLookup> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let table = if is_csv {
        read_csv_table(path)?
    } else {
        read_first_sheet(path)?
    };
    let lookup = lookup_from_table(&table, schema)?;
    info!(
        lookup = schema.name,
        path = %path.display(),
        entries = lookup.len(),
        "loaded lookup table"
    );
    Ok(lookup)
}

/// Build a first-match-wins lookup; every schema column must be present.
pub fn lookup_from_table(table: &SourceTable, schema: &LookupSchema) -> Result<AssignmentLookup> {
    let index = HeaderIndex::new(schema.name, &table.headers);
    let key_col = index.require(schema.key)?;
    let asm_col = index.require(schema.staff_assignee)?;
    let region_col = index.require(schema.region)?;

    let mut lookup = AssignmentLookup::new(schema.name);
    for row in &table.rows {
        let cell = |idx: usize| row.get(idx).cloned();
        lookup.insert(
            row.get(key_col).map(String::as_str).unwrap_or_default(),
            Assignment::new(cell(asm_col), cell(region_col)),
        );
    }
    if lookup.duplicate_keys() > 0 {
        warn!(
            lookup = schema.name,
            duplicate_keys = lookup.duplicate_keys(),
            "duplicate lookup keys ignored; first occurrence kept"
        );
    }
    Ok(lookup)
}
