//! Case-insensitive header resolution with aliases.

use std::collections::HashMap;

use ilims_model::CaseInsensitiveSet;

use crate::error::{IngestError, Result};
use crate::table::normalize_header;

/// Maps header names to column positions for one table.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    table: String,
    names: CaseInsensitiveSet,
    positions: HashMap<String, usize>,
    headers: Vec<String>,
}

impl HeaderIndex {
    pub fn new(table: impl Into<String>, headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut positions = HashMap::new();
        for (idx, header) in normalized.iter().enumerate() {
            positions.entry(header.clone()).or_insert(idx);
        }
        Self {
            table: table.into(),
            names: CaseInsensitiveSet::new(&normalized),
            positions,
            headers: normalized,
        }
    }

    /// Position of the first alias present in the header row.
    pub fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let name = self.names.get(&normalize_header(alias))?;
            self.positions.get(name).copied()
        })
    }

    /// Like [`HeaderIndex::find`], but a missing column is a schema error.
    pub fn require(&self, aliases: &[&str]) -> Result<usize> {
        self.find(aliases).ok_or_else(|| IngestError::MissingColumn {
            table: self.table.clone(),
            column: aliases.first().copied().unwrap_or_default().to_string(),
            available: self.headers.join(", "),
        })
    }
}
