//! Staff assignment lookups and case-insensitive name sets.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}

/// Staff assignee and region attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub staff_assignee: Option<String>,
    pub region: Option<String>,
}

impl Assignment {
    pub fn new(staff_assignee: Option<String>, region: Option<String>) -> Self {
        Self {
            staff_assignee: non_blank(staff_assignee),
            region: non_blank(region),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.staff_assignee.is_some() && self.region.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.staff_assignee.is_none() && self.region.is_none()
    }

    /// Copy fields from `other` only where this assignment has none.
    pub fn fill_missing(&mut self, other: &Assignment) {
        if self.staff_assignee.is_none() {
            self.staff_assignee.clone_from(&other.staff_assignee);
        }
        if self.region.is_none() {
            self.region.clone_from(&other.region);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Identity → assignment map where the first entry for a key wins.
#[derive(Debug, Clone, Default)]
pub struct AssignmentLookup {
    name: String,
    entries: HashMap<String, Assignment>,
    duplicate_keys: usize,
}

impl AssignmentLookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            duplicate_keys: 0,
        }
    }

    pub fn from_entries<I, K>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Assignment)>,
        K: AsRef<str>,
    {
        let mut lookup = Self::new(name);
        for (key, assignment) in entries {
            lookup.insert(key.as_ref(), assignment);
        }
        lookup
    }

    /// Insert an entry unless the key is blank or already present.
    ///
    /// Returns true when the entry was stored.
    pub fn insert(&mut self, key: &str, assignment: Assignment) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => {
                self.duplicate_keys += 1;
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(assignment);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Assignment> {
        self.entries.get(key.trim())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows skipped because their key was already mapped.
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}
