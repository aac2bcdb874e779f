//! Order-preserving deduplication.

use std::collections::BTreeSet;

/// Keep the first row for every distinct key, preserving input order.
pub fn dedupe_by_key<T, K, F>(rows: Vec<T>, mut key: F) -> Vec<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut seen = BTreeSet::new();
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

/// Amount as an exact-equality key; `f64` itself is not `Ord`.
pub fn amount_key(amount: Option<f64>) -> Option<u64> {
    amount.map(|value| if value == 0.0 { 0 } else { value.to_bits() })
}
