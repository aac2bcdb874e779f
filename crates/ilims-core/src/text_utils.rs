//! Label normalization shared by every status/category comparison.

/// Title-case like a spreadsheet `PROPER()`: the first letter of every
/// alphabetic run is upper-cased and the rest lower-cased.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}

/// Trim surrounding whitespace, then title-case.
pub fn normalize_label(value: &str) -> String {
    title_case(value.trim())
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
