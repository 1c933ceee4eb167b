//! Row snapshot and diff computation.
//!
//! Pure functions over [`RowImage`]s. Excluded-column names that do not
//! exist on a row are ignored, so one exclusion list can be shared across
//! heterogeneous tables.

use std::collections::BTreeSet;

use rowtrail_core::RowImage;

/// Snapshot of a row image with excluded columns removed.
///
/// Used for the `row_data` of Insert (new row), Delete and Update (old
/// row) records.
pub fn snapshot(row: &RowImage, excluded: &BTreeSet<String>) -> RowImage {
    row.iter()
        .filter(|(key, _)| !excluded.contains(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// The subset of `new` whose values differ from `old`, minus excluded
/// columns.
///
/// Keys present in `old` but dropped from `new` map to JSON null. An
/// empty result means "no reportable change": a row-level Update whose
/// diff is empty produces no audit record at all.
pub fn diff(old: &RowImage, new: &RowImage, excluded: &BTreeSet<String>) -> RowImage {
    let mut changed = RowImage::new();

    for (key, new_value) in new {
        if excluded.contains(key) {
            continue;
        }
        if old.get(key) != Some(new_value) {
            changed.insert(key.clone(), new_value.clone());
        }
    }

    for key in old.keys() {
        if excluded.contains(key) || new.contains_key(key) {
            continue;
        }
        changed.insert(key.clone(), serde_json::Value::Null);
    }

    changed
}
