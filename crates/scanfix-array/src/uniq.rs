//! First-occurrence deduplication

use crate::error::{value_kind, ArrayError};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::hash::Hash;

/// Remove duplicate values, keeping the first occurrence of each.
#[must_use]
pub fn uniq<T: Clone + Eq + Hash>(items: &[T]) -> Vec<T> {
    let seen: IndexSet<&T> = items.iter().collect();
    seen.into_iter().cloned().collect()
}

/// Dynamic [`uniq`] over a JSON value, comparing elements structurally.
///
/// Elements are keyed by their compact JSON text. Object keys serialize in
/// sorted order, so objects that differ only in key order are duplicates,
/// while `1` and `1.0` stay distinct.
///
/// # Errors
/// Returns [`ArrayError::InvalidArgument`] if `items` is not a JSON array.
pub fn uniq_value(items: &Value) -> Result<Value, ArrayError> {
    let Value::Array(items) = items else {
        return Err(ArrayError::not_a_sequence(value_kind(items)));
    };

    // Value is not Hash; its canonical text is.
    let mut seen: IndexMap<String, &Value> = IndexMap::with_capacity(items.len());
    for item in items {
        seen.entry(item.to_string()).or_insert(item);
    }
    Ok(Value::Array(seen.into_values().cloned().collect()))
}
