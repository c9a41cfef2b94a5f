//! Fixed-size chunking

use crate::error::{value_kind, ArrayError};
use serde_json::Value;

/// Split `items` into consecutive groups of at most `size` elements.
///
/// Order is preserved and only the final group may be shorter. An empty
/// input yields no groups.
///
/// # Errors
/// Returns [`ArrayError::InvalidArgument`] if `size < 1`.
pub fn chunk<T: Clone>(items: &[T], size: i64) -> Result<Vec<Vec<T>>, ArrayError> {
    let size = checked_size(size)?;
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Dynamic [`chunk`] over a JSON value.
///
/// # Errors
/// Returns [`ArrayError::InvalidArgument`] if `size < 1` or `items` is not
/// a JSON array.
pub fn chunk_value(items: &Value, size: i64) -> Result<Value, ArrayError> {
    let Value::Array(items) = items else {
        return Err(ArrayError::not_a_sequence(value_kind(items)));
    };
    let groups = chunk(items, size)?;
    Ok(Value::Array(groups.into_iter().map(Value::Array).collect()))
}

fn checked_size(size: i64) -> Result<usize, ArrayError> {
    if size < 1 {
        return Err(ArrayError::invalid_size(size));
    }
    // Larger than any addressable slice: a single group.
    Ok(usize::try_from(size).unwrap_or(usize::MAX))
}
