//! Error types for array utilities

/// Array utility errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    /// Input rejected before any work was done
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ArrayError {
    /// Chunk size below one
    #[inline]
    #[must_use]
    pub fn invalid_size(size: i64) -> Self {
        Self::InvalidArgument(format!("chunk size must be at least 1, got {size}"))
    }

    /// Input value is not an array
    #[inline]
    #[must_use]
    pub fn not_a_sequence(kind: &str) -> Self {
        Self::InvalidArgument(format!("expected an array, got {kind}"))
    }

    /// Check if this is an invalid-argument error
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Human name of a JSON value's kind, used in error messages
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
