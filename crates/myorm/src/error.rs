//! Error types for myorm

use thiserror::Error;

/// Result type alias for myorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building, decoding and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// Target table was never set on the statement
    #[error("Table not set")]
    TableNotSet,

    /// INSERT or UPDATE with nothing to write
    #[error("No data to insert or update")]
    EmptyData,

    /// Rows of a multi-row INSERT carry different column sets
    #[error("Insert rows have mismatched column sets")]
    MismatchedColumns,

    /// SET was called on a statement that is not an UPDATE
    #[error("SET is only valid on UPDATE statements")]
    InvalidSet,

    /// Row not found (only raised by the strict single-row fetch)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The underlying value is database NULL.
    ///
    /// This is a sentinel, not a failure: binders digest it by zeroing the
    /// destination. It only surfaces to callers using the `ScanRow::to_*`
    /// conversions directly.
    #[error("Value is NULL")]
    NullValue,

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Error surfaced by the driver behind the executor, passed through
    #[error("Driver error: {0}")]
    Driver(String),

    /// A transactional body failed and the rollback failed too
    #[error("{source} (rollback failed: {rollback})")]
    Rollback {
        source: Box<OrmError>,
        rollback: String,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is the NULL sentinel
    pub fn is_null_value(&self) -> bool {
        matches!(self, Self::NullValue)
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_preserves_origin() {
        let err = OrmError::Rollback {
            source: Box::new(OrmError::Driver("deadlock".into())),
            rollback: "connection lost".into(),
        };
        assert_eq!(
            err.to_string(),
            "Driver error: deadlock (rollback failed: connection lost)"
        );
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "Driver error: deadlock");
    }

    #[test]
    fn null_sentinel_is_distinguishable() {
        assert!(OrmError::NullValue.is_null_value());
        assert!(!OrmError::decode("id", "bad int").is_null_value());
    }
}
