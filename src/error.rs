//! Error types for RelState
//!
//! This module defines all error types used throughout the persistence layer.

use thiserror::Error;

/// The main error type for RelState
#[derive(Error, Debug)]
pub enum Error {
    // ========== Serialization Errors ==========
    #[error("serialization error: unknown storage tag {0:#04x}")]
    UnknownStorageTag(u8),

    #[error("serialization error: unknown wire tag {0:?}")]
    UnknownWireTag(char),

    #[error("serialization error: {0}")]
    MalformedPayload(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ========== Lookup Errors ==========
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),

    // ========== Caller Input Errors ==========
    #[error("invalid {what}: {value}")]
    InvalidValue { what: String, value: String },

    // ========== Engine Errors ==========
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a malformed-payload serialization error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedPayload(message.into())
    }

    /// Shorthand for a caller-supplied value outside its expected domain
    pub fn invalid_value(what: impl Into<String>, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            what: what.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for RelState operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownStorageTag(0x7f);
        assert_eq!(
            err.to_string(),
            "serialization error: unknown storage tag 0x7f"
        );

        let err = Error::ColumnNotFound("balance".to_string());
        assert_eq!(err.to_string(), "column 'balance' does not exist");

        let err = Error::invalid_value("row selector", "(9, 3)");
        assert_eq!(err.to_string(), "invalid row selector: (9, 3)");
    }
}
