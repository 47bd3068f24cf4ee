//! Error types for canvas operations.
//!
//! Memo decoding has its own error type because its failures are expected
//! noise on a shared ledger, not faults. Everything else surfaces as
//! [`CanvasError`].

use thiserror::Error;

/// Result type for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors raised by the canvas core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// A placement handed to the encoder was out of range or had a bad color.
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// A configuration value cannot be used.
    #[error("Invalid value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A cell key string did not have the `x,y` shape.
    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    /// A consensus timestamp string could not be parsed.
    #[error("Invalid consensus timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Why a memo did not yield a pixel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoError {
    /// Absent, empty, or carrying some other application's text.
    #[error("memo does not belong to this canvas")]
    NotOurMemo,

    /// Tagged as ours, but the payload is unusable.
    #[error("malformed pixel memo: {0}")]
    Malformed(String),
}

// Convenience constructors
impl CanvasError {
    pub fn invalid_placement(msg: impl Into<String>) -> Self {
        CanvasError::InvalidPlacement(msg.into())
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CanvasError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CanvasError::invalid_config("memo_tag", "must not be empty");
        assert_eq!(err.to_string(), "Invalid value for memo_tag: must not be empty");

        let err = MemoError::Malformed("missing field `c`".into());
        assert!(err.to_string().contains("missing field"));
    }
}
