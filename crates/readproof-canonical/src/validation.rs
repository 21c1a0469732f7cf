use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When encoded bytes decode to the wrong length.
    #[error("{field} decodes to {actual} bytes, expected {expected}")]
    WrongLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Decoded length in bytes.
        actual: usize,
    },
    /// When a base64 payload cannot be decoded at all.
    #[error("{field} is not valid base64url: {reason}")]
    Undecodable {
        /// Field name that failed validation.
        field: &'static str,
        /// Decoder message.
        reason: String,
    },
}
