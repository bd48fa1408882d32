//! Common error types for primitives

use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Odd digit count or a non-hex character
    #[error("malformed hex: {0}")]
    MalformedHex(String),

    /// Input does not fit in the requested width
    #[error("value too large: {len} bytes does not fit in {width}")]
    ValueTooLarge {
        /// Input length in bytes
        len: usize,
        /// Target width in bytes
        width: usize,
    },

    /// Fixed-size type built from a slice of the wrong length
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },
}
