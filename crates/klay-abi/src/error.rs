//! ABI error types

use klay_primitives::PrimitiveError;
use thiserror::Error;

/// ABI definition, encoding and decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// ABI description could not be parsed
    #[error("ABI parse error: {0}")]
    AbiParse(String),

    /// No function with the given name
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    /// Wrong number of arguments
    #[error("Arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared input count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Argument does not fit its declared type
    #[error("Type mismatch for parameter `{param}` ({expected}): {reason}")]
    TypeMismatch {
        /// Parameter name, or `#<index>` when unnamed
        param: String,
        /// Canonical declared type
        expected: String,
        /// What was wrong with the value
        reason: String,
    },

    /// An offset or length points past the end of the buffer
    #[error("Truncated data: need {needed} bytes at offset {offset}, have {available}")]
    TruncatedData {
        /// Position of the read
        offset: usize,
        /// Bytes required from that position
        needed: usize,
        /// Buffer length
        available: usize,
    },

    /// Buffer too short for the head region of the declared outputs
    #[error("Decode length mismatch: expected at least {expected} bytes, got {got}")]
    DecodeLengthMismatch {
        /// Minimum head size
        expected: usize,
        /// Buffer length
        got: usize,
    },

    /// Decoded string is not UTF-8
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(String),

    /// Call payload targets another function
    #[error("Selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch {
        /// Selector of the function used to decode
        expected: String,
        /// Selector found in the payload
        got: String,
    },

    /// Hex conversion failure
    #[error(transparent)]
    Hex(#[from] PrimitiveError),
}
