//! Gateway error types

use klay_abi::AbiError;
use klay_primitives::PrimitiveError;
use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Error object returned by the remote node
    #[error("RPC error: {code} - {message}")]
    RemoteRpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response envelope is not usable
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encoding or decoding failure
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Hex conversion failure
    #[error(transparent)]
    Hex(#[from] PrimitiveError),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(e: toml::de::Error) -> Self {
        GatewayError::Config(e.to_string())
    }
}
