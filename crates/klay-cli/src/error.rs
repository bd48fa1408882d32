//! CLI error types

use klay_abi::AbiError;
use klay_gateway::GatewayError;
use thiserror::Error;

/// Errors surfaced by `klay` subcommands
#[derive(Debug, Error)]
pub enum CliError {
    /// Address argument is not 20 bytes of hex
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Hex argument (payload or hash) could not be parsed
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Arguments are not a JSON array
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ABI parsing, encoding or decoding failed
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Node request failed or returned an error
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// ABI file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be rendered as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file missing or unreadable
    #[error("Config error: {0}")]
    Config(String),
}
