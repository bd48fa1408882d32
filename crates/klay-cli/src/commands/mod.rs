//! Subcommand implementations

pub mod abi;
pub mod contract;
pub mod node;

use std::path::Path;

use klay_abi::{tokens_from_json, Abi, Function, Param, Token};
use klay_primitives::{Address, H256};
use serde_json::Value;

use crate::CliError;

/// Read and parse a JSON ABI file
pub fn load_abi(path: &Path) -> Result<Abi, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(Abi::from_json(&content)?)
}

/// Parse a JSON array of raw argument values
pub fn parse_json_array(raw: &str) -> Result<Vec<Value>, CliError> {
    serde_json::from_str(raw)
        .map_err(|e| CliError::InvalidInput(format!("arguments must be a JSON array: {}", e)))
}

/// Parse a JSON array of arguments for `function`
pub fn parse_args(function: &Function, raw: &str) -> Result<Vec<Token>, CliError> {
    Ok(tokens_from_json(function.inputs(), &parse_json_array(raw)?)?)
}

/// Parse an address argument
pub fn parse_address(s: &str) -> Result<Address, CliError> {
    Address::from_hex(s).map_err(|e| CliError::InvalidAddress(format!("{}: {}", s, e)))
}

/// Parse a transaction hash argument
pub fn parse_hash(s: &str) -> Result<H256, CliError> {
    H256::from_hex(s).map_err(|e| CliError::InvalidHex(format!("{}: {}", s, e)))
}

/// One line per value: `name (type): value`
pub fn describe_values(params: &[Param], tokens: &[Token]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let value = match token.to_json() {
                Value::String(s) => s,
                other => other.to_string(),
            };
            match params.get(i) {
                Some(param) if !param.name.is_empty() => {
                    format!("{} ({}): {}", param.name, param.kind, value)
                }
                Some(param) => format!("[{}] ({}): {}", i, param.kind, value),
                None => format!("[{}]: {}", i, value),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
