//! Offline ABI commands: signature, encode, decode

use std::path::PathBuf;

use clap::Args;
use klay_primitives::hexutil::{bytes_to_hex, hex_to_bytes};
use serde_json::Value;

use super::{describe_values, load_abi, parse_args};
use crate::{output::Output, CliError};

/// Arguments of `klay signature`
#[derive(Debug, Args)]
pub struct SignatureArgs {
    /// Path to the JSON ABI file
    #[arg(long)]
    pub abi: PathBuf,
    /// Function name; every function is listed when omitted
    pub function: Option<String>,
}

/// Arguments of `klay encode`
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Path to the JSON ABI file
    #[arg(long)]
    pub abi: PathBuf,
    /// Function name
    pub function: String,
    /// Arguments as a JSON array
    #[arg(default_value = "[]")]
    pub args: String,
}

/// Arguments of `klay decode`
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Path to the JSON ABI file
    #[arg(long)]
    pub abi: PathBuf,
    /// Function name
    pub function: String,
    /// `0x` hex data
    pub data: String,
    /// Treat the data as a call payload and decode its arguments
    #[arg(long)]
    pub input: bool,
}

/// Print canonical signatures and selectors
pub fn signature(args: SignatureArgs, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let functions = match &args.function {
        Some(name) => vec![abi.function(name)?],
        None => abi.functions().iter().collect(),
    };

    let entries: Vec<Value> = functions
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name(),
                "signature": f.signature(),
                "selector": bytes_to_hex(&f.selector()),
                "stateMutability": f.state_mutability().as_str(),
            })
        })
        .collect();
    let text = functions
        .iter()
        .map(|f| format!("{}  {}", bytes_to_hex(&f.selector()), f.signature()))
        .collect::<Vec<_>>()
        .join("\n");

    Output::new(json)
        .field_value("functions", Value::Array(entries))
        .message(&text)
        .print();

    Ok(())
}

/// Encode a call payload
pub fn encode(args: EncodeArgs, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let function = abi.function(&args.function)?;
    let tokens = parse_args(function, &args.args)?;
    let call = function.encode_input(&tokens)?;

    Output::new(json)
        .field("signature", function.signature())
        .field("selector", &bytes_to_hex(&call.selector()))
        .field("data", &call.to_hex())
        .message(&call.to_hex())
        .print();

    Ok(())
}

/// Decode return data, or the arguments of a call payload
pub fn decode(args: DecodeArgs, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let function = abi.function(&args.function)?;
    let data = hex_to_bytes(&args.data).map_err(|e| CliError::InvalidHex(e.to_string()))?;

    let (tokens, text) = if args.input {
        let tokens = function.decode_input(&data)?;
        let text = describe_values(function.inputs(), &tokens);
        (tokens, text)
    } else {
        let tokens = function.decode_output(&data)?;
        let text = describe_values(function.outputs(), &tokens);
        (tokens, text)
    };

    Output::new(json)
        .field("function", function.name())
        .field_value("values", serde_json::to_value(&tokens)?)
        .message(&text)
        .print();

    Ok(())
}
