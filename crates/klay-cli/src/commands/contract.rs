//! Contract commands: read calls, transactions and deployment

use std::path::PathBuf;

use clap::Args;
use klay_abi::tokens_from_json;
use klay_gateway::{Gateway, GatewayConfig};
use klay_primitives::hexutil::hex_to_bytes;
use tracing::info;

use super::{describe_values, load_abi, parse_address, parse_args, parse_json_array};
use crate::{output::Output, CliError};

/// Arguments shared by `klay call` and `klay send`
#[derive(Debug, Args)]
pub struct ContractArgs {
    /// Path to the JSON ABI file
    #[arg(long)]
    pub abi: PathBuf,
    /// Contract address
    #[arg(long)]
    pub contract: String,
    /// Function name
    pub function: String,
    /// Arguments as a JSON array
    #[arg(default_value = "[]")]
    pub args: String,
}

/// Arguments of `klay deploy`
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Path to the JSON ABI file
    #[arg(long)]
    pub abi: PathBuf,
    /// Path to the creation bytecode as hex (compiler `.bin` output)
    #[arg(long)]
    pub bin: PathBuf,
    /// Constructor arguments as a JSON array
    #[arg(default_value = "[]")]
    pub args: String,
}

/// Run a read call and print the decoded outputs
pub async fn call(args: ContractArgs, config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let function = abi.function(&args.function)?;
    let contract = parse_address(&args.contract)?;
    let tokens = parse_args(function, &args.args)?;

    let gateway = Gateway::connect(config.clone())?;
    let outputs = gateway.call(&contract, function, &tokens).await?;

    Output::new(json)
        .field("function", function.name())
        .field_value("values", serde_json::to_value(&outputs)?)
        .message(&describe_values(function.outputs(), &outputs))
        .print();

    Ok(())
}

/// Submit a transaction and print its hash
pub async fn send(args: ContractArgs, config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let function = abi.function(&args.function)?;
    let contract = parse_address(&args.contract)?;
    let tokens = parse_args(function, &args.args)?;

    if function.state_mutability().is_read_only() {
        info!(function = function.name(), "sending a transaction to a read-only function");
    }

    let gateway = Gateway::connect(config.clone())?;
    let hash = gateway.send(&contract, function, &tokens).await?;

    Output::new(json)
        .field("function", function.name())
        .field("hash", &hash)
        .message(&format!("Transaction sent: {}", hash))
        .print();

    Ok(())
}

/// Deploy a contract and print the transaction hash
pub async fn deploy(args: DeployArgs, config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let abi = load_abi(&args.abi)?;
    let bytecode = std::fs::read_to_string(&args.bin)?;
    let bytecode = hex_to_bytes(bytecode.trim())
        .map_err(|e| CliError::InvalidHex(format!("{}: {}", args.bin.display(), e)))?;
    let params = abi.constructor().map(|c| c.inputs()).unwrap_or_default();
    let tokens = tokens_from_json(params, &parse_json_array(&args.args)?)?;

    let gateway = Gateway::connect(config.clone())?;
    let hash = gateway.deploy(&abi, &bytecode, &tokens).await?;

    Output::new(json)
        .field("hash", &hash)
        .message(&format!("Deployment sent: {}", hash))
        .print();

    Ok(())
}
