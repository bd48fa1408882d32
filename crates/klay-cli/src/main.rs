//! # klay-cli
//!
//! Command-line interface for the klay contract gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Offline ABI commands
//! klay signature --abi Store.json getMenu
//! klay encode --abi Store.json addOrder '[1, [2, 3], "15000"]'
//! klay decode --abi Store.json getMenu 0x...
//!
//! # Contract calls
//! klay call --abi Store.json --contract 0x... getMenu '[0]'
//! klay send --abi Store.json --contract 0x... denyOrder '[4]'
//! klay deploy --abi Store.json --bin Store.bin '["Store", "0x..."]'
//!
//! # Node queries
//! klay block-number
//! klay balance 0x...
//! klay receipt 0x...
//! klay logs 0x... --from 0x10
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::CliError;
pub use output::Output;

use klay_gateway::{BlockTag, GatewayConfig};

/// Klaytn contract gateway CLI
#[derive(Parser, Debug)]
#[command(name = "klay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Configuration file (default: ~/.klay/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print canonical signatures and selectors
    Signature(commands::abi::SignatureArgs),
    /// Encode a call payload
    Encode(commands::abi::EncodeArgs),
    /// Decode return data or a call payload
    Decode(commands::abi::DecodeArgs),
    /// Read contract state
    Call(commands::contract::ContractArgs),
    /// Submit a transaction
    Send(commands::contract::ContractArgs),
    /// Deploy a contract
    Deploy(commands::contract::DeployArgs),
    /// Query current block number
    BlockNumber,
    /// Query the balance of an address
    Balance {
        /// Account address
        address: String,
    },
    /// Query a transaction receipt
    Receipt {
        /// Transaction hash
        hash: String,
    },
    /// Query logs emitted by a contract
    Logs {
        /// Contract address
        address: String,
        /// First block (number, "earliest" or "latest")
        #[arg(long, default_value = "earliest")]
        from: BlockTag,
        /// Last block (number, "earliest" or "latest")
        #[arg(long, default_value = "latest")]
        to: BlockTag,
    },
    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": format!("{:#}", e),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    tracing::debug!(rpc_url = %config.rpc_url, "configuration loaded");

    let json = cli.json;
    match cli.command {
        Commands::Signature(args) => commands::abi::signature(args, json)?,
        Commands::Encode(args) => commands::abi::encode(args, json)?,
        Commands::Decode(args) => commands::abi::decode(args, json)?,
        Commands::Call(args) => commands::contract::call(args, &config, json).await?,
        Commands::Send(args) => commands::contract::send(args, &config, json).await?,
        Commands::Deploy(args) => commands::contract::deploy(args, &config, json).await?,
        Commands::BlockNumber => commands::node::block_number(&config, json).await?,
        Commands::Balance { address } => commands::node::balance(&address, &config, json).await?,
        Commands::Receipt { hash } => commands::node::receipt(&hash, &config, json).await?,
        Commands::Logs { address, from, to } => {
            commands::node::logs(&address, from, to, &config, json).await?
        }
        Commands::Config { show } => handle_config(&config, show, json)?,
    }

    Ok(())
}

fn handle_config(config: &GatewayConfig, show: bool, json: bool) -> Result<(), CliError> {
    if !show {
        Output::new(json)
            .message("Use --show to display the configuration")
            .print();
        return Ok(());
    }

    Output::new(json)
        .field("rpc_url", &config.rpc_url)
        .field_u64("chain_id", config.chain_id)
        .field_value(
            "account",
            config
                .account
                .map(|a| serde_json::Value::String(a.to_hex()))
                .unwrap_or(serde_json::Value::Null),
        )
        .field_u64("gas_limit", config.gas_limit)
        .field("call_method", &config.call_method)
        .field("send_method", &config.send_method)
        .field_value("authorization", serde_json::Value::Bool(config.authorization.is_some()))
        .message(&format!(
            "RPC URL: {}\nChain ID: {}\nAccount: {}\nGas Limit: {}\nCall Method: {}\nSend Method: {}\nAuthorization: {}",
            config.rpc_url,
            config.chain_id,
            config.account.map(|a| a.to_hex()).unwrap_or_else(|| "(none)".to_string()),
            config.gas_limit,
            config.call_method,
            config.send_method,
            if config.authorization.is_some() { "set" } else { "(none)" },
        ))
        .print();

    Ok(())
}
