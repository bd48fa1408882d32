//! Node query commands

use klay_gateway::{BlockTag, Gateway, GatewayConfig};
use klay_primitives::hexutil::u256_to_hex_quantity;

use super::{parse_address, parse_hash};
use crate::{output::Output, CliError};

/// Print the current block number
pub async fn block_number(config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let gateway = Gateway::connect(config.clone())?;
    let number = gateway.block_number().await?;

    Output::new(json)
        .field_u64("block_number", number)
        .message(&format!("Block number: {}", number))
        .print();

    Ok(())
}

/// Print the balance of an address
pub async fn balance(address: &str, config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let address = parse_address(address)?;
    let gateway = Gateway::connect(config.clone())?;
    let balance = gateway.get_balance(&address).await?;

    Output::new(json)
        .field("address", &address.to_hex())
        .field("balance", &balance.to_string())
        .field("balance_hex", &u256_to_hex_quantity(&balance))
        .message(&format!("Balance: {} peb", balance))
        .print();

    Ok(())
}

/// Print a transaction receipt
pub async fn receipt(hash: &str, config: &GatewayConfig, json: bool) -> Result<(), CliError> {
    let hash = parse_hash(hash)?;
    let gateway = Gateway::connect(config.clone())?;

    let output = match gateway.get_transaction_receipt(&hash).await? {
        Some(receipt) => Output::new(json)
            .field("hash", &hash.to_hex())
            .message(&serde_json::to_string_pretty(&receipt)?)
            .field_value("receipt", receipt),
        None => Output::new(json)
            .field("hash", &hash.to_hex())
            .field("status", "pending")
            .message(&format!("Receipt not available yet: {}", hash.to_hex())),
    };
    output.print();

    Ok(())
}

/// Print the logs a contract emitted between two blocks
pub async fn logs(
    contract: &str,
    from_block: BlockTag,
    to_block: BlockTag,
    config: &GatewayConfig,
    json: bool,
) -> Result<(), CliError> {
    let contract = parse_address(contract)?;
    let gateway = Gateway::connect(config.clone())?;
    let logs = gateway.get_logs(from_block, to_block, &contract).await?;

    let text = logs
        .iter()
        .map(|log| log.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    Output::new(json)
        .field("address", &contract.to_hex())
        .field_u64("count", logs.len() as u64)
        .message(&format!("{} log(s) from {}\n{}", logs.len(), contract.to_hex(), text))
        .field_value("logs", serde_json::Value::Array(logs))
        .print();

    Ok(())
}
