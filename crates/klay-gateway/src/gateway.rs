//! Gateway - contract reads, writes and node queries over JSON-RPC

use std::sync::atomic::{AtomicU64, Ordering};

use klay_abi::{Abi, EncodedCall, Function, Token};
use klay_primitives::hexutil::{
    bytes_to_hex, hex_to_bytes, u256_from_hex_quantity, u256_to_hex_quantity, u64_from_hex_quantity,
};
use klay_primitives::{Address, H256, U256};
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::{BlockTag, CallArgs, LogFilter, RpcRequest, TxArgs};
use crate::transport::Transport;
use crate::{GatewayConfig, GatewayError};

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Outcome of [`Gateway::invoke`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Read call: decoded outputs
    Call(Vec<Token>),
    /// Write call: transaction hash as returned by the node
    Transaction(String),
}

/// Contract gateway.
///
/// Holds an immutable configuration and a transport; safe to share between
/// tasks.
pub struct Gateway {
    config: GatewayConfig,
    transport: Box<dyn Transport>,
    next_id: AtomicU64,
}

impl Gateway {
    /// Create a gateway over HTTP
    #[cfg(feature = "http")]
    pub fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }

    /// Create a gateway with a custom transport
    pub fn new(config: GatewayConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            next_id: AtomicU64::new(1),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send one request and unwrap the envelope
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "sending rpc request");

        let response = self.transport.send(RpcRequest::new(id, method, params)).await?;
        response.into_result().map_err(|e| {
            if let GatewayError::RemoteRpc { code, message } = &e {
                warn!(method, id, code, %message, "remote rpc error");
            }
            e
        })
    }

    // ==================== Contract Calls ====================

    /// Read call with a prepared payload; returns the raw result bytes
    pub async fn call_raw(&self, contract: &Address, call: &EncodedCall) -> Result<Vec<u8>, GatewayError> {
        let args = CallArgs {
            from: self.config.account,
            to: *contract,
            data: call.to_hex(),
        };
        let result = self
            .request(
                &self.config.call_method,
                vec![serde_json::to_value(args)?, Value::String("latest".to_string())],
            )
            .await?;
        let hex = expect_string(result, &self.config.call_method)?;
        Ok(hex_to_bytes(&hex)?)
    }

    /// Read call: encode, query, decode the outputs
    pub async fn call(
        &self,
        contract: &Address,
        function: &Function,
        args: &[Token],
    ) -> Result<Vec<Token>, GatewayError> {
        let call = function.encode_input(args)?;
        let data = self.call_raw(contract, &call).await?;
        let outputs = function.decode_output(&data)?;
        debug!(function = function.name(), outputs = outputs.len(), "decoded call result");
        Ok(outputs)
    }

    /// Write call with a prepared payload; returns the transaction hash
    pub async fn send_raw(&self, contract: &Address, call: &EncodedCall) -> Result<String, GatewayError> {
        self.submit(Some(*contract), call.to_hex()).await
    }

    /// Submit a transaction from the configured account
    async fn submit(&self, to: Option<Address>, input: String) -> Result<String, GatewayError> {
        let tx = TxArgs {
            from: self.config.require_account()?,
            to,
            gas: u256_to_hex_quantity(&U256::from(self.config.gas_limit)),
            value: "0x0".to_string(),
            input,
        };
        let result = self
            .request(&self.config.send_method, vec![serde_json::to_value(tx)?])
            .await?;
        expect_string(result, &self.config.send_method)
    }

    /// Write call: encode and submit a transaction
    pub async fn send(
        &self,
        contract: &Address,
        function: &Function,
        args: &[Token],
    ) -> Result<String, GatewayError> {
        let call = function.encode_input(args)?;
        self.send_raw(contract, &call).await
    }

    /// Look up `name` and run it as a read for view/pure functions,
    /// otherwise as a write
    pub async fn invoke(
        &self,
        abi: &Abi,
        contract: &Address,
        name: &str,
        args: &[Token],
    ) -> Result<Invocation, GatewayError> {
        let function = abi.function(name)?;
        if function.state_mutability().is_read_only() {
            Ok(Invocation::Call(self.call(contract, function, args).await?))
        } else {
            Ok(Invocation::Transaction(self.send(contract, function, args).await?))
        }
    }

    // ==================== Deployment ====================

    /// Deploy a prepared creation payload; returns the transaction hash
    pub async fn deploy_raw(&self, code: &[u8]) -> Result<String, GatewayError> {
        self.submit(None, bytes_to_hex(code)).await
    }

    /// Deploy `bytecode` with encoded constructor arguments
    pub async fn deploy(&self, abi: &Abi, bytecode: &[u8], args: &[Token]) -> Result<String, GatewayError> {
        let code = abi.encode_constructor(bytecode, args)?;
        debug!(code_len = code.len(), "deploying contract");
        self.deploy_raw(&code).await
    }

    // ==================== Node Queries ====================

    /// Get the current block number
    pub async fn block_number(&self) -> Result<u64, GatewayError> {
        let result = self.request("klay_blockNumber", vec![]).await?;
        Ok(u64_from_hex_quantity(&expect_string(result, "klay_blockNumber")?)?)
    }

    /// Get the balance of an address at the latest block
    pub async fn get_balance(&self, address: &Address) -> Result<U256, GatewayError> {
        let result = self
            .request(
                "klay_getBalance",
                vec![Value::String(address.to_hex()), Value::String("latest".to_string())],
            )
            .await?;
        Ok(u256_from_hex_quantity(&expect_string(result, "klay_getBalance")?)?)
    }

    /// Get a transaction receipt; `None` while the transaction is pending
    pub async fn get_transaction_receipt(&self, hash: &H256) -> Result<Option<Value>, GatewayError> {
        let result = self
            .request("klay_getTransactionReceipt", vec![Value::String(hash.to_hex())])
            .await?;
        Ok(match result {
            Value::Null => None,
            receipt => Some(receipt),
        })
    }

    /// Logs emitted by `address` between two blocks, inclusive
    pub async fn get_logs(
        &self,
        from_block: BlockTag,
        to_block: BlockTag,
        address: &Address,
    ) -> Result<Vec<Value>, GatewayError> {
        let filter = LogFilter {
            from_block,
            to_block,
            address: *address,
        };
        let result = self
            .request("klay_getLogs", vec![serde_json::to_value(filter)?])
            .await?;
        match result {
            Value::Array(logs) => Ok(logs),
            other => Err(GatewayError::MalformedResponse(format!(
                "klay_getLogs returned {} instead of an array",
                other
            ))),
        }
    }
}

fn expect_string(value: Value, method: &str) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(GatewayError::MalformedResponse(format!(
            "{} returned {} instead of a hex string",
            method, other
        ))),
    }
}
