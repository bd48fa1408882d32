//! Gateway configuration

use klay_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// Gateway configuration.
///
/// Built once and handed to [`Gateway::new`](crate::Gateway::new); never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Value of the `Authorization` header, if the endpoint needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    /// Value of the `x-chain-id` header
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Sender account for write calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Address>,
    /// Gas limit attached to write calls
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Method used for read calls
    #[serde(default = "default_call_method")]
    pub call_method: String,
    /// Method used for write calls
    #[serde(default = "default_send_method")]
    pub send_method: String,
}

fn default_rpc_url() -> String {
    "https://node-api.klaytnapi.com/v1/klaytn".to_string()
}

fn default_chain_id() -> u64 {
    1001
}

fn default_gas_limit() -> u64 {
    8_000_000
}

fn default_call_method() -> String {
    "klay_call".to_string()
}

fn default_send_method() -> String {
    "klay_sendTransaction".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            authorization: None,
            chain_id: default_chain_id(),
            account: None,
            gas_limit: default_gas_limit(),
            call_method: default_call_method(),
            send_method: default_send_method(),
        }
    }
}

impl GatewayConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, GatewayError> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, GatewayError> {
        toml::to_string_pretty(self).map_err(|e| GatewayError::Serialization(e.to_string()))
    }

    /// Sender account, required for write calls
    pub fn require_account(&self) -> Result<Address, GatewayError> {
        self.account
            .ok_or_else(|| GatewayError::Config("no account configured for write calls".to_string()))
    }
}
