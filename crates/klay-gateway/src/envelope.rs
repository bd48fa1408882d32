//! JSON-RPC 2.0 envelope types

use std::fmt;
use std::str::FromStr;

use klay_primitives::hexutil::u64_from_hex_quantity;
use klay_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::GatewayError;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
    /// Request ID
    pub id: u64,
}

impl RpcRequest {
    /// Create a request
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create a new error object
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// JSON-RPC 2.0 response.
///
/// A present `"result": null` is kept as `Some(Value::Null)`, distinct from
/// an absent result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// JSON-RPC version
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request ID echoed back
    #[serde(default)]
    pub id: Option<Value>,
    /// Result (on success)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    /// Create success response
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Some(Value::from(id)),
            result: Some(result),
            error: None,
        }
    }

    /// Create error response
    pub fn failure(id: u64, error: RpcError) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Some(Value::from(id)),
            result: None,
            error: Some(error),
        }
    }

    /// Split into the result value or the remote error.
    ///
    /// Exactly one of `result` and `error` must be present.
    pub fn into_result(self) -> Result<Value, GatewayError> {
        match (self.result, self.error) {
            (Some(result), None) => Ok(result),
            (None, Some(error)) => Err(GatewayError::RemoteRpc {
                code: error.code,
                message: error.message,
            }),
            (Some(_), Some(_)) => Err(GatewayError::MalformedResponse(
                "response carries both result and error".to_string(),
            )),
            (None, None) => Err(GatewayError::MalformedResponse(
                "response carries neither result nor error".to_string(),
            )),
        }
    }
}

/// Call object for read calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallArgs {
    /// Caller, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Contract address
    pub to: Address,
    /// `0x` payload
    pub data: String,
}

/// Transaction object for write calls and deployments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxArgs {
    /// Sender account
    pub from: Address,
    /// Contract address; absent for a deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit as a hex quantity
    pub gas: String,
    /// Attached value as a hex quantity
    pub value: String,
    /// `0x` payload
    pub input: String,
}

/// Block reference in a log filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// Block number, sent as a hex quantity
    Number(u64),
    /// Most recent block
    Latest,
    /// Genesis block
    Earliest,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Number(n) => write!(f, "{:#x}", n),
            BlockTag::Latest => write!(f, "latest"),
            BlockTag::Earliest => write!(f, "earliest"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = String;

    /// `latest`, `earliest`, a `0x` hex quantity or a decimal number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            _ if s.starts_with("0x") || s.starts_with("0X") => u64_from_hex_quantity(s)
                .map(BlockTag::Number)
                .map_err(|e| format!("invalid block {}: {}", s, e)),
            _ => s
                .parse()
                .map(BlockTag::Number)
                .map_err(|_| format!("invalid block {}", s)),
        }
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Filter object for `klay_getLogs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// First block, inclusive
    pub from_block: BlockTag,
    /// Last block, inclusive
    pub to_block: BlockTag,
    /// Emitting contract
    pub address: Address,
}
