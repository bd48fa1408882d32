//! # klay-gateway
//!
//! JSON-RPC gateway for contract reads and writes.
//!
//! ## Features
//!
//! - **Gateway**: encodes a call, sends it as `klay_call` or
//!   `klay_sendTransaction`, and decodes the result; deploys contracts
//!   and queries blocks, balances, receipts and logs
//! - **Transport**: pluggable request delivery; HTTP (feature `http`) and a
//!   recording mock for tests
//! - **GatewayConfig**: endpoint, credentials, account and gas settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use klay_abi::{Abi, Token};
//! use klay_gateway::{Gateway, GatewayConfig};
//! use klay_primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let abi = Abi::from_json(&std::fs::read_to_string("Store.abi.json")?)?;
//!     let gateway = Gateway::connect(GatewayConfig::default())?;
//!
//!     let store = Address::from_hex("0x00000000000000000000000000000000000000aa")?;
//!     let menu = gateway
//!         .call(&store, abi.function("getMenu")?, &[Token::uint(0u64)])
//!         .await?;
//!     println!("{:?}", menu);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod envelope;
mod error;
mod gateway;
mod transport;

pub use config::GatewayConfig;
pub use envelope::{BlockTag, CallArgs, LogFilter, RpcError, RpcRequest, RpcResponse, TxArgs};
pub use error::GatewayError;
pub use gateway::{Gateway, Invocation};
pub use transport::{MockTransport, Transport};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
