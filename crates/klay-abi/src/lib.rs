//! # klay-abi
//!
//! Contract ABI model, encoder and decoder.
//!
//! This crate provides:
//! - Parsing of the JSON ABI format into [`Abi`] / [`Function`]
//! - Encoding of function calls (selector, head and tail) and of
//!   constructor arguments for deployment
//! - Decoding of return data and call payloads
//!
//! # Example
//!
//! ```rust
//! use klay_abi::{Abi, Token};
//!
//! let abi = Abi::from_json(r#"[{
//!     "type": "function",
//!     "name": "getMenu",
//!     "stateMutability": "view",
//!     "inputs": [{"name": "menuId", "type": "uint32"}],
//!     "outputs": [{"name": "", "type": "string"}]
//! }]"#).unwrap();
//!
//! let get_menu = abi.function("getMenu").unwrap();
//! let call = get_menu.encode_input(&[Token::uint(1u64)]).unwrap();
//! assert_eq!(call.len(), 4 + 32);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod call;
mod decode;
mod encode;
mod error;
mod function;
mod json;
mod param_type;
mod types;

pub use abi::Abi;
pub use call::EncodedCall;
pub use decode::decode;
pub use encode::{encode, function_selector};
pub use error::AbiError;
pub use function::{Constructor, Function, Param, StateMutability};
pub use json::tokens_from_json;
pub use param_type::{parse_type, AbiType};
pub use types::{Token, I256};
