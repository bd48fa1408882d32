//! # klay-primitives
//!
//! Primitive types shared by the ABI codec and the RPC gateway.
//!
//! - `Address` / `H256` fixed-size byte types
//! - `U256` from `primitive-types`
//! - `hexutil`: conversions between hex strings, bytes and big integers

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
pub mod hexutil;

pub use address::Address;
pub use error::PrimitiveError;
pub use hash::H256;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of an ABI word in bytes
pub const WORD_SIZE: usize = 32;
