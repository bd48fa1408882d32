//! # klay-crypto
//!
//! Keccak-256 hashing, used to derive function selectors.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::keccak256;
