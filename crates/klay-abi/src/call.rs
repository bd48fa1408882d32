//! Encoded call payload

use std::fmt;

use bytes::Bytes;
use klay_primitives::hexutil;

/// Call payload: 4-byte selector followed by the encoded arguments.
///
/// Owned by the caller once produced; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall(Bytes);

impl EncodedCall {
    pub(crate) fn new(selector: [u8; 4], body: Vec<u8>) -> Self {
        let mut data = Vec::with_capacity(4 + body.len());
        data.extend_from_slice(&selector);
        data.extend(body);
        Self(Bytes::from(data))
    }

    /// Function selector
    pub fn selector(&self) -> [u8; 4] {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&self.0[..4]);
        selector
    }

    /// Encoded arguments (head and tail, without the selector)
    pub fn args(&self) -> &[u8] {
        &self.0[4..]
    }

    /// Full payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no bytes. Never true for a built call, which
    /// always starts with its 4-byte selector
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `0x`-prefixed hex form sent over the wire
    pub fn to_hex(&self) -> String {
        hexutil::bytes_to_hex(&self.0)
    }

    /// Take the underlying bytes
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for EncodedCall {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<EncodedCall> for Bytes {
    fn from(call: EncodedCall) -> Self {
        call.0
    }
}

impl fmt::Display for EncodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
