//! Conversions between hex strings, byte sequences and big integers.
//!
//! Every hex string produced here is `0x`-prefixed, lowercase and of even
//! length. Parsing accepts an optional `0x`/`0X` prefix and either case.

use primitive_types::U256;

use crate::{PrimitiveError, WORD_SIZE};

/// Strip an optional `0x` / `0X` prefix
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string into bytes, most-significant pair first.
///
/// Fails with [`PrimitiveError::MalformedHex`] on an odd digit count or a
/// non-hex character.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, PrimitiveError> {
    hex::decode(strip_hex_prefix(s)).map_err(|e| PrimitiveError::MalformedHex(e.to_string()))
}

/// Encode bytes as a `0x`-prefixed lowercase hex string (`"0x"` when empty)
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Left-pad `bytes` with zeros to exactly `width` bytes
pub fn pad_left_zero(bytes: &[u8], width: usize) -> Result<Vec<u8>, PrimitiveError> {
    if bytes.len() > width {
        return Err(PrimitiveError::ValueTooLarge {
            len: bytes.len(),
            width,
        });
    }
    let mut padded = vec![0u8; width];
    padded[width - bytes.len()..].copy_from_slice(bytes);
    Ok(padded)
}

/// Right-pad `bytes` with zeros to exactly `width` bytes
pub fn pad_right_zero(bytes: &[u8], width: usize) -> Result<Vec<u8>, PrimitiveError> {
    if bytes.len() > width {
        return Err(PrimitiveError::ValueTooLarge {
            len: bytes.len(),
            width,
        });
    }
    let mut padded = vec![0u8; width];
    padded[..bytes.len()].copy_from_slice(bytes);
    Ok(padded)
}

/// Repair an odd-length digit string by inserting a single `0` right after
/// the first two characters: `"abc"` becomes `"ab0c"`.
///
/// The insertion point is kept for wire compatibility with the remote
/// service this gateway talks to. Applied to a `0x`-prefixed string the
/// zero lands in front of the digits, which is how
/// [`u256_from_hex_quantity`] uses it. Strings shorter than two characters
/// get the zero at the front. Even-length input is returned unchanged.
pub fn fix_odd_hex_digits(digits: &str) -> String {
    if digits.len() % 2 == 0 {
        return digits.to_string();
    }
    match digits.get(..2) {
        Some(head) => format!("{}0{}", head, &digits[2..]),
        None => format!("0{}", digits),
    }
}

/// Parse a hex quantity of any digit count (`0x1f4`, `0x0`, `0x`) into a `U256`
pub fn u256_from_hex_quantity(s: &str) -> Result<U256, PrimitiveError> {
    let prefixed = format!("0x{}", strip_hex_prefix(s));
    let bytes = hex_to_bytes(&fix_odd_hex_digits(&prefixed))?;
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > WORD_SIZE {
        return Err(PrimitiveError::ValueTooLarge {
            len: significant.len(),
            width: WORD_SIZE,
        });
    }
    Ok(U256::from_big_endian(significant))
}

/// Minimal hex quantity encoding (`0x0`, `0x1f4`) used by RPC numeric fields
pub fn u256_to_hex_quantity(value: &U256) -> String {
    if value.is_zero() {
        "0x0".to_string()
    } else {
        format!("0x{:x}", value)
    }
}

/// Parse a hex quantity into a `u64`
pub fn u64_from_hex_quantity(s: &str) -> Result<u64, PrimitiveError> {
    let digits = strip_hex_prefix(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| PrimitiveError::MalformedHex(format!("{}: {}", s, e)))
}

/// Big-endian 32-byte representation of a `U256`
pub fn u256_to_word(value: &U256) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}
