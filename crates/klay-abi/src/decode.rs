//! ABI decoding

use klay_primitives::{Address, U256, WORD_SIZE};

use crate::param_type::head_size;
use crate::{AbiError, AbiType, I256, Token};

/// Decode tokens from ABI-encoded data.
///
/// Either every declared value is decoded or an error is returned; no
/// partial results.
pub fn decode(types: &[AbiType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let head_size = head_size(types).unwrap_or(usize::MAX);
    if data.len() < head_size {
        return Err(AbiError::DecodeLengthMismatch {
            expected: head_size,
            got: data.len(),
        });
    }
    decode_params(types, data, 0)
}

/// Decode a block of values whose head starts at `base`.
///
/// Offsets of dynamic values are relative to `base`.
fn decode_params(types: &[AbiType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut cursor = base;
    for param_type in types {
        tokens.push(decode_slot(param_type, data, base, cursor)?);
        cursor = cursor.saturating_add(param_type.head_len());
    }
    Ok(tokens)
}

/// Decode `count` elements of one type laid out as a block at `base`
fn decode_sequence(
    inner: &AbiType,
    count: usize,
    data: &[u8],
    base: usize,
) -> Result<Vec<Token>, AbiError> {
    // every element needs its head slot; zero-width ones are bounded by the buffer
    let needed = count
        .checked_mul(inner.head_len().max(1))
        .unwrap_or(usize::MAX);
    check_length(data, base, needed)?;

    let mut tokens = Vec::with_capacity(count);
    let mut cursor = base;
    for _ in 0..count {
        tokens.push(decode_slot(inner, data, base, cursor)?);
        cursor = cursor.saturating_add(inner.head_len());
    }
    Ok(tokens)
}

/// Decode the value whose head slot sits at `cursor` in the block at `base`
fn decode_slot(param_type: &AbiType, data: &[u8], base: usize, cursor: usize) -> Result<Token, AbiError> {
    if !param_type.is_dynamic() {
        return decode_static(param_type, data, cursor);
    }
    let offset = read_usize(data, cursor)?;
    let location = base.checked_add(offset).ok_or(AbiError::TruncatedData {
        offset: cursor,
        needed: offset,
        available: data.len(),
    })?;
    decode_dynamic(param_type, data, location)
}

/// Decode a value stored inline at `at`
fn decode_static(param_type: &AbiType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match param_type {
        AbiType::Address => {
            let word = read_word(data, at)?;
            let mut addr_bytes = [0u8; 20];
            addr_bytes.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr_bytes)))
        }
        AbiType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(read_word(data, at)?))),
        AbiType::Int(_) => {
            let word = U256::from_big_endian(read_word(data, at)?);
            Ok(Token::Int(I256::from_word(word)))
        }
        AbiType::Bool => {
            let word = read_word(data, at)?;
            Ok(Token::Bool(word.iter().any(|b| *b != 0)))
        }
        AbiType::FixedBytes(size) => {
            let word = read_word(data, at)?;
            let size = (*size).min(WORD_SIZE);
            Ok(Token::FixedBytes(word[..size].to_vec()))
        }
        AbiType::FixedArray(inner, size) => {
            Ok(Token::FixedArray(decode_sequence(inner, *size, data, at)?))
        }
        AbiType::Tuple(types) => Ok(Token::Tuple(decode_params(types, data, at)?)),
        AbiType::Bytes | AbiType::String | AbiType::Array(_) => decode_dynamic(param_type, data, at),
    }
}

/// Decode the contents of a dynamic value starting at `location`
fn decode_dynamic(param_type: &AbiType, data: &[u8], location: usize) -> Result<Token, AbiError> {
    match param_type {
        AbiType::Bytes => Ok(Token::Bytes(decode_bytes(data, location)?)),
        AbiType::String => {
            let bytes = decode_bytes(data, location)?;
            let s = String::from_utf8(bytes).map_err(|e| AbiError::InvalidUtf8(e.to_string()))?;
            Ok(Token::String(s))
        }
        AbiType::Array(inner) => {
            let len = read_usize(data, location)?;
            let start = location.saturating_add(WORD_SIZE);
            Ok(Token::Array(decode_sequence(inner, len, data, start)?))
        }
        AbiType::FixedArray(inner, size) => {
            Ok(Token::FixedArray(decode_sequence(inner, *size, data, location)?))
        }
        AbiType::Tuple(types) => Ok(Token::Tuple(decode_params(types, data, location)?)),
        _ => decode_static(param_type, data, location),
    }
}

/// Length word followed by that many bytes
fn decode_bytes(data: &[u8], location: usize) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(data, location)?;
    let start = location.saturating_add(WORD_SIZE);
    check_length(data, start, len)?;
    Ok(data[start..start + len].to_vec())
}

/// Read the 32-byte word at `at`
fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    check_length(data, at, WORD_SIZE)?;
    Ok(&data[at..at + WORD_SIZE])
}

/// Read a word holding an offset or a length
fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value.bits() > 64 {
        return Err(AbiError::TruncatedData {
            offset: at,
            needed: usize::MAX,
            available: data.len(),
        });
    }
    usize::try_from(value.low_u64()).map_err(|_| AbiError::TruncatedData {
        offset: at,
        needed: usize::MAX,
        available: data.len(),
    })
}

/// Check that `needed` bytes are available from `offset`
fn check_length(data: &[u8], offset: usize, needed: usize) -> Result<(), AbiError> {
    match offset.checked_add(needed) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(AbiError::TruncatedData {
            offset,
            needed,
            available: data.len(),
        }),
    }
}
