//! JSON conversion for tokens
//!
//! Integers render as decimal strings so 256-bit values survive JavaScript
//! consumers; addresses and byte strings render as `0x` hex.

use serde::{Serialize, Serializer};
use serde_json::Value;

use klay_primitives::hexutil::{bytes_to_hex, hex_to_bytes, u256_from_hex_quantity};
use klay_primitives::{Address, U256};

use crate::function::Param;
use crate::{AbiError, AbiType, I256, Token};

impl Token {
    /// JSON form of the value
    pub fn to_json(&self) -> Value {
        match self {
            Token::Address(addr) => Value::String(addr.to_hex()),
            Token::Uint(v) => Value::String(v.to_string()),
            Token::Int(v) => Value::String(v.to_string()),
            Token::Bool(b) => Value::Bool(*b),
            Token::Bytes(data) | Token::FixedBytes(data) => Value::String(bytes_to_hex(data)),
            Token::String(s) => Value::String(s.clone()),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                Value::Array(items.iter().map(Token::to_json).collect())
            }
        }
    }

    /// Build a token of the given type from a JSON value.
    ///
    /// Integers accept JSON numbers, decimal strings and `0x` hex strings.
    /// Range and length checks are left to the encoder.
    pub fn from_json(kind: &AbiType, value: &Value) -> Result<Token, String> {
        match (kind, value) {
            (AbiType::Address, Value::String(s)) => Address::from_hex(s)
                .map(Token::Address)
                .map_err(|e| e.to_string()),
            (AbiType::Uint(_), Value::Number(n)) => n
                .as_u64()
                .map(Token::uint)
                .ok_or_else(|| format!("{} is not an unsigned integer", n)),
            (AbiType::Uint(_), Value::String(s)) => parse_uint(s).map(Token::Uint),
            (AbiType::Int(_), Value::Number(n)) => n
                .as_i64()
                .map(|v| Token::int(v.into()))
                .ok_or_else(|| format!("{} is not an integer", n)),
            (AbiType::Int(_), Value::String(s)) => parse_int(s).map(Token::Int),
            (AbiType::Bool, Value::Bool(b)) => Ok(Token::Bool(*b)),
            (AbiType::Bool, Value::String(s)) => match s.as_str() {
                "true" => Ok(Token::Bool(true)),
                "false" => Ok(Token::Bool(false)),
                _ => Err(format!("{:?} is not a boolean", s)),
            },
            (AbiType::Bytes, Value::String(s)) => {
                hex_to_bytes(s).map(Token::Bytes).map_err(|e| e.to_string())
            }
            (AbiType::FixedBytes(_), Value::String(s)) => {
                hex_to_bytes(s).map(Token::FixedBytes).map_err(|e| e.to_string())
            }
            (AbiType::String, Value::String(s)) => Ok(Token::String(s.clone())),
            (AbiType::Array(inner), Value::Array(items)) => {
                elements_from_json(inner, items).map(Token::Array)
            }
            (AbiType::FixedArray(inner, _), Value::Array(items)) => {
                elements_from_json(inner, items).map(Token::FixedArray)
            }
            (AbiType::Tuple(fields), Value::Array(items)) => {
                if fields.len() != items.len() {
                    return Err(format!(
                        "expected {} tuple fields, got {}",
                        fields.len(),
                        items.len()
                    ));
                }
                fields
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (field, item))| {
                        Token::from_json(field, item).map_err(|e| format!("field {}: {}", i, e))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Token::Tuple)
            }
            (kind, value) => Err(format!("cannot convert {} to {}", json_kind(value), kind)),
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Convert JSON arguments to tokens for the given parameters
pub fn tokens_from_json(params: &[Param], values: &[Value]) -> Result<Vec<Token>, AbiError> {
    if params.len() != values.len() {
        return Err(AbiError::ArityMismatch {
            expected: params.len(),
            got: values.len(),
        });
    }
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(index, (param, value))| {
            Token::from_json(&param.kind, value).map_err(|reason| AbiError::TypeMismatch {
                param: if param.name.is_empty() {
                    format!("#{}", index)
                } else {
                    param.name.clone()
                },
                expected: param.kind.canonical(),
                reason,
            })
        })
        .collect()
}

fn elements_from_json(inner: &AbiType, items: &[Value]) -> Result<Vec<Token>, String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Token::from_json(inner, item).map_err(|e| format!("element {}: {}", i, e)))
        .collect()
}

fn parse_uint(s: &str) -> Result<U256, String> {
    if s.starts_with("0x") || s.starts_with("0X") {
        return u256_from_hex_quantity(s).map_err(|e| e.to_string());
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{:?} is not an unsigned integer", s));
    }
    U256::from_dec_str(s).map_err(|_| format!("{:?} does not fit in 256 bits", s))
}

fn parse_int(s: &str) -> Result<I256, String> {
    if s.starts_with("0x") || s.starts_with("0X") {
        return u256_from_hex_quantity(s)
            .map(|abs| I256::new(abs, false))
            .map_err(|e| e.to_string());
    }
    I256::from_dec_str(s).ok_or_else(|| format!("{:?} is not an integer", s))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
