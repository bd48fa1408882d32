//! ABI encoding
//!
//! Head/tail layout: one head slot per value (static values inline, dynamic
//! values as a byte offset from the start of the enclosing block), then the
//! tail holding the contents of every dynamic value in declaration order.

use klay_primitives::hexutil::{pad_left_zero, pad_right_zero, u256_to_word};
use klay_primitives::{U256, WORD_SIZE};

use crate::function::Param;
use crate::param_type::head_size;
use crate::{AbiError, AbiType, Token};

/// Encode tokens against their declared types (no selector)
pub fn encode(types: &[AbiType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    check_arity(types.len(), tokens.len())?;
    encode_params(types, tokens).map_err(|(index, reason)| AbiError::TypeMismatch {
        param: format!("#{}", index),
        expected: types[index].canonical(),
        reason,
    })
}

/// Encode function arguments, naming the offending parameter on mismatch
pub(crate) fn encode_params_named(params: &[Param], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    check_arity(params.len(), tokens.len())?;
    let types: Vec<AbiType> = params.iter().map(|p| p.kind.clone()).collect();
    encode_params(&types, tokens).map_err(|(index, reason)| {
        let param = &params[index];
        let name = if param.name.is_empty() {
            format!("#{}", index)
        } else {
            param.name.clone()
        };
        AbiError::TypeMismatch {
            param: name,
            expected: param.kind.canonical(),
            reason,
        }
    })
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = klay_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

fn check_arity(expected: usize, got: usize) -> Result<(), AbiError> {
    if expected != got {
        return Err(AbiError::ArityMismatch { expected, got });
    }
    Ok(())
}

/// Encode a block of values; errors carry the index of the failing value
fn encode_params(types: &[AbiType], tokens: &[Token]) -> Result<Vec<u8>, (usize, String)> {
    let head_size = head_size(types)
        .map_err(|index| (index, "encoded head exceeds addressable size".to_string()))?;

    let mut head = Vec::new();
    let mut tail = Vec::new();

    for (index, (param_type, token)) in types.iter().zip(tokens).enumerate() {
        let encoded = encode_token(param_type, token).map_err(|reason| (index, reason))?;
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(u256_to_word(&U256::from(offset)));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a single token, checking it against its declared type
fn encode_token(param_type: &AbiType, token: &Token) -> Result<Vec<u8>, String> {
    match (param_type, token) {
        (AbiType::Address, Token::Address(addr)) => {
            pad_left_zero(addr.as_bytes(), WORD_SIZE).map_err(|e| e.to_string())
        }
        (AbiType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(format!("{} does not fit in uint{}", value, bits));
            }
            Ok(u256_to_word(value).to_vec())
        }
        (AbiType::Int(bits), Token::Int(value)) => {
            if !value.fits_bits(*bits) {
                return Err(format!("{} does not fit in int{}", value, bits));
            }
            Ok(u256_to_word(&value.to_word()).to_vec())
        }
        (AbiType::Bool, Token::Bool(b)) => Ok(u256_to_word(&U256::from(u8::from(*b))).to_vec()),
        (AbiType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size {
                return Err(format!("expected {} bytes, got {}", size, data.len()));
            }
            pad_right_zero(data, WORD_SIZE).map_err(|e| e.to_string())
        }
        (AbiType::Bytes, Token::Bytes(data)) => encode_bytes(data),
        (AbiType::String, Token::String(s)) => encode_bytes(s.as_bytes()),
        (AbiType::Array(inner), Token::Array(tokens)) => {
            let mut result = u256_to_word(&U256::from(tokens.len())).to_vec();
            result.extend(encode_sequence(inner, tokens)?);
            Ok(result)
        }
        (AbiType::FixedArray(inner, size), Token::FixedArray(tokens) | Token::Array(tokens)) => {
            if tokens.len() != *size {
                return Err(format!("expected {} elements, got {}", size, tokens.len()));
            }
            encode_sequence(inner, tokens)
        }
        (AbiType::Tuple(types), Token::Tuple(tokens)) => {
            if tokens.len() != types.len() {
                return Err(format!("expected {} components, got {}", types.len(), tokens.len()));
            }
            encode_params(types, tokens)
                .map_err(|(index, reason)| format!("component {}: {}", index, reason))
        }
        (expected, token) => Err(format!("expected {}, got {} value", expected, token.kind())),
    }
}

/// Encode array elements as their own head/tail block
fn encode_sequence(inner: &AbiType, tokens: &[Token]) -> Result<Vec<u8>, String> {
    let types = vec![inner.clone(); tokens.len()];
    encode_params(&types, tokens).map_err(|(index, reason)| format!("element {}: {}", index, reason))
}

/// Length word followed by the content right-padded to a word boundary
fn encode_bytes(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut result = u256_to_word(&U256::from(data.len())).to_vec();
    let padded_len = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    result.extend(pad_right_zero(data, padded_len).map_err(|e| e.to_string())?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{Function, StateMutability};
    use crate::I256;
    use klay_primitives::Address;

    fn words(hex_words: &[&str]) -> Vec<u8> {
        hex_words
            .iter()
            .flat_map(|w| klay_primitives::hexutil::hex_to_bytes(w).unwrap())
            .collect()
    }

    fn word_of(n: u64) -> String {
        format!("{:064x}", n)
    }

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[AbiType::Address], &[Token::Address(addr)]).unwrap();

        assert_eq!(encoded.len(), 32);
        assert!(encoded[..12].iter().all(|b| *b == 0));
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_uint_and_bool() {
        let encoded = encode(
            &[AbiType::Uint(8), AbiType::Bool, AbiType::Bool],
            &[Token::uint(100u64), Token::Bool(true), Token::Bool(false)],
        )
        .unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 100);
        assert_eq!(encoded[63], 1);
        assert_eq!(encoded[95], 0);
    }

    #[test]
    fn test_encode_negative_int() {
        let encoded = encode(&[AbiType::Int(8)], &[Token::int(-1)]).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);
    }

    #[test]
    fn test_encode_fixed_bytes_right_padded() {
        let encoded = encode(&[AbiType::FixedBytes(2)], &[Token::FixedBytes(vec![0xab, 0xcd])]).unwrap();
        assert_eq!(&encoded[..2], &[0xab, 0xcd]);
        assert!(encoded[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_dynamic_bytes() {
        let data = vec![0x01, 0x02, 0x03];
        let encoded = encode(&[AbiType::Bytes], &[Token::Bytes(data.clone())]).unwrap();

        // offset (32) + length (32) + padded data (32)
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 32);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[64..67], &data[..]);
    }

    #[test]
    fn test_encode_string_then_uint_layout() {
        // f(string,uint256) with ("ab", 5)
        let encoded = encode(
            &[AbiType::String, AbiType::Uint(256)],
            &[Token::string("ab"), Token::uint(5u64)],
        )
        .unwrap();
        let mut content = "6162".to_string();
        content.push_str(&"0".repeat(60));
        assert_eq!(
            encoded,
            words(&[&word_of(0x40), &word_of(5), &word_of(2), &content])
        );
    }

    #[test]
    fn test_static_only_payload_length() {
        let func = Function::new(
            "addAttendance",
            vec![
                Param::new("classDate", AbiType::Uint(64)),
                Param::new("presentPrice", AbiType::Uint(256)),
                Param::new("latePrice", AbiType::Uint(256)),
                Param::new("owner", AbiType::Address),
                Param::new("pair", AbiType::FixedArray(Box::new(AbiType::Bool), 2)),
            ],
            vec![],
            StateMutability::NonPayable,
        );
        let call = func
            .encode_input(&[
                Token::uint(20240101u64),
                Token::uint(10u64),
                Token::uint(5u64),
                Token::Address(Address::ZERO),
                Token::FixedArray(vec![Token::Bool(true), Token::Bool(false)]),
            ])
            .unwrap();
        // the fixed array is inlined as two words
        assert_eq!(call.len(), 4 + 32 * 6);
    }

    #[test]
    fn test_function_selector() {
        assert_eq!(function_selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(function_selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_encode_mixed_static_and_dynamic() {
        // f(uint256,uint32[],bytes10,bytes) with (0x123, [0x456, 0x789], "1234567890", "Hello, world!")
        let func = Function::new(
            "f",
            vec![
                Param::unnamed(AbiType::Uint(256)),
                Param::unnamed(AbiType::Array(Box::new(AbiType::Uint(32)))),
                Param::unnamed(AbiType::FixedBytes(10)),
                Param::unnamed(AbiType::Bytes),
            ],
            vec![],
            StateMutability::NonPayable,
        );
        let call = func
            .encode_input(&[
                Token::uint(0x123u64),
                Token::Array(vec![Token::uint(0x456u64), Token::uint(0x789u64)]),
                Token::FixedBytes(b"1234567890".to_vec()),
                Token::bytes(b"Hello, world!".to_vec()),
            ])
            .unwrap();

        assert_eq!(call.selector(), [0x8b, 0xe6, 0x52, 0x46]);
        assert_eq!(
            call.args(),
            &words(&[
                &word_of(0x123),
                &word_of(0x80),
                "3132333435363738393000000000000000000000000000000000000000000000",
                &word_of(0xe0),
                &word_of(2),
                &word_of(0x456),
                &word_of(0x789),
                &word_of(0xd),
                "48656c6c6f2c20776f726c642100000000000000000000000000000000000000",
            ])[..]
        );
    }

    #[test]
    fn test_encode_nested_dynamic_arrays() {
        // g(uint256[][],string[]) with ([[1, 2], [3]], ["one", "two", "three"])
        let func = Function::new(
            "g",
            vec![
                Param::unnamed(AbiType::Array(Box::new(AbiType::Array(Box::new(AbiType::Uint(256)))))),
                Param::unnamed(AbiType::Array(Box::new(AbiType::String))),
            ],
            vec![],
            StateMutability::NonPayable,
        );
        let call = func
            .encode_input(&[
                Token::Array(vec![
                    Token::Array(vec![Token::uint(1u64), Token::uint(2u64)]),
                    Token::Array(vec![Token::uint(3u64)]),
                ]),
                Token::Array(vec![
                    Token::string("one"),
                    Token::string("two"),
                    Token::string("three"),
                ]),
            ])
            .unwrap();

        let padded = |hex: &str| format!("{:0<64}", hex);
        assert_eq!(call.selector(), [0x22, 0x89, 0xb1, 0x8c]);
        assert_eq!(
            call.args(),
            &words(&[
                &word_of(0x40),
                &word_of(0x140),
                &word_of(2),
                &word_of(0x40),
                &word_of(0xa0),
                &word_of(2),
                &word_of(1),
                &word_of(2),
                &word_of(1),
                &word_of(3),
                &word_of(3),
                &word_of(0x60),
                &word_of(0xa0),
                &word_of(0xe0),
                &word_of(3),
                &padded("6f6e65"),
                &word_of(3),
                &padded("74776f"),
                &word_of(5),
                &padded("7468726565"),
            ])[..]
        );
    }

    #[test]
    fn test_encode_arity_mismatch() {
        let result = encode(&[AbiType::Address, AbiType::Uint(256)], &[Token::Address(Address::ZERO)]);
        assert_eq!(result, Err(AbiError::ArityMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn test_encode_type_mismatch_names_parameter() {
        let func = Function::new(
            "setRewardPolicy",
            vec![
                Param::new("menuId", AbiType::Uint(32)),
                Param::new("reward", AbiType::Uint(256)),
            ],
            vec![],
            StateMutability::NonPayable,
        );
        let err = func
            .encode_input(&[Token::uint(1u64 << 40), Token::uint(1u64)])
            .unwrap_err();
        match err {
            AbiError::TypeMismatch { param, expected, .. } => {
                assert_eq!(param, "menuId");
                assert_eq!(expected, "uint32");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_encode_type_mismatch_cases() {
        let cases: Vec<(AbiType, Token)> = vec![
            (AbiType::Uint(8), Token::uint(256u64)),
            (AbiType::Int(8), Token::int(128)),
            (AbiType::Int(8), Token::int(-129)),
            (AbiType::FixedBytes(4), Token::FixedBytes(vec![1, 2, 3])),
            (
                AbiType::FixedArray(Box::new(AbiType::Bool), 2),
                Token::FixedArray(vec![Token::Bool(true)]),
            ),
            (AbiType::Tuple(vec![AbiType::Bool, AbiType::Bool]), Token::Tuple(vec![Token::Bool(true)])),
            (AbiType::Address, Token::string("0x00")),
            (AbiType::Array(Box::new(AbiType::Uint(8))), Token::Array(vec![Token::Bool(true)])),
        ];
        for (ty, token) in cases {
            let result = encode(&[ty.clone()], &[token]);
            assert!(
                matches!(result, Err(AbiError::TypeMismatch { ref param, .. }) if param == "#0"),
                "{} should be rejected, got {:?}",
                ty,
                result
            );
        }
    }

    #[test]
    fn test_encode_oversized_head() {
        let huge = AbiType::FixedArray(Box::new(AbiType::Uint(256)), usize::MAX / 16);
        let result = encode(
            &[AbiType::String, huge],
            &[Token::string("a"), Token::FixedArray(vec![Token::uint(1u64)])],
        );
        assert!(
            matches!(result, Err(AbiError::TypeMismatch { ref param, .. }) if param == "#1"),
            "got {:?}",
            result
        );
    }

    #[test]
    fn test_encode_int_boundaries() {
        assert!(encode(&[AbiType::Int(8)], &[Token::int(127)]).is_ok());
        assert!(encode(&[AbiType::Int(8)], &[Token::int(-128)]).is_ok());
        let min = Token::Int(I256::new(U256::one() << 255, true));
        assert!(encode(&[AbiType::Int(256)], &[min]).is_ok());
        assert!(encode(&[AbiType::Uint(256)], &[Token::Uint(U256::MAX)]).is_ok());
    }

    #[test]
    fn test_encode_empty_dynamic_values() {
        let encoded = encode(
            &[AbiType::Bytes, AbiType::Array(Box::new(AbiType::Address))],
            &[Token::bytes(vec![]), Token::Array(vec![])],
        )
        .unwrap();
        assert_eq!(
            encoded,
            words(&[&word_of(0x40), &word_of(0x60), &word_of(0), &word_of(0)])
        );
    }
}
