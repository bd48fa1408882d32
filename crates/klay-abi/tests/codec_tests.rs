//! Encode/decode integration tests for klay-abi
//!
//! Covers every AbiType variant, payload layout properties and the failure
//! modes of decoding untrusted return data.

use klay_abi::{decode, encode, parse_type, AbiError, AbiType, Function, Param, StateMutability, Token, I256};
use klay_primitives::{Address, U256};
use proptest::collection::vec;
use proptest::prelude::*;

fn round_trip(types: &[AbiType], tokens: Vec<Token>) {
    let encoded = encode(types, &tokens).unwrap();
    assert_eq!(encoded.len() % 32, 0, "payload must be word aligned");
    assert_eq!(decode(types, &encoded).unwrap(), tokens);
}

// ==================== Round Trip Per Type ====================

#[test]
fn test_round_trip_scalars() {
    let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
    round_trip(&[AbiType::Address], vec![Token::Address(addr)]);
    round_trip(&[AbiType::Uint(256)], vec![Token::Uint(U256::MAX)]);
    round_trip(&[AbiType::Uint(32)], vec![Token::uint(u32::MAX as u64)]);
    round_trip(&[AbiType::Int(256)], vec![Token::Int(I256::new(U256::one() << 255, true))]);
    round_trip(&[AbiType::Int(16)], vec![Token::int(-32768)]);
    round_trip(&[AbiType::Bool], vec![Token::Bool(true)]);
    round_trip(&[AbiType::FixedBytes(1)], vec![Token::FixedBytes(vec![0x7f])]);
    round_trip(&[AbiType::FixedBytes(32)], vec![Token::FixedBytes(vec![0xee; 32])]);
}

#[test]
fn test_round_trip_dynamic() {
    round_trip(&[AbiType::Bytes], vec![Token::bytes(vec![0x01; 33])]);
    round_trip(&[AbiType::Bytes], vec![Token::bytes(vec![])]);
    round_trip(&[AbiType::String], vec![Token::string("불고기 버거")]);
    round_trip(&[AbiType::String], vec![Token::string("")]);
    round_trip(
        &[AbiType::Array(Box::new(AbiType::Uint(32)))],
        vec![Token::Array(vec![Token::uint(1u64), Token::uint(2u64), Token::uint(3u64)])],
    );
    round_trip(&[AbiType::Array(Box::new(AbiType::Address))], vec![Token::Array(vec![])]);
}

#[test]
fn test_round_trip_composites() {
    let ty = parse_type("(string,uint32[2],(bool,bytes)[])[2]").unwrap();
    let inner = |s: &str| {
        Token::Tuple(vec![
            Token::string(s),
            Token::FixedArray(vec![Token::uint(4u64), Token::uint(5u64)]),
            Token::Array(vec![Token::Tuple(vec![Token::Bool(true), Token::bytes(s.as_bytes().to_vec())])]),
        ])
    };
    round_trip(&[ty], vec![Token::FixedArray(vec![inner("a"), inner("bcd")])]);

    let ty = parse_type("string[][]").unwrap();
    round_trip(
        &[ty, AbiType::Uint(8)],
        vec![
            Token::Array(vec![
                Token::Array(vec![Token::string("x")]),
                Token::Array(vec![]),
                Token::Array(vec![Token::string("y"), Token::string("z")]),
            ]),
            Token::uint(8u64),
        ],
    );
}

// ==================== Layout Properties ====================

#[test]
fn test_static_only_payload_length() {
    let func = Function::new(
        "setRewardPolicy",
        vec![
            Param::new("store", AbiType::Address),
            Param::new("rate", AbiType::Uint(32)),
            Param::new("enabled", AbiType::Bool),
        ],
        vec![],
        StateMutability::NonPayable,
    );
    let call = func
        .encode_input(&[Token::Address(Address::ZERO), Token::uint(5u64), Token::Bool(false)])
        .unwrap();
    assert_eq!(call.len(), 4 + 32 * 3);
}

#[test]
fn test_string_then_uint_layout() {
    let func = Function::new(
        "f",
        vec![Param::unnamed(AbiType::String), Param::unnamed(AbiType::Uint(256))],
        vec![],
        StateMutability::NonPayable,
    );
    let call = func.encode_input(&[Token::string("ab"), Token::uint(5u64)]).unwrap();
    let args = call.args();

    assert_eq!(args.len(), 32 * 4);
    assert_eq!(U256::from_big_endian(&args[..32]), U256::from(0x40));
    assert_eq!(U256::from_big_endian(&args[32..64]), U256::from(5));
    assert_eq!(U256::from_big_endian(&args[64..96]), U256::from(2));
    assert_eq!(&args[96..98], b"ab");
    assert!(args[98..].iter().all(|b| *b == 0));
}

#[test]
fn test_arity_mismatch_produces_nothing() {
    assert_eq!(
        encode(&[AbiType::Uint(256), AbiType::Bool], &[Token::uint(1u64)]),
        Err(AbiError::ArityMismatch { expected: 2, got: 1 })
    );
}

// ==================== Untrusted Return Data ====================

#[test]
fn test_truncated_dynamic_payload() {
    let types = [AbiType::String];
    let encoded = encode(&types, &[Token::string("a string longer than one word!!!!")]).unwrap();
    for cut in [32, 64, 96] {
        let result = decode(&types, &encoded[..cut]);
        assert!(
            matches!(result, Err(AbiError::TruncatedData { .. })),
            "cut at {} gave {:?}",
            cut,
            result
        );
    }
}

#[test]
fn test_head_shorter_than_outputs() {
    let types = [AbiType::Uint(256), AbiType::Address];
    let encoded = encode(&types, &[Token::uint(1u64), Token::Address(Address::ZERO)]).unwrap();
    assert_eq!(
        decode(&types, &encoded[..40]),
        Err(AbiError::DecodeLengthMismatch { expected: 64, got: 40 })
    );
}

#[test]
fn test_decode_nested_offset_past_end() {
    let ty = parse_type("uint256[][]").unwrap();
    let mut encoded = encode(
        &[ty.clone()],
        &[Token::Array(vec![Token::Array(vec![Token::uint(1u64)])])],
    )
    .unwrap();
    // inner offset word sits after the outer offset and count
    encoded[64 + 31] = 0xf0;
    assert!(matches!(decode(&[ty], &encoded), Err(AbiError::TruncatedData { .. })));
}

// ==================== Property Tests ====================

fn abi_type() -> impl Strategy<Value = AbiType> {
    let leaf = prop_oneof![
        Just(AbiType::Address),
        (1usize..=32).prop_map(|n| AbiType::Uint(n * 8)),
        (1usize..=32).prop_map(|n| AbiType::Int(n * 8)),
        Just(AbiType::Bool),
        Just(AbiType::Bytes),
        (1usize..=32).prop_map(AbiType::FixedBytes),
        Just(AbiType::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| AbiType::Array(Box::new(t))),
            (inner.clone(), 1usize..4).prop_map(|(t, n)| AbiType::FixedArray(Box::new(t), n)),
            vec(inner, 1..4).prop_map(AbiType::Tuple),
        ]
    })
}

fn low_bits(word: [u8; 32], bits: usize) -> U256 {
    let value = U256::from_big_endian(&word);
    if bits == 256 {
        value
    } else {
        value & ((U256::one() << bits) - 1)
    }
}

fn token_for(ty: &AbiType) -> BoxedStrategy<Token> {
    match ty {
        AbiType::Address => any::<[u8; 20]>()
            .prop_map(|b| Token::Address(Address::from_bytes(b)))
            .boxed(),
        AbiType::Uint(bits) => {
            let bits = *bits;
            any::<[u8; 32]>().prop_map(move |w| Token::Uint(low_bits(w, bits))).boxed()
        }
        AbiType::Int(bits) => {
            let bits = *bits;
            any::<[u8; 32]>()
                .prop_map(move |w| {
                    let value = low_bits(w, bits);
                    let int = if bits == 256 {
                        I256::from_word(value)
                    } else if value.bit(bits - 1) {
                        I256::new((U256::one() << bits) - value, true)
                    } else {
                        I256::new(value, false)
                    };
                    Token::Int(int)
                })
                .boxed()
        }
        AbiType::Bool => any::<bool>().prop_map(Token::Bool).boxed(),
        AbiType::Bytes => vec(any::<u8>(), 0..70).prop_map(Token::Bytes).boxed(),
        AbiType::FixedBytes(n) => vec(any::<u8>(), *n).prop_map(Token::FixedBytes).boxed(),
        AbiType::String => ".{0,24}".prop_map(Token::String).boxed(),
        AbiType::Array(inner) => vec(token_for(inner), 0..3).prop_map(Token::Array).boxed(),
        AbiType::FixedArray(inner, n) => vec(token_for(inner), *n).prop_map(Token::FixedArray).boxed(),
        AbiType::Tuple(types) => types
            .iter()
            .map(token_for)
            .collect::<Vec<_>>()
            .prop_map(Token::Tuple)
            .boxed(),
    }
}

fn typed_tokens() -> impl Strategy<Value = (Vec<AbiType>, Vec<Token>)> {
    vec(abi_type(), 0..4).prop_flat_map(|types| {
        let tokens = types.iter().map(token_for).collect::<Vec<_>>();
        (Just(types), tokens)
    })
}

proptest! {
    #[test]
    fn encode_decode_round_trip((types, tokens) in typed_tokens()) {
        let encoded = encode(&types, &tokens).unwrap();
        prop_assert_eq!(encoded.len() % 32, 0);
        prop_assert_eq!(decode(&types, &encoded).unwrap(), tokens);
    }

    #[test]
    fn canonical_form_reparses(ty in abi_type()) {
        prop_assert_eq!(parse_type(&ty.canonical()).unwrap(), ty);
    }

    #[test]
    fn decode_never_panics(types in vec(abi_type(), 1..3), data in vec(any::<u8>(), 0..256)) {
        let _ = decode(&types, &data);
    }

    #[test]
    fn uint_out_of_range_rejected(bits in 1usize..32, extra in 0u32..8) {
        let bits = bits * 8;
        let too_big = U256::one() << (bits as u32 + extra);
        let result = encode(&[AbiType::Uint(bits)], &[Token::Uint(too_big)]);
        let is_type_mismatch = matches!(result, Err(AbiError::TypeMismatch { .. }));
        prop_assert!(is_type_mismatch);
    }
}
