//! ABI type model and type-string parsing

use std::fmt;

use klay_primitives::WORD_SIZE;

use crate::AbiError;

/// Contract ABI parameter type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// Address (20 bytes)
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<AbiType>),
    /// Fixed-size array
    FixedArray(Box<AbiType>, usize),
    /// Tuple
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(inner, _) => inner.is_dynamic(),
            AbiType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Width this type occupies in the head region of its enclosing block.
    ///
    /// Static arrays and tuples are inlined; everything else takes one word
    /// (either the value itself or an offset).
    /// Saturates at `usize::MAX`; types built by [`parse_type`] never do.
    pub fn head_len(&self) -> usize {
        self.checked_head_len().unwrap_or(usize::MAX)
    }

    /// [`head_len`](Self::head_len), or `None` when the width overflows `usize`
    pub fn checked_head_len(&self) -> Option<usize> {
        match self {
            AbiType::FixedArray(inner, size) if !inner.is_dynamic() => {
                inner.checked_head_len()?.checked_mul(*size)
            }
            AbiType::Tuple(types) if !self.is_dynamic() => head_size(types).ok(),
            _ => Some(WORD_SIZE),
        }
    }

    /// Canonical type string used in function signatures
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Address => write!(f, "address"),
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Int(bits) => write!(f, "int{}", bits),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::FixedBytes(size) => write!(f, "bytes{}", size),
            AbiType::String => write!(f, "string"),
            AbiType::Array(inner) => write!(f, "{}[]", inner),
            AbiType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            AbiType::Tuple(types) => {
                write!(f, "(")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Total head width of a block of values.
///
/// On overflow, returns the index of the first value that no longer fits.
pub(crate) fn head_size(types: &[AbiType]) -> Result<usize, usize> {
    let mut total = 0usize;
    for (index, param_type) in types.iter().enumerate() {
        total = param_type
            .checked_head_len()
            .and_then(|len| total.checked_add(len))
            .ok_or(index)?;
    }
    Ok(total)
}

/// Build a tuple type, rejecting shapes that have no wire form
pub(crate) fn tuple_type(fields: Vec<AbiType>, whole: &str) -> Result<AbiType, AbiError> {
    if fields.is_empty() {
        return Err(AbiError::AbiParse(format!("Empty tuple in {}", whole)));
    }
    let tuple = AbiType::Tuple(fields);
    if tuple.checked_head_len().is_none() {
        return Err(AbiError::AbiParse(format!("Tuple too large: {}", whole)));
    }
    Ok(tuple)
}

/// Parse a type string (e.g. `uint256`, `address[]`, `(address,uint64)[2]`)
pub fn parse_type(s: &str) -> Result<AbiType, AbiError> {
    let s = s.trim();

    // Array suffix: the last '[' opens the outermost dimension
    if let Some(body) = s.strip_suffix(']') {
        let open = body
            .rfind('[')
            .ok_or_else(|| AbiError::AbiParse(format!("Unbalanced array type: {}", s)))?;
        let inner = parse_type(&body[..open])?;
        return wrap_array(inner, &body[open + 1..], s);
    }

    // Inline tuple, with or without the `tuple` keyword
    let tuple_body = s.strip_prefix("tuple").unwrap_or(s);
    if let Some(body) = tuple_body.strip_prefix('(') {
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| AbiError::AbiParse(format!("Unbalanced tuple type: {}", s)))?;
        let fields = split_top_level(body, s)?
            .into_iter()
            .map(parse_type)
            .collect::<Result<Vec<_>, _>>()?;
        return tuple_type(fields, s);
    }

    parse_elementary(s)
}

/// Apply `[N]` / `[]` suffixes left to right, as in `tuple[2][]`
pub(crate) fn apply_array_suffixes(mut base: AbiType, suffixes: &str) -> Result<AbiType, AbiError> {
    let mut rest = suffixes;
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| AbiError::AbiParse(format!("Malformed array suffix: {}", suffixes)))?;
        let close = body
            .find(']')
            .ok_or_else(|| AbiError::AbiParse(format!("Malformed array suffix: {}", suffixes)))?;
        base = wrap_array(base, &body[..close], suffixes)?;
        rest = &body[close + 1..];
    }
    Ok(base)
}

fn wrap_array(inner: AbiType, dimension: &str, whole: &str) -> Result<AbiType, AbiError> {
    if dimension.is_empty() {
        return Ok(AbiType::Array(Box::new(inner)));
    }
    match parse_size(dimension) {
        Some(len) if len > 0 => {
            // elements of a dynamic array still take one offset word each
            match inner.checked_head_len().and_then(|width| width.checked_mul(len)) {
                Some(_) => Ok(AbiType::FixedArray(Box::new(inner), len)),
                None => Err(AbiError::AbiParse(format!("Array too large: {}", whole))),
            }
        }
        _ => Err(AbiError::AbiParse(format!("Invalid array length in {}", whole))),
    }
}

fn parse_elementary(s: &str) -> Result<AbiType, AbiError> {
    match s {
        "address" => return Ok(AbiType::Address),
        "bool" => return Ok(AbiType::Bool),
        "string" => return Ok(AbiType::String),
        "bytes" => return Ok(AbiType::Bytes),
        _ => {}
    }

    // uint<N>
    if let Some(rest) = s.strip_prefix("uint") {
        return Ok(AbiType::Uint(parse_bits(rest, s)?));
    }

    // int<N>
    if let Some(rest) = s.strip_prefix("int") {
        return Ok(AbiType::Int(parse_bits(rest, s)?));
    }

    // bytes<N>
    if let Some(rest) = s.strip_prefix("bytes") {
        return match parse_size(rest) {
            Some(size) if (1..=WORD_SIZE).contains(&size) => Ok(AbiType::FixedBytes(size)),
            _ => Err(AbiError::AbiParse(format!("Invalid bytes size: {}", s))),
        };
    }

    Err(AbiError::AbiParse(format!("Unknown type: {}", s)))
}

fn parse_bits(rest: &str, whole: &str) -> Result<usize, AbiError> {
    if rest.is_empty() {
        return Ok(256);
    }
    match parse_size(rest) {
        Some(bits) if bits % 8 == 0 && (8..=256).contains(&bits) => Ok(bits),
        _ => Err(AbiError::AbiParse(format!("Invalid integer size: {}", whole))),
    }
}

fn parse_size(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Split a tuple body on commas that are not nested in parentheses
fn split_top_level<'a>(body: &'a str, whole: &str) -> Result<Vec<&'a str>, AbiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| AbiError::AbiParse(format!("Unbalanced tuple type: {}", whole)))?;
            }
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::AbiParse(format!("Unbalanced tuple type: {}", whole)));
    }
    parts.push(&body[start..]);
    Ok(parts)
}
