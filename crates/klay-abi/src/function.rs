//! Contract function definitions

use serde::Deserialize;

use crate::call::EncodedCall;
use crate::decode::decode;
use crate::encode::{encode_params_named, function_selector};
use crate::{AbiError, AbiType, Token};

/// Named, typed function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (may be empty)
    pub name: String,
    /// Parameter type
    pub kind: AbiType,
}

impl Param {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, kind: AbiType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Unnamed parameter
    pub fn unnamed(kind: AbiType) -> Self {
        Self::new("", kind)
    }
}

/// Function state mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing from state
    Pure,
    /// Reads state only
    View,
    /// Mutates state, rejects value
    #[default]
    NonPayable,
    /// Mutates state, accepts value
    Payable,
}

impl StateMutability {
    /// Whether calls can be served by a read-only query
    pub fn is_read_only(&self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }

    /// Name as written in the JSON ABI
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

/// Contract function: name, inputs and outputs.
///
/// Immutable once built; the canonical signature and selector are computed
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
    signature: String,
    selector: [u8; 4],
}

impl Function {
    /// Create a new function definition
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<Param>,
        outputs: Vec<Param>,
        state_mutability: StateMutability,
    ) -> Self {
        let name = name.into();
        let types = inputs
            .iter()
            .map(|p| p.kind.canonical())
            .collect::<Vec<_>>()
            .join(",");
        let signature = format!("{}({})", name, types);
        let selector = function_selector(&signature);
        Self {
            name,
            inputs,
            outputs,
            state_mutability,
            signature,
            selector,
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input parameters in declaration order
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Output parameters in declaration order
    pub fn outputs(&self) -> &[Param] {
        &self.outputs
    }

    /// State mutability
    pub fn state_mutability(&self) -> StateMutability {
        self.state_mutability
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 4-byte selector
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// Input types in declaration order
    pub fn input_types(&self) -> Vec<AbiType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Output types in declaration order
    pub fn output_types(&self) -> Vec<AbiType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Encode a call: selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[Token]) -> Result<EncodedCall, AbiError> {
        let body = encode_params_named(&self.inputs, args)?;
        Ok(EncodedCall::new(self.selector, body))
    }

    /// Decode return data against the declared outputs
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.output_types(), data)
    }

    /// Decode the arguments of an encoded call to this function
    pub fn decode_input(&self, call: &[u8]) -> Result<Vec<Token>, AbiError> {
        if call.len() < 4 {
            return Err(AbiError::DecodeLengthMismatch {
                expected: 4,
                got: call.len(),
            });
        }
        if call[..4] != self.selector {
            return Err(AbiError::SelectorMismatch {
                expected: klay_primitives::hexutil::bytes_to_hex(&self.selector),
                got: klay_primitives::hexutil::bytes_to_hex(&call[..4]),
            });
        }
        decode(&self.input_types(), &call[4..])
    }
}

/// Contract constructor: inputs only, no selector.
///
/// A deployment payload is the creation bytecode followed by the encoded
/// constructor arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    inputs: Vec<Param>,
}

impl Constructor {
    /// Create a constructor with the given inputs
    pub fn new(inputs: Vec<Param>) -> Self {
        Self { inputs }
    }

    /// Input parameters in declaration order
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Append the encoded arguments to `bytecode`
    pub fn encode_input(&self, bytecode: &[u8], args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let body = encode_params_named(&self.inputs, args)?;
        let mut data = Vec::with_capacity(bytecode.len() + body.len());
        data.extend_from_slice(bytecode);
        data.extend(body);
        Ok(data)
    }
}
