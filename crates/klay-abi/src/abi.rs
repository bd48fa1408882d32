//! Contract ABI catalogue parsed from the JSON ABI format

use serde::Deserialize;
use serde_json::Value;

use crate::function::{Constructor, Function, Param, StateMutability};
use crate::param_type::{apply_array_suffixes, parse_type, tuple_type};
use crate::{AbiError, AbiType, Token};

/// Parsed contract ABI: functions in declaration order plus the
/// constructor, when one is declared.
///
/// Read-only after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abi {
    constructor: Option<Constructor>,
    functions: Vec<Function>,
}

#[derive(Debug, Deserialize)]
struct JsonEntry {
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<JsonParam>,
    #[serde(default)]
    outputs: Vec<JsonParam>,
    #[serde(rename = "stateMutability")]
    state_mutability: Option<StateMutability>,
    #[serde(default)]
    constant: bool,
    #[serde(default)]
    payable: bool,
}

#[derive(Debug, Deserialize)]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    components: Option<Vec<JsonParam>>,
}

impl Abi {
    /// Create an ABI from already-built functions
    pub fn new(functions: Vec<Function>) -> Self {
        Self {
            constructor: None,
            functions,
        }
    }

    /// Parse a JSON ABI document.
    ///
    /// Accepts a bare array of entries or a compiler artifact carrying the
    /// array under `"abi"`. The first constructor entry is kept; events,
    /// errors and fallback or receive entries are skipped.
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| AbiError::AbiParse(e.to_string()))?;

        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut artifact) => match artifact.remove("abi") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(AbiError::AbiParse(
                        "Expected a JSON array or an object with an \"abi\" array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(AbiError::AbiParse(
                    "Expected a JSON array of ABI entries".to_string(),
                ))
            }
        };

        let mut constructor = None;
        let mut functions = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let kind = match entry.get("type") {
                None => "function".to_string(),
                Some(Value::String(kind)) => kind.clone(),
                Some(other) => {
                    return Err(AbiError::AbiParse(format!(
                        "Entry {}: invalid type field {}",
                        index, other
                    )))
                }
            };
            if kind != "function" && kind != "constructor" {
                continue;
            }

            let entry: JsonEntry = serde_json::from_value(entry)
                .map_err(|e| AbiError::AbiParse(format!("Entry {}: {}", index, e)))?;
            if kind == "constructor" {
                if constructor.is_none() {
                    constructor = Some(Constructor::new(resolve_params(&entry.inputs)?));
                }
            } else {
                functions.push(build_function(entry, index)?);
            }
        }

        Ok(Self {
            constructor,
            functions,
        })
    }

    /// Add a function with builder pattern
    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Set the constructor with builder pattern
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Declared constructor, if any
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Deployment payload: `bytecode` followed by the encoded constructor
    /// arguments. Without a declared constructor no arguments are accepted.
    pub fn encode_constructor(&self, bytecode: &[u8], args: &[Token]) -> Result<Vec<u8>, AbiError> {
        match &self.constructor {
            Some(constructor) => constructor.encode_input(bytecode, args),
            None => Constructor::default().encode_input(bytecode, args),
        }
    }

    /// First function with the given name, in declaration order
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))
    }

    /// Function whose selector matches
    pub fn function_by_selector(&self, selector: [u8; 4]) -> Option<&Function> {
        self.functions.iter().find(|f| f.selector() == selector)
    }

    /// All functions in declaration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the ABI declares no functions
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn build_function(entry: JsonEntry, index: usize) -> Result<Function, AbiError> {
    let name = match entry.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AbiError::AbiParse(format!("Entry {}: function without a name", index))),
    };

    let inputs = resolve_params(&entry.inputs)?;
    let outputs = resolve_params(&entry.outputs)?;

    // legacy ABIs carry `constant`/`payable` instead of `stateMutability`
    let state_mutability = match entry.state_mutability {
        Some(mutability) => mutability,
        None if entry.constant => StateMutability::View,
        None if entry.payable => StateMutability::Payable,
        None => StateMutability::NonPayable,
    };

    Ok(Function::new(name, inputs, outputs, state_mutability))
}

fn resolve_params(params: &[JsonParam]) -> Result<Vec<Param>, AbiError> {
    params
        .iter()
        .map(|p| Ok(Param::new(p.name.clone(), resolve_type(p)?)))
        .collect()
}

fn resolve_type(param: &JsonParam) -> Result<AbiType, AbiError> {
    if let Some(suffixes) = param.kind.strip_prefix("tuple") {
        // `tuple`, `tuple[]`, `tuple[2][]` take their fields from components
        if !suffixes.starts_with('(') {
            let components = param.components.as_ref().ok_or_else(|| {
                AbiError::AbiParse(format!(
                    "Tuple parameter `{}` has no components",
                    param.name
                ))
            })?;
            let fields = components
                .iter()
                .map(resolve_type)
                .collect::<Result<Vec<_>, _>>()?;
            let tuple = tuple_type(fields, &format!("parameter `{}`", param.name))?;
            return apply_array_suffixes(tuple, suffixes);
        }
    }
    parse_type(&param.kind)
}
