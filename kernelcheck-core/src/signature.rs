//! Solve Signatures
//!
//! A challenge declares, for every parameter of `solve`, its type and its
//! direction. Only `out` and `inout` parameters are compared after a run.

use crate::args::{KernelArgs, Value};
use crate::tensor::DType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data-flow direction of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Read-only input
    In,
    /// Written by the kernel
    Out,
    /// Read and written by the kernel
    InOut,
}

impl Direction {
    /// Whether the parameter carries results that must be compared
    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "inout" => Ok(Direction::InOut),
            other => Err(format!("Unknown parameter direction: {}", other)),
        }
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Tensor(DType),
    Int,
    Float,
    Bool,
}

impl ParamType {
    /// Whether `value` has this declared type
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::Tensor(dtype), Value::Tensor(t)) => t.dtype() == dtype,
            (ParamType::Int, Value::Int(_)) => true,
            (ParamType::Float, Value::Float(_)) => true,
            (ParamType::Bool, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Tensor(dtype) => write!(f, "tensor<{dtype}>"),
            ParamType::Int => f.write_str("int"),
            ParamType::Float => f.write_str("float"),
            ParamType::Bool => f.write_str("bool"),
        }
    }
}

/// A single declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub ty: ParamType,
    pub direction: Direction,
}

/// Errors raised when a test case does not fit the declared signature
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignatureError {
    #[error("parameter '{0}' is declared but not supplied")]
    Missing(String),
    #[error("argument '{0}' is not a declared parameter")]
    Unexpected(String),
    #[error("argument '{name}' should be {expected}, found {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        actual: String,
    },
}

/// Ordered parameter declarations for a challenge's `solve`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<(String, Param)>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style parameter declaration
    pub fn with(mut self, name: impl Into<String>, ty: ParamType, direction: Direction) -> Self {
        self.params.push((name.into(), Param { ty, direction }));
        self
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// `out` and `inout` parameters in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.iter().filter(|(_, p)| p.direction.is_output())
    }

    /// Check that `args` supplies exactly the declared parameters with the
    /// declared types.
    pub fn check(&self, args: &KernelArgs) -> Result<(), SignatureError> {
        for (name, param) in self.iter() {
            let value = args
                .get(name)
                .ok_or_else(|| SignatureError::Missing(name.to_string()))?;
            if !param.ty.accepts(value) {
                let actual = match value {
                    Value::Tensor(t) => format!("tensor<{}>", t.dtype()),
                    other => other.kind().to_string(),
                };
                return Err(SignatureError::TypeMismatch {
                    name: name.to_string(),
                    expected: param.ty,
                    actual,
                });
            }
        }

        if let Some(extra) = args.names().find(|n| self.param(n).is_none()) {
            return Err(SignatureError::Unexpected(extra.to_string()));
        }

        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, ParamType, Direction)> for Signature {
    fn from_iter<I: IntoIterator<Item = (K, ParamType, Direction)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Signature::new(), |sig, (name, ty, dir)| sig.with(name, ty, dir))
    }
}
