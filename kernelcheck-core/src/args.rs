//! Kernel Arguments
//!
//! A test case is an ordered set of named arguments, mirroring a keyword
//! argument call. Tensor arguments are mutated in place by the callee.

use crate::tensor::Tensor;
use std::fmt;

/// A single kernel argument value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Mutable numeric buffer
    Tensor(Tensor),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// Boolean flag
    Bool(bool),
}

impl Value {
    /// Kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Tensor(_) => "tensor",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tensor_mut(&mut self) -> Option<&mut Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Tensor(t) => write!(f, "{t}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Tensor(t)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    /// Saturates at `i64::MAX`
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Errors from named argument access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgError {
    #[error("missing argument '{0}'")]
    Missing(String),
    #[error("argument '{name}' is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Ordered named arguments for one kernel invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KernelArgs {
    entries: Vec<(String, Value)>,
}

impl KernelArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an argument, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Argument names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn tensor(&self, name: &str) -> Result<&Tensor, ArgError> {
        match self.get(name) {
            Some(Value::Tensor(t)) => Ok(t),
            Some(other) => Err(wrong_kind(name, "tensor", other)),
            None => Err(ArgError::Missing(name.to_string())),
        }
    }

    pub fn tensor_mut(&mut self, name: &str) -> Result<&mut Tensor, ArgError> {
        match self.get_mut(name) {
            Some(Value::Tensor(t)) => Ok(t),
            Some(other) => Err(wrong_kind(name, "tensor", other)),
            None => Err(ArgError::Missing(name.to_string())),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, ArgError> {
        match self.get(name) {
            Some(Value::Int(v)) => Ok(*v),
            Some(other) => Err(wrong_kind(name, "int", other)),
            None => Err(ArgError::Missing(name.to_string())),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64, ArgError> {
        match self.get(name) {
            Some(Value::Float(v)) => Ok(*v),
            Some(other) => Err(wrong_kind(name, "float", other)),
            None => Err(ArgError::Missing(name.to_string())),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, ArgError> {
        match self.get(name) {
            Some(Value::Bool(v)) => Ok(*v),
            Some(other) => Err(wrong_kind(name, "bool", other)),
            None => Err(ArgError::Missing(name.to_string())),
        }
    }

    /// Borrow output tensor `name` mutably while the remaining arguments
    /// stay readable.
    ///
    /// ```ignore
    /// args.with_output("y", |y, args| {
    ///     let x = args.tensor("x")?.as_f32()?;
    ///     for (o, i) in y.as_f32_mut()?.iter_mut().zip(x) {
    ///         *o = i * 2.0;
    ///     }
    ///     Ok(())
    /// })?
    /// ```
    ///
    /// The output is detached from the argument set for the duration of the
    /// closure, so `args.tensor(name)` inside the closure reports it missing.
    pub fn with_output<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Tensor, &KernelArgs) -> R,
    ) -> Result<R, ArgError> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ArgError::Missing(name.to_string()))?;

        let (key, value) = self.entries.remove(index);
        match value {
            Value::Tensor(mut tensor) => {
                let result = f(&mut tensor, self);
                self.entries.insert(index, (key, Value::Tensor(tensor)));
                Ok(result)
            }
            other => {
                let err = wrong_kind(name, "tensor", &other);
                self.entries.insert(index, (key, other));
                Err(err)
            }
        }
    }

    /// Copy for an independent reference run.
    ///
    /// Tensors are deep-copied into fresh buffers; scalars are copied by value.
    pub fn reference_copy(&self) -> KernelArgs {
        let entries = self
            .entries
            .iter()
            .map(|(name, value)| {
                let copy = match value {
                    Value::Tensor(t) => Value::Tensor(t.clone()),
                    Value::Int(v) => Value::Int(*v),
                    Value::Float(v) => Value::Float(*v),
                    Value::Bool(v) => Value::Bool(*v),
                };
                (name.clone(), copy)
            })
            .collect();
        KernelArgs { entries }
    }
}

fn wrong_kind(name: &str, expected: &'static str, actual: &Value) -> ArgError {
    ArgError::WrongKind {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

impl<K, V> FromIterator<(K, V)> for KernelArgs
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = KernelArgs::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}
