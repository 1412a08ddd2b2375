//! In-process host runtime
//!
//! A small dynamically typed value model that plays the role of the foreign
//! runtime when the routines are driven from Rust. Shared values live behind
//! `Rc`, so reference ownership can be observed with `Rc::strong_count`.
//!
//! # Example
//!
//! ```
//! use kumquat::bridge::native::{call_routine, Value};
//! use kumquat::{CallArgs, Routine};
//!
//! let f = Value::function("one", |_args, _kwargs| Ok(Value::Float(1.0)));
//! let output = call_routine(
//!     Routine::TanhSinh,
//!     CallArgs::new(vec![f, Value::Float(0.0), Value::Float(2.0)]),
//! )
//! .unwrap();
//!
//! let items = output.as_tuple().unwrap();
//! let value = items[0].as_complex().unwrap();
//! assert!((value.re - 2.0).abs() < 1e-10);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use num_complex::Complex64;
use thiserror::Error;

use super::{CallArgs, ForeignBridge};
use crate::error::IntegrationError;
use crate::routine::diagnostics::DiagnosticValue;
use crate::routine::{dispatch, Integral, Routine};

/// Keyword arguments passed to a native function
pub type Keywords = BTreeMap<String, Value>;

type NativeBody = dyn Fn(&[Value], Option<&Keywords>) -> Result<Value, HostError>;

/// Error raised by native host functions
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind}: {message}")]
pub struct HostError {
    /// Exception class name, e.g. "TypeError"
    pub kind: String,
    pub message: String,
}

impl HostError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// A named Rust closure callable from the host runtime
pub struct NativeFunction {
    name: String,
    body: Box<NativeBody>,
}

impl NativeFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, args: &[Value], kwargs: Option<&Keywords>) -> Result<Value, HostError> {
        (self.body)(args, kwargs)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// Host runtime value
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex64),
    Str(Rc<str>),
    Tuple(Rc<[Value]>),
    Dict(Rc<Keywords>),
    Function(Rc<NativeFunction>),
}

impl Value {
    /// Wrap a closure as a callable host value
    pub fn function<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value], Option<&Keywords>) -> Result<Value, HostError> + 'static,
    {
        Value::Function(Rc::new(NativeFunction {
            name: name.into(),
            body: Box::new(body),
        }))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Dict(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn str(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Complex view following the host's numeric tower (int < float < complex)
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Complex(z) => Some(*z),
            Value::Float(x) => Some(Complex64::new(*x, 0.0)),
            Value::Int(i) => Some(Complex64::new(*i as f64, 0.0)),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Keywords> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Value::Complex(z)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::str(&s),
            serde_json::Value::Array(items) => Value::tuple(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::dict(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// [`ForeignBridge`] over [`Value`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBridge;

impl ForeignBridge for NativeBridge {
    type Object = Value;
    type Error = HostError;

    fn placeholder(&self) -> Value {
        Value::None
    }

    fn is_none(&self, object: &Value) -> bool {
        object.is_none()
    }

    fn is_callable(&self, object: &Value) -> bool {
        matches!(object, Value::Function(_))
    }

    fn sequence_items(&self, object: &Value) -> Option<Vec<Value>> {
        object.as_tuple().map(<[Value]>::to_vec)
    }

    fn is_mapping(&self, object: &Value) -> bool {
        matches!(object, Value::Dict(_))
    }

    fn to_real(&self, object: &Value) -> Option<f64> {
        object.as_f64()
    }

    fn to_bool(&self, object: &Value) -> Option<bool> {
        match object {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    fn to_unsigned(&self, object: &Value) -> Option<u64> {
        match object {
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    fn to_complex(&self, object: &Value) -> Option<Complex64> {
        object.as_complex()
    }

    fn from_real(&self, x: f64) -> Result<Value, HostError> {
        Ok(Value::Float(x))
    }

    fn call(
        &self,
        callable: &Value,
        args: &[Value],
        kwargs: Option<&Value>,
    ) -> Result<Value, HostError> {
        let function = match callable {
            Value::Function(function) => function,
            other => {
                return Err(HostError::new(
                    "TypeError",
                    format!("'{}' object is not callable", other.type_name()),
                ))
            }
        };

        let keywords = match kwargs {
            Some(Value::Dict(map)) => Some(map.as_ref()),
            Some(other) => {
                return Err(HostError::new(
                    "TypeError",
                    format!(
                        "argument after ** must be a mapping, not {}",
                        other.type_name()
                    ),
                ))
            }
            None => None,
        };

        function.invoke(args, keywords)
    }

    fn type_name(&self, object: &Value) -> String {
        object.type_name().to_string()
    }
}

/// Convert a routine result into the host's return shape
///
/// `(complex, float)` or `(complex, float, dict)` when diagnostics are present.
pub fn integral_to_value(integral: &Integral) -> Value {
    let mut items = vec![Value::Complex(integral.value), Value::Float(integral.error)];

    if let Some(diagnostics) = &integral.diagnostics {
        let entries = diagnostics.entries().into_iter().map(|(key, value)| {
            let value = match value {
                DiagnosticValue::Real(x) => Value::Float(x),
                DiagnosticValue::Count(n) => Value::Int(i64::try_from(n).unwrap_or(i64::MAX)),
                DiagnosticValue::Reals(xs) => Value::tuple(xs.iter().copied().map(Value::Float)),
            };
            (key, value)
        });
        items.push(Value::dict(entries));
    }

    Value::tuple(items)
}

/// Run one routine end to end inside the host runtime
pub fn call_routine(
    routine: Routine,
    input: CallArgs<Value>,
) -> Result<Value, IntegrationError<HostError>> {
    let integral = dispatch::integrate(&NativeBridge, routine, input)?;
    Ok(integral_to_value(&integral))
}
