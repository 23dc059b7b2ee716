//! Dynamic member values.
//!
//! `Value` is the value type of the headless host. The web bridge uses
//! `JsValue` instead; both go through the `HostValue` trait.

use crate::host::{HostValue, dimension_from_f64};
use std::fmt;

/// What a host reports for a member name.
#[derive(Debug, Clone, PartialEq)]
pub enum Member<V> {
    /// A plain data member with its current value.
    Data(V),
    /// A function-valued member. The caller must keep the receiver.
    Method,
}

/// A loosely typed value, modelled on what a script host can store in a
/// canvas or context property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Numeric coercion used for numeric DOM attributes.
    /// Anything that is not a finite number becomes 0.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) if n.is_finite() => *n,
            Value::Bool(true) => 1.0,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl HostValue for Value {
    fn undefined() -> Self {
        Value::Undefined
    }

    fn from_bool(b: bool) -> Self {
        Value::Bool(b)
    }

    fn as_dimension(&self) -> Option<u32> {
        match self {
            Value::Number(n) => dimension_from_f64(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}
