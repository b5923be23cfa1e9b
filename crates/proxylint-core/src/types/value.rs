//! Literal value types for proxylint conditions
//!
//! The `Value` enum represents every literal a condition can carry and every
//! candidate value the analyzer substitutes for a variable.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Condition value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (f64 for simplicity, handles both int and float)
    Number(f64),
    /// String value
    String(String),
}

/// Primitive type of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    Bool,
    Number,
    Str,
    Null,
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Primitive type of this value
    pub fn literal_type(&self) -> LiteralType {
        match self {
            Value::Null => LiteralType::Null,
            Value::Bool(_) => LiteralType::Bool,
            Value::Number(_) => LiteralType::Number,
            Value::String(_) => LiteralType::Str,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value; numeric strings are coerced
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Textual view of the value; null has none
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Number(n) => Some(Cow::Owned(format_number(*n))),
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// Equality with automatic string/number and string/bool coercion
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                s.trim().parse::<f64>().map(|parsed| parsed == *n).unwrap_or(false)
            }
            (Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
                s.eq_ignore_ascii_case(if *b { "true" } else { "false" })
            }
            _ => false,
        }
    }
}

/// Integral numbers render without a fractional part
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
