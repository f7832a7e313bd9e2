//! Value and kind types for RelState
//!
//! This module defines how typed values are represented in memory. The set
//! of kinds is closed: every codec matches exhaustively over it, so adding
//! a kind is a compile-time-checked change at every boundary.

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;

use super::decimal::decimal_to_text;

/// A typed value in the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 text
    String(String),
    /// 64-bit signed integer (native INTEGER column affinity)
    Integer(i64),
    /// Exact arbitrary-precision rational; never approximated by a float
    Decimal(BigRational),
    /// Boolean value
    Boolean(bool),
    /// Recursively nested ordered map or sequence
    Structured(Structured),
    /// Raw bytes
    Bytes(Vec<u8>),
}

/// A recursively nested ordered-key map or ordered sequence of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structured {
    /// Ordered-key map with unique keys
    Map(IndexMap<String, Value>),
    /// Ordered sequence
    Seq(Vec<Value>),
}

/// The six value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Structured,
    Bytes,
}

impl ValueKind {
    /// The storage column type this kind is declared with.
    ///
    /// String and Integer use native affinity; every other kind is held
    /// as a tagged blob.
    pub fn affinity(&self) -> &'static str {
        match self {
            ValueKind::String => "TEXT",
            ValueKind::Integer => "INTEGER",
            ValueKind::Decimal => "BLOB",
            ValueKind::Boolean => "BLOB",
            ValueKind::Structured => "BLOB",
            ValueKind::Bytes => "BLOB",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Decimal => write!(f, "decimal"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Structured => write!(f, "structured"),
            ValueKind::Bytes => write!(f, "bytes"),
        }
    }
}

impl Value {
    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Structured(_) => ValueKind::Structured,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Build a decimal value from an integer ratio
    pub fn decimal(numerator: i64, denominator: i64) -> Value {
        Value::Decimal(BigRational::new(
            BigInt::from(numerator),
            BigInt::from(denominator),
        ))
    }

    /// Try to view this value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view this value as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to view this value as a decimal
    pub fn as_decimal(&self) -> Option<&BigRational> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Try to view this value as a structured value
    pub fn as_structured(&self) -> Option<&Structured> {
        match self {
            Value::Structured(s) => Some(s),
            _ => None,
        }
    }
}

/// Human-readable JSON rendering, used only for display.
///
/// Unlike the canonical structured text form, leaves appear as plain JSON
/// values, so the output is not decodable back into a `Value`.
fn display_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Decimal(d) => serde_json::Value::String(decimal_to_text(d)),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Structured(s) => structured_display_json(s),
        Value::Bytes(b) => serde_json::Value::String(format!("0x{}", hex::encode(b))),
    }
}

fn structured_display_json(structured: &Structured) -> serde_json::Value {
    match structured {
        Structured::Map(map) => {
            let mut object = serde_json::Map::new();
            for (key, value) in map {
                object.insert(key.clone(), display_json(value));
            }
            serde_json::Value::Object(object)
        }
        Structured::Seq(seq) => {
            serde_json::Value::Array(seq.iter().map(display_json).collect())
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", decimal_to_text(d)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Structured(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

impl fmt::Display for Structured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", structured_display_json(self))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Structured> for Value {
    fn from(v: Structured) -> Self {
        Value::Structured(v)
    }
}

impl From<IndexMap<String, Value>> for Structured {
    fn from(v: IndexMap<String, Value>) -> Self {
        Structured::Map(v)
    }
}

impl From<Vec<Value>> for Structured {
    fn from(v: Vec<Value>) -> Self {
        Structured::Seq(v)
    }
}
