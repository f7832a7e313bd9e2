//! Wire codec for RelState
//!
//! Text-safe representation for carrying values across process, CLI, and
//! HTTP boundaries. Every value is prefixed with a single discriminant
//! character; containers serialize to JSON whose leaves are themselves
//! wire-encoded, so the form is self-describing at every depth. The wire
//! codec round-trips independently of the storage codec.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::{decimal_from_text, decimal_to_text, Structured, Value};

/// Wire discriminant for String (payload: raw text)
pub const WIRE_STRING: char = '0';
/// Wire discriminant for Bytes (payload: base64)
pub const WIRE_BYTES: char = '1';
/// Wire discriminant for Decimal (payload: exact decimal text)
pub const WIRE_DECIMAL: char = '2';
/// Wire discriminant for Integer (payload: decimal digits)
pub const WIRE_INTEGER: char = '3';
/// Wire discriminant for Boolean (payload: `0` or `1`)
pub const WIRE_BOOLEAN: char = '4';
/// Wire discriminant for Structured (payload: structured JSON text)
pub const WIRE_STRUCTURED: char = '5';

/// Encode a value as tagged wire text. Never fails for well-typed input.
pub fn encode_wire(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{}{}", WIRE_STRING, s),
        Value::Bytes(b) => format!("{}{}", WIRE_BYTES, BASE64.encode(b)),
        Value::Decimal(d) => format!("{}{}", WIRE_DECIMAL, decimal_to_text(d)),
        Value::Integer(i) => format!("{}{}", WIRE_INTEGER, i),
        Value::Boolean(b) => format!("{}{}", WIRE_BOOLEAN, if *b { '1' } else { '0' }),
        Value::Structured(s) => format!("{}{}", WIRE_STRUCTURED, structured_to_text(s)),
    }
}

/// Decode tagged wire text back into a value.
pub fn decode_wire(text: &str) -> Result<Value> {
    let mut chars = text.chars();
    let tag = chars
        .next()
        .ok_or_else(|| Error::malformed("empty wire value"))?;
    let payload = chars.as_str();
    match tag {
        WIRE_STRING => Ok(Value::String(payload.to_string())),
        WIRE_BYTES => {
            let bytes = BASE64
                .decode(payload)
                .map_err(|e| Error::malformed(format!("invalid base64 payload: {}", e)))?;
            Ok(Value::Bytes(bytes))
        }
        WIRE_DECIMAL => Ok(Value::Decimal(decimal_from_text(payload)?)),
        WIRE_INTEGER => payload
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| Error::malformed(format!("invalid integer payload '{}'", payload))),
        WIRE_BOOLEAN => match payload {
            "0" => Ok(Value::Boolean(false)),
            "1" => Ok(Value::Boolean(true)),
            _ => Err(Error::malformed(format!(
                "invalid boolean payload '{}'",
                payload
            ))),
        },
        WIRE_STRUCTURED => Ok(Value::Structured(structured_from_text(payload)?)),
        other => Err(Error::UnknownWireTag(other)),
    }
}

/// Serialize a structured value to its canonical JSON text: maps become
/// objects, sequences become arrays, and every leaf becomes a JSON string
/// holding that leaf's wire encoding.
pub fn structured_to_text(structured: &Structured) -> String {
    structured_node(structured).to_string()
}

/// Parse canonical structured JSON text back into a structured value.
pub fn structured_from_text(text: &str) -> Result<Structured> {
    let node: serde_json::Value = serde_json::from_str(text)?;
    match node_to_value(&node)? {
        Value::Structured(s) => Ok(s),
        _ => Err(Error::malformed(
            "structured text must be a JSON object or array",
        )),
    }
}

fn structured_node(structured: &Structured) -> serde_json::Value {
    match structured {
        Structured::Map(map) => {
            let mut object = serde_json::Map::new();
            for (key, value) in map {
                object.insert(key.clone(), value_node(value));
            }
            serde_json::Value::Object(object)
        }
        Structured::Seq(seq) => serde_json::Value::Array(seq.iter().map(value_node).collect()),
    }
}

fn value_node(value: &Value) -> serde_json::Value {
    match value {
        Value::Structured(s) => structured_node(s),
        leaf => serde_json::Value::String(encode_wire(leaf)),
    }
}

fn node_to_value(node: &serde_json::Value) -> Result<Value> {
    match node {
        serde_json::Value::String(s) => decode_wire(s),
        serde_json::Value::Object(object) => {
            let mut map = IndexMap::with_capacity(object.len());
            for (key, member) in object {
                map.insert(key.clone(), node_to_value(member)?);
            }
            Ok(Value::Structured(Structured::Map(map)))
        }
        serde_json::Value::Array(array) => {
            let seq = array
                .iter()
                .map(node_to_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Structured(Structured::Seq(seq)))
        }
        other => Err(Error::malformed(format!(
            "unexpected JSON node {} in structured text",
            other
        ))),
    }
}

/// Encode a value as one opaque transport string (base64 of the wire text).
///
/// This is the only supported mechanism for passing typed values through a
/// CLI argument or HTTP field.
pub fn encode_transport(value: &Value) -> String {
    BASE64.encode(encode_wire(value))
}

/// Decode a transport string produced by [`encode_transport`].
pub fn decode_transport(text: &str) -> Result<Value> {
    let bytes = BASE64
        .decode(text)
        .map_err(|e| Error::malformed(format!("invalid transport base64: {}", e)))?;
    let wire = String::from_utf8(bytes)
        .map_err(|e| Error::malformed(format!("transport payload is not UTF-8: {}", e)))?;
    decode_wire(&wire)
}

/// Structured success/failure payload surfaced at the outermost boundary.
///
/// A failure is never reported as a partial success: either `success` is
/// true and `data` holds a transport-encoded value, or `success` is false
/// and `error` (plus an optional `trace`) describes what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ResponsePayload {
    /// Build a success payload carrying a transport-encoded value
    pub fn ok(value: &Value) -> Self {
        Self {
            success: true,
            data: Some(encode_transport(value)),
            error: None,
            trace: None,
        }
    }

    /// Build a failure payload from an error
    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            trace: None,
        }
    }

    /// Attach a trace to a failure payload
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}
