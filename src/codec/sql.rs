//! SQL-literal codec for RelState
//!
//! Renders a value as a token safe to splice directly into query text. The
//! literal shape is fully determined by the value's storage cell: TEXT cells
//! become quoted strings, INTEGER cells become digits, and blob cells become
//! hex blob literals carrying their kind discriminant.
//!
//! String literals are quoted with **no further escaping**. This is a
//! deliberate trust-boundary contract inherited by every builder that
//! splices literals: string values must come from trusted call sites, since
//! an embedded quote reaches the engine verbatim.

use crate::codec::storage::{encode_storage, StorageCell};
use crate::value::Value;

/// Encode a value as an inline SQL literal. Never fails for well-typed input.
pub fn encode_sql_literal(value: &Value) -> String {
    match encode_storage(value) {
        StorageCell::Text(s) => format!("'{}'", s),
        StorageCell::Int(i) => i.to_string(),
        StorageCell::Blob(blob) => format!("x'{}'", hex::encode(blob)),
    }
}
