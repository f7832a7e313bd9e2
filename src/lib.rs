//! RelState - a typed-value codec and relational persistence layer
//!
//! This library provides the core components for storing and moving a fixed
//! set of value kinds across three boundaries:
//! - Value model (string, integer, exact decimal, boolean, structured, bytes)
//! - Tagged codecs (storage cells, SQL-literal text, wire text)
//! - Query builder (literal-spliced single-table statements)
//! - Relational store (embedded SQLite execution)
//! - Result table (immutable, memoized typed view with bounded display)
//! - Memoization cache (append-only persisted key/value facts)

pub mod cache;
pub mod codec;
pub mod error;
pub mod query;
pub mod store;
pub mod table;
pub mod value;

pub use error::{Error, Result};
pub use value::{Structured, Value, ValueKind};
