//! Value model module
//!
//! This module contains the closed set of representable value kinds and
//! the exact-decimal text helpers.

pub mod decimal;
pub mod value;

pub use decimal::{decimal_from_text, decimal_to_text};
pub use value::{Structured, Value, ValueKind};
