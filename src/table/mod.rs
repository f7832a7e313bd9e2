//! Result table module
//!
//! This module contains the immutable typed view over one query's rows and
//! its bounded pretty-printing.

pub mod display;
pub mod result;

pub use display::DisplayConfig;
pub use result::{ResultTable, RowSelector};
