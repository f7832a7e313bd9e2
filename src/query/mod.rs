//! Query builder module
//!
//! This module contains table schemas and the compilation of the closed
//! operation set into executable query text.

pub mod builder;
pub mod schema;

pub use builder::{Columns, OrderBy, Query, QueryKind, ValueMap};
pub use schema::TableSchema;
