//! Table schema definitions for RelState
//!
//! A schema is an ordered column-name to value-kind mapping. It is built
//! once and immutable afterward; there are no migrations.

use indexmap::IndexMap;

use crate::value::ValueKind;

/// Ordered column definitions for one table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSchema {
    columns: IndexMap<String, ValueKind>,
}

impl TableSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, consuming and returning the schema for chaining
    pub fn column(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.columns.insert(name.into(), kind);
        self
    }

    /// Get the declared kind of a column
    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.columns.get(name).copied()
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate over (name, kind) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Column names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
