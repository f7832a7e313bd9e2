//! Memoization cache for RelState
//!
//! A process-scoped key to structured-value mapping backed by the
//! relational store, for facts known to be immutable for their lifetime
//! (e.g. an on-chain contract's constant). All entries load into memory at
//! `load`; reads and writes touch only the in-memory mapping; `flush`
//! appends entries absent from the last-loaded snapshot as new rows.
//! Entries are never updated or deleted, matching the immutability
//! contract of what may be cached.
//!
//! The cache is an explicit object whose lifetime is bounded by its
//! `load`/`flush` calls; it is not a module-level singleton.

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::debug;

use crate::codec::wire::encode_wire;
use crate::error::{Error, Result};
use crate::query::{Columns, Query, TableSchema, ValueMap};
use crate::store::RelationalStore;
use crate::value::{Structured, Value, ValueKind};

/// Default name of the backing table
pub const DEFAULT_CACHE_TABLE: &str = "cache";

const KEY_COLUMN: &str = "cache_key";
const VALUE_COLUMN: &str = "cache_value";

/// Process-scoped append-only memoization cache
#[derive(Debug)]
pub struct MemoCache {
    table: String,
    data: IndexMap<String, Structured>,
    persisted: HashSet<String>,
    loaded: bool,
}

impl MemoCache {
    /// Create a cache backed by the default table
    pub fn new() -> Self {
        Self::with_table(DEFAULT_CACHE_TABLE)
    }

    /// Create a cache backed by a named table
    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            data: IndexMap::new(),
            persisted: HashSet::new(),
            loaded: false,
        }
    }

    /// Look up a key. A miss is an explicit absence, never an error.
    pub fn get(&self, key: &str) -> Option<&Structured> {
        self.data.get(key)
    }

    /// Record a value in memory; it reaches the store at the next `flush`.
    pub fn put(&mut self, key: impl Into<String>, value: Structured) {
        self.data.insert(key.into(), value);
    }

    /// Number of in-memory entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Load all persisted entries into memory, creating the backing table
    /// on first use.
    pub async fn load(&mut self, store: &mut RelationalStore) -> Result<()> {
        let tables = store.list_tables().await?;
        if !tables.iter().any(|name| name == &self.table) {
            let schema = TableSchema::new()
                .column(KEY_COLUMN, ValueKind::String)
                .column(VALUE_COLUMN, ValueKind::Structured);
            store
                .execute_write(&[Query::create_table(&self.table, &schema)])
                .await?;
        }

        let table = store
            .read(&Query::get_table(&self.table, Columns::All, None, None))
            .await?;
        let keys = table.get_column(KEY_COLUMN)?;
        let values = table.get_column(VALUE_COLUMN)?;
        for (key, value) in keys.iter().zip(values.iter()) {
            let (Value::String(key), Value::Structured(value)) = (key, value) else {
                return Err(Error::malformed(format!(
                    "cache table '{}' holds a mistyped row",
                    self.table
                )));
            };
            self.persisted.insert(key.clone());
            self.data.entry(key.clone()).or_insert_with(|| value.clone());
        }
        self.loaded = true;
        debug!(table = %self.table, entries = self.data.len(), "memoization cache loaded");
        Ok(())
    }

    /// Append entries absent from the last-loaded snapshot as new rows.
    ///
    /// Append-only by contract; existing rows are never touched. A cache
    /// that was never loaded has no snapshot to append against and flushes
    /// nothing.
    pub async fn flush(&mut self, store: &mut RelationalStore) -> Result<()> {
        if !self.loaded {
            return Ok(());
        }
        let fresh: Vec<(&String, &Structured)> = self
            .data
            .iter()
            .filter(|(key, _)| !self.persisted.contains(*key))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }
        let rows: Vec<Vec<Value>> = fresh
            .iter()
            .map(|(key, value)| {
                vec![
                    Value::String((*key).clone()),
                    Value::Structured((*value).clone()),
                ]
            })
            .collect();
        store
            .execute_write(&[Query::insert_rows(
                &self.table,
                &[KEY_COLUMN, VALUE_COLUMN],
                &rows,
            )])
            .await?;
        let appended = fresh.len();
        let fresh_keys: Vec<String> = fresh.iter().map(|(key, _)| (*key).clone()).collect();
        for key in fresh_keys {
            self.persisted.insert(key);
        }
        debug!(table = %self.table, appended, "memoization cache flushed");
        Ok(())
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a stable fingerprint for a sequence of values.
///
/// SHA-256 over the length-prefixed wire encodings, so the key depends only
/// on the values and their order. Callers derive cache keys from request
/// identity with this.
pub fn fingerprint<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut hasher = Sha256::new();
    for value in parts {
        let wire = encode_wire(value);
        hasher.update((wire.len() as u64).to_be_bytes());
        hasher.update(wire.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint a match-style map, hashing keys and values in map order.
pub fn fingerprint_map(parts: &ValueMap) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in parts {
        hasher.update((key.len() as u64).to_be_bytes());
        hasher.update(key.as_bytes());
        let wire = encode_wire(value);
        hasher.update((wire.len() as u64).to_be_bytes());
        hasher.update(wire.as_bytes());
    }
    hex::encode(hasher.finalize())
}
