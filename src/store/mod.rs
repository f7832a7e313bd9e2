//! Relational store for RelState
//!
//! Thin execution wrapper around one embedded SQLite connection. The store
//! does no caching, no decoding, and no retry: engine errors propagate
//! unmodified. All queries serialize through the single connection; a write
//! call given multiple queries commits them as one atomic unit.
//!
//! The async surface does its engine work inline, which fits the
//! single-threaded cooperative model: a stalled engine call blocks its
//! calling task, and timeout policy belongs to callers.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::codec::storage::StorageCell;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::table::ResultTable;

/// A local embedded relational store
pub struct RelationalStore {
    conn: Connection,
}

impl RelationalStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// List the names of all user tables
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Execute one read query and return its raw columns and rows.
    ///
    /// Concurrent reads interleave at the scheduler's discretion and are
    /// not atomic as a batch; callers needing a consistent multi-row view
    /// must issue one query.
    pub async fn execute_read(
        &self,
        query: &Query,
    ) -> Result<(Vec<String>, Vec<Vec<StorageCell>>)> {
        debug!(kind = ?query.kind(), "executing read query");
        let mut stmt = self.conn.prepare(query.text())?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let mut raw_rows = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for index in 0..column_count {
                cells.push(cell_from_engine(row.get_ref(index)?)?);
            }
            raw_rows.push(cells);
        }
        Ok((columns, raw_rows))
    }

    /// Execute one read query and decode it into a typed result table
    pub async fn read(&self, query: &Query) -> Result<ResultTable> {
        let (columns, raw_rows) = self.execute_read(query).await?;
        ResultTable::from_raw(columns, raw_rows)
    }

    /// Execute the given queries as one atomic unit.
    ///
    /// Either every query commits or none does; no partial application is
    /// observable.
    pub async fn execute_write(&mut self, queries: &[Query]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for query in queries {
            debug!(kind = ?query.kind(), "executing write query");
            tx.execute(query.text(), [])?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Translate an engine cell into a raw storage cell.
///
/// The value model has no Null and no float kind, so NULL and REAL cells
/// are outside the codec's domain and refuse to decode.
fn cell_from_engine(value: ValueRef<'_>) -> Result<StorageCell> {
    match value {
        ValueRef::Text(text) => {
            let text = std::str::from_utf8(text)
                .map_err(|e| Error::malformed(format!("text cell is not UTF-8: {}", e)))?;
            Ok(StorageCell::Text(text.to_string()))
        }
        ValueRef::Integer(i) => Ok(StorageCell::Int(i)),
        ValueRef::Blob(blob) => Ok(StorageCell::Blob(blob.to_vec())),
        ValueRef::Null => Err(Error::malformed("unexpected NULL cell")),
        ValueRef::Real(_) => Err(Error::malformed("unexpected REAL cell")),
    }
}
