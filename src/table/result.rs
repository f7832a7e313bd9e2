//! Immutable typed view over one query's raw rows
//!
//! Every raw cell is decoded through the storage codec exactly once at
//! construction. Derived views (column extraction, row-as-map, the rendered
//! grid) are computed once per distinct argument and memoized for the
//! instance's lifetime. The interior caches assume single-threaded
//! cooperative scheduling; a multi-threaded port must put locks around them.

use indexmap::IndexMap;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::codec::storage::{decode_storage, StorageCell};
use crate::error::{Error, Result};
use crate::query::ValueMap;
use crate::table::display::{render_grid, DisplayConfig};
use crate::value::Value;

/// Which rows `get_rows` should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSelector {
    /// Every row
    All,
    /// The single row at this index (empty when out of range)
    One(usize),
    /// The half-open index range `[start, end)`, clamped to the table
    Range(usize, usize),
}

/// Immutable decoded snapshot of one query's result
pub struct ResultTable {
    columns: Vec<String>,
    offsets: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
    config: DisplayConfig,
    column_cache: RefCell<HashMap<String, Rc<Vec<Value>>>>,
    rows_cache: RefCell<HashMap<RowSelector, Rc<Vec<ValueMap>>>>,
    rendered: OnceCell<String>,
}

impl ResultTable {
    /// Decode raw storage cells into a typed table.
    ///
    /// This is the only place decoding happens; every later access reuses
    /// the decoded rows.
    pub fn from_raw(columns: Vec<String>, raw_rows: Vec<Vec<StorageCell>>) -> Result<Self> {
        let rows = raw_rows
            .iter()
            .map(|row| row.iter().map(decode_storage).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows(columns, rows))
    }

    /// Build a table from already-decoded rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let offsets = columns
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self {
            columns,
            offsets,
            rows,
            config: DisplayConfig::from_env(),
            column_cache: RefCell::new(HashMap::new()),
            rows_cache: RefCell::new(HashMap::new()),
            rendered: OnceCell::new(),
        }
    }

    /// Override the display bounds (before the first render)
    pub fn with_display_config(mut self, config: DisplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Column names in result order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Decoded rows in result order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Extract one column by name; memoized per name.
    pub fn get_column(&self, name: &str) -> Result<Rc<Vec<Value>>> {
        if let Some(cached) = self.column_cache.borrow().get(name) {
            return Ok(Rc::clone(cached));
        }
        let index = *self
            .offsets
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        let column = Rc::new(
            self.rows
                .iter()
                .map(|row| row[index].clone())
                .collect::<Vec<_>>(),
        );
        self.column_cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&column));
        Ok(column)
    }

    /// View rows as ordered column-to-value maps; memoized per selector.
    pub fn get_rows(&self, selector: RowSelector) -> Rc<Vec<ValueMap>> {
        if let Some(cached) = self.rows_cache.borrow().get(&selector) {
            return Rc::clone(cached);
        }
        let count = self.rows.len();
        let (start, end) = match selector {
            RowSelector::All => (0, count),
            RowSelector::One(index) => (index.min(count), (index + 1).min(count)),
            RowSelector::Range(start, end) => {
                let start = start.min(count);
                (start, end.min(count).max(start))
            }
        };
        let maps = Rc::new(
            self.rows[start..end]
                .iter()
                .map(|row| {
                    self.columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect::<IndexMap<String, Value>>()
                })
                .collect::<Vec<_>>(),
        );
        self.rows_cache
            .borrow_mut()
            .insert(selector, Rc::clone(&maps));
        maps
    }

    /// The rendered grid; built on first use and cached for the
    /// instance's lifetime.
    pub fn display(&self) -> &str {
        self.rendered
            .get_or_init(|| render_grid(&self.columns, &self.rows, &self.config))
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl fmt::Debug for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultTable")
            .field("columns", &self.columns)
            .field("row_count", &self.rows.len())
            .finish()
    }
}
