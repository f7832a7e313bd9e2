//! Query builder for RelState
//!
//! Compiles a closed set of single-table operations into executable query
//! text. Values are inlined through the SQL-literal codec; identifiers
//! (table and column names) are spliced untouched and must come only from
//! trusted call sites. The builder never touches an engine.

use indexmap::IndexMap;
use std::fmt;

use crate::codec::sql::encode_sql_literal;
use crate::query::schema::TableSchema;
use crate::value::Value;

/// Ordered column-name to value mapping used for match/set/insert maps
pub type ValueMap = IndexMap<String, Value>;

/// The operation a query performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    CreateTable,
    Insert,
    Update,
    Delete,
    Select,
    DropTable,
}

/// Immutable query text plus its operation tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    kind: QueryKind,
}

/// Column selection for a SELECT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns<'a> {
    /// All columns (`*`)
    All,
    /// A named subset, rendered in the given order
    Named(&'a [&'a str]),
}

/// Ordering for a SELECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    /// Order ascending by a column
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Order descending by a column
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Conjoin `column = <literal>` pairs into a leading-space clause.
/// An empty map yields no clause at all (unconditional statement).
fn key_value_clause(keyword: &str, separator: &str, pairs: &ValueMap) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let assignments: Vec<String> = pairs
        .iter()
        .map(|(column, value)| format!("{} = {}", column, encode_sql_literal(value)))
        .collect();
    format!(" {} {}", keyword, assignments.join(separator))
}

fn where_clause(match_values: Option<&ValueMap>) -> String {
    match match_values {
        Some(pairs) => key_value_clause("WHERE", " AND ", pairs),
        None => String::new(),
    }
}

impl Query {
    /// Wrap raw passthrough text with an explicit operation tag.
    ///
    /// The only escape hatch out of the closed operation set; the text is
    /// executed verbatim.
    pub fn raw(text: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The executable query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The operation tag
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// `CREATE TABLE <name> (<col> <affinity>, ...) STRICT`
    pub fn create_table(table: &str, schema: &TableSchema) -> Self {
        let columns: Vec<String> = schema
            .iter()
            .map(|(name, kind)| format!("{} {}", name, kind.affinity()))
            .collect();
        Self {
            text: format!("CREATE TABLE {} ({}) STRICT", table, columns.join(", ")),
            kind: QueryKind::CreateTable,
        }
    }

    /// `INSERT INTO <table> (<cols>) VALUES (<literals>)`
    pub fn insert_row(table: &str, values: &ValueMap) -> Self {
        let columns: Vec<&str> = values.keys().map(String::as_str).collect();
        let row: Vec<Value> = values.values().cloned().collect();
        Self::insert_rows(table, &columns, &[row])
    }

    /// Multi-row insert: comma-joined parenthesized literal tuples
    pub fn insert_rows(table: &str, columns: &[&str], rows: &[Vec<Value>]) -> Self {
        let tuples: Vec<String> = rows
            .iter()
            .map(|row| {
                let literals: Vec<String> = row.iter().map(encode_sql_literal).collect();
                format!("({})", literals.join(", "))
            })
            .collect();
        Self {
            text: format!(
                "INSERT INTO {} ({}) VALUES {}",
                table,
                columns.join(", "),
                tuples.join(", ")
            ),
            kind: QueryKind::Insert,
        }
    }

    /// `UPDATE <table> SET <col = literal, ...> WHERE <col = literal AND ...>`
    pub fn update_table(table: &str, match_values: &ValueMap, new_values: &ValueMap) -> Self {
        let set = key_value_clause("SET", ", ", new_values);
        let matched = key_value_clause("WHERE", " AND ", match_values);
        Self {
            text: format!("UPDATE {}{}{}", table, set, matched),
            kind: QueryKind::Update,
        }
    }

    /// `DELETE FROM <table> [WHERE ...]` — no match deletes every row
    pub fn delete_rows(table: &str, match_values: Option<&ValueMap>) -> Self {
        Self {
            text: format!("DELETE FROM {}{}", table, where_clause(match_values)),
            kind: QueryKind::Delete,
        }
    }

    /// `DROP TABLE <table>`
    pub fn drop_table(table: &str) -> Self {
        Self {
            text: format!("DROP TABLE {}", table),
            kind: QueryKind::DropTable,
        }
    }

    /// `SELECT <cols|*> FROM <table> [WHERE ...] [ORDER BY ...]`
    pub fn get_table(
        table: &str,
        columns: Columns<'_>,
        match_values: Option<&ValueMap>,
        order: Option<&OrderBy>,
    ) -> Self {
        let column_list = match columns {
            Columns::All => "*".to_string(),
            Columns::Named(names) => names.join(", "),
        };
        let ordering = match order {
            Some(order) => format!(
                " ORDER BY {} {}",
                order.column,
                if order.ascending { "ASC" } else { "DESC" }
            ),
            None => String::new(),
        };
        Self {
            text: format!(
                "SELECT {} FROM {}{}{}",
                column_list,
                table,
                where_clause(match_values),
                ordering
            ),
            kind: QueryKind::Select,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
