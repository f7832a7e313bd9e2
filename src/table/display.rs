//! Bounded grid rendering for result tables
//!
//! Renders a table as a text grid with an index gutter. Column widths are
//! computed from the displayed rows only and clamp to a configured maximum
//! with ellipsis truncation; when the row count exceeds the configured
//! maximum, the grid shows a fixed head, an elision marker, and a fixed
//! tail window.

use std::env;

use crate::value::Value;

/// Rows always shown before the elision marker
const HEAD_ROWS: usize = 2;

/// Display bounds for a rendered grid
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Maximum width of any column, padding included
    pub max_column_width: usize,
    /// Maximum number of rows shown without elision
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_column_width: 32,
            max_rows: 8,
        }
    }
}

impl DisplayConfig {
    /// Create a config with default bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum column width
    pub fn max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Set the maximum number of rows shown without elision
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    /// Read bounds from `MAX_COLUMN_WIDTH` and `MAX_ROW_NUM`, falling back
    /// to the defaults for unset or unparsable variables.
    pub fn from_env() -> Self {
        let parse = |name: &str| env::var(name).ok().and_then(|v| v.parse::<usize>().ok());
        let defaults = Self::default();
        Self {
            max_column_width: parse("MAX_COLUMN_WIDTH").unwrap_or(defaults.max_column_width),
            max_rows: parse("MAX_ROW_NUM").unwrap_or(defaults.max_rows),
        }
    }
}

/// Render one cell into exactly `width` characters, truncating over-long
/// text with an ellipsis.
fn cell(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() + 2 > width {
        let kept: String = chars
            .iter()
            .take(width.saturating_sub(6))
            .collect();
        format!(" {} ... ", kept)
    } else {
        format!(" {}{} ", text, " ".repeat(width - chars.len() - 2))
    }
}

pub(crate) fn render_grid(
    columns: &[String],
    rows: &[Vec<Value>],
    config: &DisplayConfig,
) -> String {
    let row_count = rows.len();
    let elided = row_count > config.max_rows;
    let tail = config.max_rows.saturating_sub(HEAD_ROWS);

    // Pre-elision indices of the rows that appear in the grid.
    let displayed: Vec<usize> = if elided {
        (0..HEAD_ROWS.min(row_count))
            .chain(row_count - tail..row_count)
            .collect()
    } else {
        (0..row_count).collect()
    };

    let reprs: Vec<Vec<String>> = displayed
        .iter()
        .map(|&i| rows[i].iter().map(Value::to_string).collect())
        .collect();

    // Widths come from the displayed rows only, never from elided ones.
    let gutter = (row_count.to_string().len() + 2).min(config.max_column_width);
    let mut widths = vec![gutter];
    for (index, name) in columns.iter().enumerate() {
        let content = reprs
            .iter()
            .map(|row| row[index].chars().count())
            .chain(std::iter::once(name.chars().count()))
            .max()
            .unwrap_or(0);
        widths.push((content + 2).min(config.max_column_width));
    }

    let separator = format!(
        "|{}|\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("|")
    );

    let mut head = format!("|{}|", " ".repeat(gutter));
    for (index, name) in columns.iter().enumerate() {
        head.push_str(&cell(name, widths[index + 1]));
        head.push('|');
    }
    head.push('\n');

    let render_row = |position: usize| {
        let mut line = format!("|{}|", cell(&displayed[position].to_string(), gutter));
        for (index, text) in reprs[position].iter().enumerate() {
            line.push_str(&cell(text, widths[index + 1]));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut body = String::new();
    if elided {
        for position in 0..HEAD_ROWS.min(displayed.len()) {
            body.push_str(&render_row(position));
        }
        body.push_str("...\n");
        for position in HEAD_ROWS.min(displayed.len())..displayed.len() {
            body.push_str(&render_row(position));
        }
    } else {
        for position in 0..displayed.len() {
            body.push_str(&render_row(position));
        }
    }

    format!("{}{}{}{}{}", separator, head, separator, body, separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn int_rows(count: usize) -> Vec<Vec<Value>> {
        (0..count)
            .map(|i| vec![Value::from(i as i64), Value::from(format!("row-{}", i))])
            .collect()
    }

    #[test]
    fn test_small_table_shows_all_rows() {
        let grid = render_grid(
            &columns(&["id", "name"]),
            &int_rows(3),
            &DisplayConfig::default(),
        );
        assert!(!grid.contains("...\n"));
        assert!(grid.contains("row-0"));
        assert!(grid.contains("row-2"));
        // sep, head, sep, 3 rows, sep
        assert_eq!(grid.lines().count(), 7);
    }

    #[test]
    fn test_large_table_elides_middle() {
        let grid = render_grid(
            &columns(&["id", "name"]),
            &int_rows(20),
            &DisplayConfig::default(),
        );
        let lines: Vec<&str> = grid.lines().collect();
        // sep, head, sep, 2 head rows, marker, 6 tail rows, sep
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[5], "...");
        assert!(lines[3].contains("row-0"));
        assert!(lines[4].contains("row-1"));
        assert!(lines[6].contains("row-14"));
        assert!(lines[11].contains("row-19"));
        assert!(!grid.contains("row-5"));
    }

    #[test]
    fn test_widths_ignore_elided_rows() {
        let mut rows = int_rows(20);
        // A very wide cell in an elided row must not widen the column.
        rows[10][1] = Value::from("x".repeat(200));
        let narrow = render_grid(
            &columns(&["id", "name"]),
            &int_rows(20),
            &DisplayConfig::default(),
        );
        let wide = render_grid(&columns(&["id", "name"]), &rows, &DisplayConfig::default());
        assert_eq!(narrow, wide);
    }

    #[test]
    fn test_overlong_cell_is_truncated() {
        let rows = vec![vec![Value::from("abcdefghijklmnop")]];
        let config = DisplayConfig::default().max_column_width(12);
        let grid = render_grid(&columns(&["c"]), &rows, &config);
        assert!(grid.contains(" abcdef ... "));
        assert!(!grid.contains("abcdefg"));
    }

    #[test]
    fn test_from_env_overrides() {
        env::set_var("MAX_COLUMN_WIDTH", "10");
        env::set_var("MAX_ROW_NUM", "3");
        let config = DisplayConfig::from_env();
        assert_eq!(config.max_column_width, 10);
        assert_eq!(config.max_rows, 3);

        env::set_var("MAX_ROW_NUM", "not a number");
        assert_eq!(DisplayConfig::from_env().max_rows, 8);

        env::remove_var("MAX_COLUMN_WIDTH");
        env::remove_var("MAX_ROW_NUM");
        let config = DisplayConfig::from_env();
        assert_eq!(config.max_column_width, 32);
        assert_eq!(config.max_rows, 8);
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let grid = render_grid(&columns(&["a"]), &[], &DisplayConfig::default());
        // sep, head, sep, sep
        assert_eq!(grid.lines().count(), 4);
    }
}
