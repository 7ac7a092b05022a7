//! Pipe-table detection and parsing.
//!
//! Free text that looks like a Markdown table (`| a | b |` rows, optionally
//! followed by a `|---|---|` separator) is turned into a [`ParsedTable`] so
//! the Word, Excel and Markdown renderers can emit real tables.
//!
//! # Rules
//!
//! 1. Blank lines are ignored; remaining lines are trimmed.
//! 2. Only lines starting with `|` qualify ([`TableSyntax::Strict`] also
//!    requires a trailing `|`).
//! 3. Fewer than two qualifying lines means no table.
//! 4. The first qualifying line is the header.
//! 5. A second line made only of `-` and `:` (ignoring pipes and whitespace)
//!    is the separator and is skipped; otherwise it is already data.
//! 6. Data rows whose cell count differs from the header are dropped.
//!
//! # Example
//!
//! ```
//! use chatdoc::core::table::{TableSyntax, parse_markdown_table};
//!
//! let table = parse_markdown_table("| A | B |\n|---|---|\n| 1 | 2 |", TableSyntax::Lenient)
//!     .expect("table");
//! assert_eq!(table.columns, vec!["A", "B"]);
//! assert_eq!(table.rows, vec![vec!["1", "2"]]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::record::Record;

/// Which lines count as table lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSyntax {
    /// Lines must start with `|`.
    #[default]
    Lenient,
    /// Lines must start and end with `|`.
    Strict,
}

impl TableSyntax {
    /// Returns `true` if a trimmed line qualifies as a table line.
    pub fn is_table_line(self, line: &str) -> bool {
        match self {
            TableSyntax::Lenient => line.starts_with('|'),
            TableSyntax::Strict => line.len() > 1 && line.starts_with('|') && line.ends_with('|'),
        }
    }
}

/// Header and rows extracted from pipe-delimited text.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedTable {
    /// Header cells, trimmed.
    pub columns: Vec<String>,
    /// Data rows, trimmed.
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Converts the table into records keyed by the header.
    ///
    /// Duplicate header names collapse into one column (last value wins).
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// Renders the table with the same pipe syntax the Markdown writer uses.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        crate::core::output::write_pipe_table(&mut out, &self.columns, &self.rows);
        out
    }
}

/// Parses `text` as a pipe table. Returns `None` when no table is detected.
pub fn parse_markdown_table(text: &str, syntax: TableSyntax) -> Option<ParsedTable> {
    parse_table_lines(text.lines(), syntax)
}

/// Parses already-split lines (one per free-text record, for instance).
pub fn parse_table_lines<'a, I>(lines: I, syntax: TableSyntax) -> Option<ParsedTable>
where
    I: IntoIterator<Item = &'a str>,
{
    let table_lines: Vec<&str> = lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| syntax.is_table_line(line))
        .collect();

    if table_lines.len() < 2 {
        debug!(lines = table_lines.len(), "no markdown table detected");
        return None;
    }

    let columns = split_cells(table_lines[0]);
    let data_start = if is_separator_row(table_lines[1]) { 2 } else { 1 };

    let mut rows = Vec::with_capacity(table_lines.len() - data_start);
    let mut dropped = 0usize;
    for line in &table_lines[data_start..] {
        let cells = split_cells(line);
        if cells.len() == columns.len() {
            rows.push(cells);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!(
            dropped,
            expected_cells = columns.len(),
            "dropped table rows with a mismatched cell count"
        );
    }
    debug!(columns = columns.len(), rows = rows.len(), "parsed markdown table");

    Some(ParsedTable { columns, rows })
}

/// Parses `lines` as a table only when every non-blank line is a table line.
///
/// Used where prose around a table must not be discarded.
pub fn parse_whole_table<'a, I>(lines: I, syntax: TableSyntax) -> Option<ParsedTable>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let lines = lines.into_iter();
    let all_table = lines
        .clone()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| syntax.is_table_line(line));
    if all_table {
        parse_table_lines(lines, syntax)
    } else {
        None
    }
}

/// Splits a table line into trimmed cells, dropping the empty edge cells
/// produced by the leading and trailing pipe.
fn split_cells(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator_row(line: &str) -> bool {
    let mut rest = line
        .chars()
        .filter(|c| *c != '|' && !c.is_whitespace())
        .peekable();
    rest.peek().is_some() && rest.all(|c| c == '-' || c == ':')
}
