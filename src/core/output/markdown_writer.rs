//! Markdown output writer.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::Record;
use crate::config::RenderConfig;
use crate::core::shape::{BatchShape, classify, message_lines, message_texts, row_values};
use crate::core::table::parse_whole_table;
use crate::error::Result;

/// Writes records to a Markdown file.
///
/// See [`to_markdown`] for the layout.
pub fn write_markdown(
    records: &[Record],
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<()> {
    fs::write(output_path, to_markdown(records, config))?;
    Ok(())
}

/// Renders records as Markdown.
///
/// # Format
/// - Empty batch: empty string
/// - Free text: each non-blank message, trimmed, followed by a blank line.
///   If every line is a pipe-table line the normalized table is emitted instead.
/// - Tabular: `| col | ... |` header, `| --- | ... |` separator, one row per record
///   with missing fields left empty
pub fn to_markdown(records: &[Record], config: &RenderConfig) -> String {
    let mut out = String::new();

    match classify(records) {
        BatchShape::FreeText => {
            let lines = message_lines(records);
            if let Some(table) = parse_whole_table(lines.iter().copied(), config.table_syntax) {
                debug!("free text is a markdown table; normalizing");
                write_pipe_table(&mut out, &table.columns, &table.rows);
            } else {
                for text in message_texts(records) {
                    out.push_str(text);
                    out.push_str("\n\n");
                }
            }
        }
        BatchShape::Tabular { columns, .. } if !columns.is_empty() => {
            let rows = records.iter().map(|r| row_values(r, &columns));
            write_pipe_table(&mut out, &columns, rows);
        }
        BatchShape::Tabular { .. } => {}
    }

    out
}

/// Appends a pipe table: header, `---` separator, then one line per row.
pub(crate) fn write_pipe_table<H, R, C>(out: &mut String, header: &[H], rows: R)
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    push_row(out, header.iter().map(AsRef::as_ref));
    push_row(out, header.iter().map(|_| "---"));
    for row in rows {
        let cells: Vec<C> = row.into_iter().collect();
        push_row(out, cells.iter().map(AsRef::as_ref));
    }
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    out.push_str("| ");
    out.push_str(&cells.collect::<Vec<_>>().join(" | "));
    out.push_str(" |\n");
}
