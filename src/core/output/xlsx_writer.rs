//! Excel (XLSX) output writer.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{debug, warn};

use crate::Record;
use crate::config::RenderConfig;
use crate::core::shape::{BatchShape, classify, message_lines, row_values};
use crate::core::table::parse_table_lines;
use crate::error::Result;
use crate::record::MESSAGE_KEY;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Sheet1";

/// Most characters Excel stores in one cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes records to an Excel workbook.
///
/// See [`to_xlsx`] for the layout.
pub fn write_xlsx(
    records: &[Record],
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<()> {
    let bytes = to_xlsx(records, config)?;
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Renders records as a single-sheet workbook.
///
/// The first row is the header, written verbatim; no styling is applied.
/// A free-text batch whose lines form a pipe table becomes that table;
/// other free text is written as one `message` column. An empty batch
/// yields an empty sheet.
pub fn to_xlsx(records: &[Record], config: &RenderConfig) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    match classify(records) {
        BatchShape::Tabular { columns, .. } if columns.is_empty() => {
            debug!("empty batch; writing an empty sheet");
        }
        BatchShape::Tabular { columns, .. } => {
            write_rows(sheet, &columns, records.iter().map(|r| row_values(r, &columns)))?;
        }
        BatchShape::FreeText => {
            let lines = message_lines(records);
            if let Some(table) = parse_table_lines(lines.iter().copied(), config.table_syntax) {
                debug!(columns = table.columns.len(), "free text is a markdown table");
                let rows = table
                    .rows
                    .iter()
                    .map(|row| row.iter().map(String::as_str).collect::<Vec<_>>());
                write_rows(sheet, &table.columns, rows)?;
            } else {
                let columns = [MESSAGE_KEY.to_string()];
                let rows = records.iter().map(|r| vec![r.get_or_empty(MESSAGE_KEY)]);
                write_rows(sheet, &columns, rows)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_rows<'r, R>(sheet: &mut Worksheet, columns: &[String], rows: R) -> Result<()>
where
    R: IntoIterator<Item = Vec<&'r str>>,
{
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, fit_cell(name, 0, col))?;
    }
    let mut written = 0u32;
    for (row, cells) in (1u32..).zip(rows) {
        for (col, value) in cells.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, fit_cell(value, row, col))?;
            }
        }
        written += 1;
    }
    debug!(columns = columns.len(), rows = written, "wrote worksheet");
    Ok(())
}

/// Cuts `value` to [`MAX_CELL_CHARS`] characters.
fn fit_cell(value: &str, row: u32, col: usize) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                row,
                col,
                chars = value.chars().count(),
                limit = MAX_CELL_CHARS,
                "truncated cell to the excel length limit"
            );
            &value[..cut]
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_tabular_sheet() {
        let records = vec![
            Record::new().with("Name", "Sid").with("Age", "35"),
            Record::new().with("Name", "Stella").with("Age", "33"),
        ];
        let rows = read_back(to_xlsx(&records, &RenderConfig::new()).unwrap());
        assert_eq!(
            rows,
            vec![vec!["Name", "Age"], vec!["Sid", "35"], vec!["Stella", "33"]]
        );
    }

    #[test]
    fn test_free_text_message_column() {
        let records = vec![Record::message("hello"), Record::message("world")];
        let rows = read_back(to_xlsx(&records, &RenderConfig::new()).unwrap());
        assert_eq!(rows, vec![vec!["message"], vec!["hello"], vec!["world"]]);
    }

    #[test]
    fn test_free_text_markdown_table() {
        let records = vec![
            Record::message("| A | B |"),
            Record::message("|---|---|"),
            Record::message("| 1 | 2 |"),
            Record::message("| 3 | 4 |"),
        ];
        let rows = read_back(to_xlsx(&records, &RenderConfig::new()).unwrap());
        assert_eq!(rows, vec![vec!["A", "B"], vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_single_message_markdown_table() {
        let records = vec![Record::message("| A | B |\n| 1 | 2 |")];
        let rows = read_back(to_xlsx(&records, &RenderConfig::new()).unwrap());
        assert_eq!(rows, vec![vec!["A", "B"], vec!["1", "2"]]);
    }

    #[test]
    fn test_overlong_cell_is_truncated() {
        let long = "é".repeat(MAX_CELL_CHARS + 5000);
        let records = vec![Record::message(long.clone())];
        let rows = read_back(to_xlsx(&records, &RenderConfig::new()).unwrap());
        assert_eq!(rows[1][0].chars().count(), MAX_CELL_CHARS);
        assert!(long.starts_with(&rows[1][0]));

        let exact = "a".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell(&exact, 1, 0), exact);
    }

    #[test]
    fn test_empty_batch_empty_sheet() {
        let bytes = to_xlsx(&[], &RenderConfig::new()).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        assert!(workbook.worksheet_range(SHEET_NAME).unwrap().is_empty());
    }
}
