//! Integration tests: input text through ingestion, classification and export.

use chatdoc::format::{FILENAME_PREFIX, generated_filename};
use chatdoc::prelude::*;
use chrono::NaiveDate;
use std::fs;
use std::io::{Cursor, Read};
use tempfile::tempdir;

const ROSTER_CSV: &str = "Name,Age,City\nSid,35,Oslo\nAna,29,Lima\n";

const STATUS_NOTES: &str = "PROJECT STATUS
Owner: Sid. Review on Friday.
Docs live at https://example.com/status.
Plain closing line";

const PASTED_TABLE: &str = "| Name | Age |
|------|-----|
| Sid  | 35  |
| Ana  | 29  |";

fn docx_document(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

fn xlsx_cells(bytes: Vec<u8>) -> Vec<Vec<String>> {
    use calamine::{Reader, Xlsx, open_workbook_from_rs};

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

// ============================================================================
// CSV upload
// ============================================================================

#[test]
fn test_csv_roster_to_markdown() {
    let records = records_from_csv(ROSTER_CSV).unwrap();
    assert!(!classify(&records).is_free_text());

    let markdown = to_markdown(&records, &RenderConfig::new());
    assert_eq!(
        markdown,
        "| Name | Age | City |\n| --- | --- | --- |\n| Sid | 35 | Oslo |\n| Ana | 29 | Lima |\n"
    );
}

#[test]
fn test_csv_roster_to_excel() {
    let records = records_from_csv(ROSTER_CSV).unwrap();
    let bytes = to_xlsx(&records, &RenderConfig::new()).unwrap();

    let cells = xlsx_cells(bytes);
    assert_eq!(cells[0], vec!["Name", "Age", "City"]);
    assert_eq!(cells[1], vec!["Sid", "35", "Oslo"]);
    assert_eq!(cells[2], vec!["Ana", "29", "Lima"]);
}

#[test]
fn test_csv_roster_to_word_table() {
    let records = records_from_csv(ROSTER_CSV).unwrap();
    let xml = docx_document(&to_docx(&records, &RenderConfig::new()).unwrap());

    assert!(xml.contains("<w:tblStyle w:val=\"TableGrid\"/>"));
    assert_eq!(xml.matches("<w:tr>").count(), 3);
    assert!(xml.contains(">Oslo<"));
}

// ============================================================================
// Free-text messages
// ============================================================================

#[test]
fn test_lines_to_markdown_paragraphs() {
    let records = records_from_lines(STATUS_NOTES).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(classify(&records), BatchShape::FreeText);

    let markdown = to_markdown(&records, &RenderConfig::new());
    assert!(markdown.starts_with("PROJECT STATUS\n\n"));
    assert!(markdown.ends_with("Plain closing line\n\n"));
}

#[test]
fn test_styled_notes_to_word() {
    let records = records_from_lines(STATUS_NOTES).unwrap();
    let xml = docx_document(&to_docx(&records, &RenderConfig::styled()).unwrap());

    assert!(xml.contains("PROJECT STATUS"));
    assert!(xml.contains("<w:b/>"));
    assert!(xml.contains("<w:hyperlink"));
}

#[test]
fn test_notes_to_pdf_is_valid() {
    let records = records_from_lines(STATUS_NOTES).unwrap();
    let bytes = to_pdf(&records, &RenderConfig::styled()).unwrap();

    assert!(bytes.starts_with(b"%PDF-1.5"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

// ============================================================================
// Pasted Markdown table
// ============================================================================

#[test]
fn test_pasted_table_everywhere() {
    let records = records_from_text_block(PASTED_TABLE).unwrap();
    assert_eq!(records.len(), 1);

    let config = RenderConfig::new();

    let markdown = to_markdown(&records, &config);
    assert_eq!(markdown, "| Name | Age |\n| --- | --- |\n| Sid | 35 |\n| Ana | 29 |\n");

    let xml = docx_document(&to_docx(&records, &config).unwrap());
    assert_eq!(xml.matches("<w:tr>").count(), 3);

    let cells = xlsx_cells(to_xlsx(&records, &config).unwrap());
    assert_eq!(cells, vec![vec!["Name", "Age"], vec!["Sid", "35"], vec!["Ana", "29"]]);
}

#[test]
fn test_pasted_table_lines_to_excel() {
    // One record per line still yields a table in Excel.
    let records = records_from_lines(PASTED_TABLE).unwrap();
    assert_eq!(records.len(), 4);

    let cells = xlsx_cells(to_xlsx(&records, &RenderConfig::new()).unwrap());
    assert_eq!(cells[0], vec!["Name", "Age"]);
    assert_eq!(cells.len(), 3);
}

// ============================================================================
// JSON rows
// ============================================================================

#[test]
fn test_json_rows_keep_column_order() {
    let records =
        records_from_json(r#"[{"Zeta": "1", "Alpha": 2}, {"Zeta": "3", "Alpha": null}]"#).unwrap();

    let markdown = to_markdown(&records, &RenderConfig::new());
    assert_eq!(
        markdown,
        "| Zeta | Alpha |\n| --- | --- |\n| 1 | 2 |\n| 3 |  |\n"
    );
}

// ============================================================================
// Export and session
// ============================================================================

#[test]
fn test_export_to_dir_every_format() {
    let dir = tempdir().unwrap();
    let records = records_from_csv(ROSTER_CSV).unwrap();

    for &format in DocumentFormat::all() {
        let exported = export_to_dir(&records, format, dir.path(), &RenderConfig::new()).unwrap();

        assert!(exported.filename.starts_with(FILENAME_PREFIX));
        assert!(exported.filename.ends_with(&format!(".{}", format.extension())));
        assert_eq!(exported.mime_type, format.mime_type());
        assert_eq!(exported.path, dir.path().join(&exported.filename));
        assert!(fs::metadata(&exported.path).unwrap().len() > 0);
    }
}

#[test]
fn test_write_to_format_matches_render() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.md");
    let records = records_from_csv(ROSTER_CSV).unwrap();
    let config = RenderConfig::new();

    write_to_format(&records, &path, DocumentFormat::Markdown, &config).unwrap();
    let rendered = render_to_format(&records, DocumentFormat::Markdown, &config).unwrap();

    assert_eq!(fs::read(&path).unwrap(), rendered);
}

#[test]
fn test_generated_filename_layout() {
    let at = NaiveDate::from_ymd_opt(2025, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 1)
        .unwrap();
    assert_eq!(
        generated_filename(DocumentFormat::Excel, at),
        "chat_document_20251231_235901.xlsx"
    );
}

#[test]
fn test_session_workflow() {
    let dir = tempdir().unwrap();
    let mut session = ChatSession::new();
    session.push_message("First note");
    session.push_message("Second note");

    let exported = session
        .export(DocumentFormat::Markdown, dir.path(), &RenderConfig::new())
        .unwrap();
    assert_eq!(
        fs::read_to_string(&exported.path).unwrap(),
        "First note\n\nSecond note\n\n"
    );

    // An upload replaces the history.
    session.replace_rows(records_from_csv(ROSTER_CSV).unwrap());
    assert_eq!(session.len(), 2);
    let exported = session
        .export(DocumentFormat::Excel, dir.path(), &RenderConfig::new())
        .unwrap();
    assert_eq!(
        exported.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn test_legacy_user_rows_render_as_messages() {
    let mut records = records_from_csv("user\nhello\nworld\n").unwrap();
    assert!(normalize_legacy_keys(&mut records));
    assert_eq!(classify(&records), BatchShape::FreeText);
    assert_eq!(to_markdown(&records, &RenderConfig::new()), "hello\n\nworld\n\n");
}
