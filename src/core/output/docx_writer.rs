//! Word (DOCX) output writer.
//!
//! Writes a minimal WordprocessingML package: content types, package
//! relationships, `word/document.xml`, `word/styles.xml` (with the
//! `Table Grid` style) and the document relationships that carry hyperlink
//! targets.

use std::borrow::Cow;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::Record;
use crate::config::{RenderConfig, WordLayout};
use crate::core::layout::scale_to_width;
use crate::core::shape::{BatchShape, classify, message_lines, row_values};
use crate::core::styling::{LineKind, classify_line};
use crate::core::table::parse_markdown_table;
use crate::error::Result;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#;

/// Writes records to a Word document.
///
/// See [`to_docx`] for the layout.
pub fn write_docx(
    records: &[Record],
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<()> {
    let bytes = to_docx(records, config)?;
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Renders records as a Word document.
///
/// # Layout
/// - Empty batch: a single empty paragraph
/// - One free-text record holding a pipe table: that table
/// - Free text, plain mode: first line bold as a title, the rest body text
/// - Free text, styled mode: one classified paragraph per line, URLs as
///   hyperlinks
/// - Tabular: a `Table Grid` table with a bold header row and preferred
///   column widths scaled to the page
pub fn to_docx(records: &[Record], config: &RenderConfig) -> Result<Vec<u8>> {
    let layout = &config.word;
    let mut body = BodyWriter::new()?;

    match classify(records) {
        BatchShape::Tabular { columns, .. } if columns.is_empty() => {
            debug!("empty batch; writing a single empty paragraph");
            body.empty_paragraph()?;
        }
        BatchShape::Tabular { columns, .. } => {
            let rows = records.iter().map(|r| row_values(r, &columns));
            body.table(&columns, rows, layout)?;
        }
        BatchShape::FreeText => {
            let pasted_table = match records {
                [only] => only
                    .message_text()
                    .and_then(|text| parse_markdown_table(text, config.table_syntax)),
                _ => None,
            };
            if let Some(table) = pasted_table {
                debug!(columns = table.columns.len(), "single message is a markdown table");
                let rows = table
                    .rows
                    .iter()
                    .map(|row| row.iter().map(String::as_str).collect::<Vec<_>>());
                body.table(&table.columns, rows, layout)?;
            } else {
                body.free_text(&message_lines(records), config)?;
            }
        }
    }

    let (document, links) = body.finish()?;
    package(&document, &links)
}

/// A run of text inside a paragraph.
struct Run<'a> {
    text: &'a str,
    bold: bool,
    size: f64,
    link: bool,
}

/// Streams `word/document.xml` and collects hyperlink targets on the way.
struct BodyWriter {
    xml: Writer<Vec<u8>>,
    links: Vec<String>,
}

impl BodyWriter {
    fn new() -> Result<Self> {
        let mut xml = Writer::new(Vec::new());
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        xml.write_event(Event::Start(
            BytesStart::new("w:document").with_attributes([("xmlns:w", W_NS), ("xmlns:r", R_NS)]),
        ))?;
        xml.write_event(Event::Start(BytesStart::new("w:body")))?;
        Ok(Self {
            xml,
            links: Vec::new(),
        })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.xml.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty_paragraph(&mut self) -> Result<()> {
        self.empty("w:p", &[])
    }

    fn free_text(&mut self, lines: &[&str], config: &RenderConfig) -> Result<()> {
        let layout = &config.word;
        if lines.is_empty() {
            return self.empty_paragraph();
        }

        for (i, line) in lines.iter().enumerate() {
            if !config.is_styled() {
                let (bold, size) = if i == 0 {
                    (true, layout.title_font_size)
                } else {
                    (false, layout.body_font_size)
                };
                let run = Run {
                    text: line,
                    bold,
                    size,
                    link: false,
                };
                self.paragraph(&[run], layout.space_after)?;
                continue;
            }

            let styled = classify_line(line);
            let (size, space_after) = if styled.kind == LineKind::Heading {
                (layout.heading_font_size, layout.heading_space_after)
            } else {
                (layout.body_font_size, layout.space_after)
            };
            let runs: Vec<Run<'_>> = styled
                .spans
                .iter()
                .map(|span| Run {
                    text: &span.text,
                    bold: span.bold,
                    size,
                    link: span.link,
                })
                .collect();
            self.paragraph(&runs, space_after)?;
        }
        Ok(())
    }

    fn paragraph(&mut self, runs: &[Run<'_>], space_after: f64) -> Result<()> {
        self.start("w:p", &[])?;
        self.start("w:pPr", &[])?;
        let after = twips(space_after).to_string();
        self.empty("w:spacing", &[("w:after", after.as_str())])?;
        self.end("w:pPr")?;
        for run in runs {
            if run.link {
                self.links.push(run.text.to_string());
                let id = link_id(self.links.len());
                self.start("w:hyperlink", &[("r:id", id.as_str()), ("w:history", "1")])?;
                self.run(run)?;
                self.end("w:hyperlink")?;
            } else {
                self.run(run)?;
            }
        }
        self.end("w:p")
    }

    fn run(&mut self, run: &Run<'_>) -> Result<()> {
        let half_points = half_points(run.size).to_string();
        self.start("w:r", &[])?;
        self.start("w:rPr", &[])?;
        if run.bold {
            self.empty("w:b", &[])?;
        }
        if run.link {
            self.empty("w:color", &[("w:val", "0000FF")])?;
        }
        self.empty("w:sz", &[("w:val", half_points.as_str())])?;
        self.empty("w:szCs", &[("w:val", half_points.as_str())])?;
        if run.link {
            self.empty("w:u", &[("w:val", "single")])?;
        }
        self.end("w:rPr")?;
        self.text(run.text)?;
        self.end("w:r")
    }

    /// Writes `w:t` elements, turning newlines into `w:br`.
    fn text(&mut self, text: &str) -> Result<()> {
        let text = xml_safe(text);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.empty("w:br", &[])?;
            }
            self.start("w:t", &[("xml:space", "preserve")])?;
            self.xml.write_event(Event::Text(BytesText::new(line)))?;
            self.end("w:t")?;
        }
        Ok(())
    }

    fn table<'r, R>(&mut self, columns: &[String], rows: R, layout: &WordLayout) -> Result<()>
    where
        R: IntoIterator<Item = Vec<&'r str>>,
    {
        let preferred: Vec<f64> = columns.iter().map(|c| layout.preferred_width(c)).collect();
        let widths: Vec<String> = scale_to_width(&preferred, layout.usable_width)
            .into_iter()
            .map(|w| twips(w).to_string())
            .collect();
        let total = twips(layout.usable_width).to_string();
        debug!(columns = columns.len(), widths = ?widths, "laid out word table");

        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
        self.empty("w:tblW", &[("w:w", total.as_str()), ("w:type", "dxa")])?;
        self.end("w:tblPr")?;
        self.start("w:tblGrid", &[])?;
        for width in &widths {
            self.empty("w:gridCol", &[("w:w", width.as_str())])?;
        }
        self.end("w:tblGrid")?;

        let header: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.table_row(&header, &widths, true, layout)?;
        for row in rows {
            self.table_row(&row, &widths, false, layout)?;
        }
        self.end("w:tbl")?;
        // Word expects a paragraph between a table and the section properties.
        self.empty_paragraph()
    }

    fn table_row(
        &mut self,
        cells: &[&str],
        widths: &[String],
        bold: bool,
        layout: &WordLayout,
    ) -> Result<()> {
        self.start("w:tr", &[])?;
        for (cell, width) in cells.iter().zip(widths) {
            self.start("w:tc", &[])?;
            self.start("w:tcPr", &[])?;
            self.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
            self.end("w:tcPr")?;
            self.start("w:p", &[])?;
            let cell = cell.trim();
            if !cell.is_empty() {
                self.run(&Run {
                    text: cell,
                    bold,
                    size: layout.body_font_size,
                    link: false,
                })?;
            }
            self.end("w:p")?;
            self.end("w:tc")?;
        }
        self.end("w:tr")
    }

    fn finish(mut self) -> Result<(Vec<u8>, Vec<String>)> {
        self.start("w:sectPr", &[])?;
        self.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
        self.empty(
            "w:pgMar",
            &[
                ("w:top", "1440"),
                ("w:right", "1440"),
                ("w:bottom", "1440"),
                ("w:left", "1440"),
                ("w:header", "708"),
                ("w:footer", "708"),
                ("w:gutter", "0"),
            ],
        )?;
        self.end("w:sectPr")?;
        self.end("w:body")?;
        self.end("w:document")?;
        Ok((self.xml.into_inner(), self.links))
    }
}

fn link_id(index: usize) -> String {
    // rId1 is the styles part.
    format!("rId{}", index + 1)
}

fn twips(points: f64) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

fn half_points(points: f64) -> u32 {
    (points * 2.0).round().max(0.0) as u32
}

/// Drops characters XML 1.0 cannot carry.
fn xml_safe(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

fn document_rels(links: &[String]) -> Result<Vec<u8>> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    xml.write_event(Event::Start(BytesStart::new("Relationships").with_attributes([(
        "xmlns",
        "http://schemas.openxmlformats.org/package/2006/relationships",
    )])))?;
    xml.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
        ("Id", "rId1"),
        ("Type", STYLES_REL),
        ("Target", "styles.xml"),
    ])))?;
    for (i, target) in links.iter().enumerate() {
        let id = link_id(i + 1);
        xml.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", id.as_str()),
            ("Type", HYPERLINK_REL),
            ("Target", target.as_str()),
            ("TargetMode", "External"),
        ])))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(xml.into_inner())
}

fn package(document: &[u8], links: &[String]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, Cow<'_, [u8]>); 5] = [
        ("[Content_Types].xml", Cow::Borrowed(CONTENT_TYPES.as_bytes())),
        ("_rels/.rels", Cow::Borrowed(PACKAGE_RELS.as_bytes())),
        ("word/document.xml", Cow::Borrowed(document)),
        ("word/styles.xml", Cow::Borrowed(STYLES.as_bytes())),
        ("word/_rels/document.xml.rels", Cow::Owned(document_rels(links)?)),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn document(records: &[Record], config: &RenderConfig) -> String {
        part(&to_docx(records, config).unwrap(), "word/document.xml")
    }

    #[test]
    fn test_package_parts() {
        let bytes = to_docx(&[Record::message("hi")], &RenderConfig::new()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert!(part(&bytes, "word/styles.xml").contains("Table Grid"));
    }

    #[test]
    fn test_empty_batch_single_empty_paragraph() {
        let xml = document(&[], &RenderConfig::new());
        assert!(xml.contains("<w:body><w:p/><w:sectPr>"));
        assert!(!xml.contains("<w:tbl>"));
    }

    #[test]
    fn test_plain_mode_title_then_body() {
        let records = vec![Record::message("Title"), Record::message("Body text")];
        let xml = document(&records, &RenderConfig::new());
        let title = xml.find("Title").unwrap();
        let body = xml.find("Body text").unwrap();
        assert!(title < body);
        // Title run is bold at 18pt, body at 12pt.
        assert!(xml[..title].contains(r#"<w:b/><w:sz w:val="36"/>"#));
        assert!(xml[title..body].contains(r#"<w:sz w:val="24"/>"#));
        assert_eq!(xml.matches("<w:b/>").count(), 1);
    }

    #[test]
    fn test_tabular_table_with_widths() {
        let records = vec![
            Record::new()
                .with("First Name", "Steve")
                .with("Last Name", "Jobs")
                .with("Age", "56"),
        ];
        let xml = document(&records, &RenderConfig::new());
        assert!(xml.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert_eq!(xml.matches(r#"<w:gridCol w:w="3610"/>"#).count(), 2);
        assert!(xml.contains(r#"<w:gridCol w:w="1805"/>"#));
    }

    #[test]
    fn test_table_cells_are_trimmed() {
        let records = vec![
            Record::new().with(" Name ", "  Sid\n").with("Age", "   "),
        ];
        let xml = document(&records, &RenderConfig::new());
        assert!(xml.contains(r#"<w:t xml:space="preserve">Name</w:t>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">Sid</w:t>"#));
        assert!(!xml.contains("<w:br/>"));
        assert_eq!(xml.matches("<w:tc>").count(), 4);
    }

    #[test]
    fn test_single_message_markdown_table() {
        let records = vec![Record::message("| A | B |\n|---|---|\n| 1 | 2 |")];
        let xml = document(&records, &RenderConfig::new());
        assert!(xml.contains("<w:tbl>"));
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert!(!xml.contains("|"));
    }

    #[test]
    fn test_two_messages_are_not_table_detected() {
        let records = vec![Record::message("| A | B |"), Record::message("| 1 | 2 |")];
        let xml = document(&records, &RenderConfig::new());
        assert!(!xml.contains("<w:tbl>"));
    }

    #[test]
    fn test_styled_mode_hyperlink_relationship() {
        let records = vec![Record::message("Docs at https://example.com/a?b=1&c=2")];
        let bytes = to_docx(&records, &RenderConfig::styled()).unwrap();
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"<w:hyperlink r:id="rId2""#));
        assert!(xml.contains(r#"<w:u w:val="single"/>"#));
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="https://example.com/a?b=1&amp;c=2""#));
        assert!(rels.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_text_is_escaped_and_sanitized() {
        let records = vec![Record::message("a < b & \u{1}c")];
        let xml = document(&records, &RenderConfig::new());
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_twips_and_half_points() {
        assert_eq!(twips(100.0), 2000);
        assert_eq!(half_points(12.0), 24);
    }
}
