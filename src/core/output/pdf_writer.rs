//! PDF output writer.
//!
//! Pages are A4 by default and drawn with the two standard Helvetica faces in
//! WinAnsi encoding, so no font program is embedded. Text outside that
//! encoding is reported as a font/character error.

use std::fs;
use std::ops::Range;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::debug;

use crate::Record;
use crate::config::{PdfLayout, RenderConfig};
use crate::core::layout::{FontFace, balance_column_widths, text_width, wrap_text};
use crate::core::shape::{BatchShape, classify, message_texts, row_values};
use crate::core::styling::{LineKind, Span, classify_line};
use crate::error::{ChatdocError, PdfErrorKind, Result};

const PLACEHOLDER: &str = "(No content provided)";

/// Writes records to a PDF file.
///
/// See [`to_pdf`] for the layout.
pub fn write_pdf(
    records: &[Record],
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<()> {
    let bytes = to_pdf(records, config)?;
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Renders records as a PDF document.
///
/// # Layout
/// - Empty batch: a single `(No content provided)` line
/// - Free text: one wrapped paragraph per non-blank message; in styled mode
///   every line is drawn as a heading, bold lead-in, hyperlink or plain line
/// - Tabular: bordered grid with balanced column widths, bold centered header
///   (repeated on continuation pages) and wrapped cells
///
/// # Errors
/// Returns [`ChatdocError::Pdf`] when text cannot be encoded for the built-in
/// font or the document cannot be serialized.
pub fn to_pdf(records: &[Record], config: &RenderConfig) -> Result<Vec<u8>> {
    let layout = &config.pdf;
    check_layout(layout)?;
    let mut pages = PageWriter::new(layout);

    match classify(records) {
        BatchShape::Tabular { columns, .. } if columns.is_empty() => {
            debug!("empty batch; drawing placeholder");
            pages.paragraph(PLACEHOLDER, FontFace::Regular, layout.font_size)?;
        }
        BatchShape::FreeText if config.is_styled() => {
            for text in message_texts(records) {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    pages.styled_line(line)?;
                }
            }
        }
        BatchShape::FreeText => {
            for text in message_texts(records) {
                pages.paragraph(text, FontFace::Regular, layout.font_size)?;
            }
        }
        BatchShape::Tabular { columns, .. } => {
            let rows: Vec<Vec<&str>> = records.iter().map(|r| row_values(r, &columns)).collect();
            pages.table(&columns, &rows)?;
        }
    }

    let page_streams = pages.finish();
    debug!(pages = page_streams.len(), "laid out pdf pages");
    assemble(page_streams, layout)
}

/// Rejects page geometry that leaves no room to draw.
fn check_layout(layout: &PdfLayout) -> Result<()> {
    let usable_height = layout.page_height - 2.0 * layout.margin;
    if !is_positive(layout.usable_width()) || !is_positive(usable_height) {
        return Err(layout_error(format!(
            "margin {} leaves no drawable area on a {} x {} page",
            layout.margin, layout.page_width, layout.page_height
        )));
    }
    if !is_positive(layout.font_size) || !is_positive(layout.line_height_factor) {
        return Err(layout_error(format!(
            "text size {} with line height factor {} cannot be drawn",
            layout.font_size, layout.line_height_factor
        )));
    }
    Ok(())
}

fn layout_error(message: String) -> ChatdocError {
    ChatdocError::Pdf {
        kind: PdfErrorKind::Generic,
        message,
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// A run of text placed on a line.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    text: String,
    face: FontFace,
    link: bool,
    x: f64,
    width: f64,
}

/// Accumulates drawing operations and breaks pages when the cursor reaches
/// the bottom margin.
struct PageWriter<'a> {
    layout: &'a PdfLayout,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Top of the next line, in PDF user space (origin bottom-left).
    cursor: f64,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a PdfLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: layout.page_height - layout.margin,
        }
    }

    fn top(&self) -> f64 {
        self.layout.page_height - self.layout.margin
    }

    fn line_height(&self, size: f64) -> f64 {
        size * self.layout.line_height_factor
    }

    /// Starts a new page if `height` does not fit below the cursor.
    ///
    /// Returns `true` when a page break happened.
    fn ensure_space(&mut self, height: f64) -> bool {
        let at_top = (self.cursor - self.top()).abs() < f64::EPSILON;
        if at_top || self.cursor - height >= self.layout.margin {
            return false;
        }
        self.new_page();
        true
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.cursor = self.top();
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.ops);
        self.pages
    }

    fn paragraph(&mut self, text: &str, face: FontFace, size: f64) -> Result<()> {
        let width = self.layout.usable_width();
        let line_height = self.line_height(size);
        for line in wrap_text(text, face, size, width) {
            self.ensure_space(line_height);
            let baseline = self.cursor - size;
            self.text(self.layout.margin, baseline, face, size, &line)?;
            self.cursor -= line_height;
        }
        self.cursor -= self.layout.paragraph_gap;
        Ok(())
    }

    fn styled_line(&mut self, line: &str) -> Result<()> {
        let styled = classify_line(line);
        if styled.kind == LineKind::Heading {
            let size = self.layout.heading_font_size;
            self.paragraph(&styled.text(), FontFace::Bold, size)?;
            self.cursor -= self.layout.heading_gap;
            return Ok(());
        }

        let size = self.layout.font_size;
        let line_height = self.line_height(size);
        for fragments in layout_spans(&styled.spans, size, self.layout.usable_width()) {
            self.ensure_space(line_height);
            let baseline = self.cursor - size;
            for fragment in &fragments {
                let x = self.layout.margin + fragment.x;
                if fragment.link {
                    self.link_text(x, baseline, size, fragment)?;
                } else {
                    self.text(x, baseline, fragment.face, size, &fragment.text)?;
                }
            }
            self.cursor -= line_height;
        }
        self.cursor -= self.layout.paragraph_gap;
        Ok(())
    }

    fn table(&mut self, columns: &[String], rows: &[Vec<&str>]) -> Result<()> {
        let longest: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let widths = balance_column_widths(
            &longest,
            self.layout.usable_width(),
            self.layout.char_width_factor,
        );
        debug!(columns = columns.len(), rows = rows.len(), widths = ?widths, "balanced table columns");

        let header: Vec<&str> = columns.iter().map(String::as_str).collect();
        let header = self.wrap_cells(&header, &widths, FontFace::Bold);
        self.ensure_space(self.chunk_height(line_count(&header)));
        self.draw_row(&header, 0..line_count(&header), &widths, FontFace::Bold, true)?;

        for row in rows {
            let cells = self.wrap_cells(row, &widths, FontFace::Regular);
            self.body_row(&cells, &header, &widths)?;
        }
        Ok(())
    }

    fn wrap_cells(&self, cells: &[&str], widths: &[f64], face: FontFace) -> Vec<Vec<String>> {
        let size = self.layout.font_size;
        let padding = self.layout.cell_padding;
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| wrap_text(cell, face, size, (width - 2.0 * padding).max(size)))
            .collect()
    }

    /// Height of a bordered row showing `lines` lines of text.
    fn chunk_height(&self, lines: usize) -> f64 {
        lines.max(1) as f64 * self.line_height(self.layout.font_size)
            + 2.0 * self.layout.cell_padding
    }

    /// How many text lines of a row fit between the cursor and the bottom margin.
    fn lines_fitting(&self, cursor: f64) -> usize {
        let available = cursor - self.layout.margin - 2.0 * self.layout.cell_padding;
        let lines = (available / self.line_height(self.layout.font_size)).floor();
        if lines.is_nan() || lines < 0.0 { 0 } else { lines as usize }
    }

    /// Draws a data row, moving it to the next page when it fits there whole
    /// and splitting it line by line when it is taller than a page.
    fn body_row(
        &mut self,
        cells: &[Vec<String>],
        header: &[Vec<String>],
        widths: &[f64],
    ) -> Result<()> {
        let total = line_count(cells);
        let per_page = self.lines_fitting(self.top() - self.chunk_height(line_count(header)));
        let mut start = 0;
        let mut fresh_page = false;

        while start < total {
            let remaining = total - start;
            let fit = self.lines_fitting(self.cursor);
            if remaining <= fit {
                return self.draw_row(cells, start..total, widths, FontFace::Regular, false);
            }
            let moves_whole = start == 0 && remaining <= per_page;
            if !moves_whole && (fit > 0 || fresh_page) {
                let take = fit.max(1);
                self.draw_row(cells, start..start + take, widths, FontFace::Regular, false)?;
                start += take;
            }
            self.new_page();
            self.draw_row(header, 0..line_count(header), widths, FontFace::Bold, true)?;
            fresh_page = true;
        }
        Ok(())
    }

    /// Draws lines `range` of every cell as one bordered row.
    fn draw_row(
        &mut self,
        cells: &[Vec<String>],
        range: Range<usize>,
        widths: &[f64],
        face: FontFace,
        centered: bool,
    ) -> Result<()> {
        let size = self.layout.font_size;
        let padding = self.layout.cell_padding;
        let line_height = self.line_height(size);
        let height = self.chunk_height(range.len());

        let mut x = self.layout.margin;
        for (lines, &width) in cells.iter().zip(widths) {
            self.rect(x, self.cursor - height, width, height);
            let shown = lines
                .get(range.start..range.end.min(lines.len()))
                .unwrap_or_default();
            for (i, line) in shown.iter().enumerate() {
                let baseline = self.cursor - padding - i as f64 * line_height - size;
                let text_x = if centered {
                    let free = width - text_width(line, face, size);
                    x + (free / 2.0).max(padding)
                } else {
                    x + padding
                };
                self.text(text_x, baseline, face, size, line)?;
            }
            x += width;
        }
        self.cursor -= height;
        Ok(())
    }

    fn text(&mut self, x: f64, baseline: f64, face: FontFace, size: f64, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let encoded = encode_win_ansi(text)?;
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font_name(face).into(), real(size)]),
            Operation::new("Td", vec![real(x), real(baseline)]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn link_text(&mut self, x: f64, baseline: f64, size: f64, fragment: &Fragment) -> Result<()> {
        self.ops.push(Operation::new("rg", vec![real(0.0), real(0.0), real(1.0)]));
        self.text(x, baseline, FontFace::Regular, size, &fragment.text)?;
        self.ops.push(Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]));

        let y = baseline - size * 0.15;
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![real(0.0), real(0.0), real(1.0)]),
            Operation::new("w", vec![real(0.5)]),
            Operation::new("m", vec![real(x), real(y)]),
            Operation::new("l", vec![real(x + fragment.width), real(y)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.extend([
            Operation::new("w", vec![real(0.5)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("S", vec![]),
        ]);
    }
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(0).max(1)
}

fn font_name(face: FontFace) -> &'static str {
    match face {
        FontFace::Regular => "F1",
        FontFace::Bold => "F2",
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Splits styled spans into positioned fragments, one `Vec` per output line.
///
/// Words never split across spans: text glued to a URL (a trailing comma, an
/// opening parenthesis) stays on the URL's line.
fn layout_spans(spans: &[Span], size: f64, max_width: f64) -> Vec<Vec<Fragment>> {
    // A word is a run of non-whitespace pieces, each carrying its span style.
    let mut words: Vec<Vec<(String, FontFace, bool)>> = vec![Vec::new()];
    for span in spans {
        let face = if span.bold { FontFace::Bold } else { FontFace::Regular };
        for c in span.text.chars() {
            if c.is_whitespace() {
                if words.last().is_some_and(|w| !w.is_empty()) {
                    words.push(Vec::new());
                }
                continue;
            }
            let Some(word) = words.last_mut() else {
                continue;
            };
            match word.last_mut() {
                Some((text, f, link)) if *f == face && *link == span.link => text.push(c),
                _ => word.push((c.to_string(), face, span.link)),
            }
        }
    }
    words.retain(|w| !w.is_empty());

    let space = text_width(" ", FontFace::Regular, size);
    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    let mut line: Vec<Fragment> = Vec::new();
    let mut x = 0.0;

    for word in words {
        let pieces = split_oversized(word, size, max_width);
        for piece in pieces {
            let width: f64 = piece.iter().map(|(t, f, _)| text_width(t, *f, size)).sum();
            if !line.is_empty() && x + space + width > max_width {
                lines.push(std::mem::take(&mut line));
                x = 0.0;
            }
            let mut first = true;
            for (text, face, link) in piece {
                let gap = if first && !line.is_empty() { space } else { 0.0 };
                first = false;
                let w = text_width(&text, face, size);
                match line.last_mut() {
                    Some(prev) if prev.face == face && prev.link == link && !link => {
                        if gap > 0.0 {
                            prev.text.push(' ');
                        }
                        prev.text.push_str(&text);
                        prev.width += gap + w;
                    }
                    _ => line.push(Fragment {
                        text,
                        face,
                        link,
                        x: x + gap,
                        width: w,
                    }),
                }
                x += gap + w;
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Breaks a single-style word that is wider than a whole line.
fn split_oversized(
    word: Vec<(String, FontFace, bool)>,
    size: f64,
    max_width: f64,
) -> Vec<Vec<(String, FontFace, bool)>> {
    match word.as_slice() {
        [(text, face, link)] if text_width(text, *face, size) > max_width => {
            wrap_text(text, *face, size, max_width)
                .into_iter()
                .map(|piece| vec![(piece, *face, *link)])
                .collect()
        }
        _ => vec![word],
    }
}

/// Encodes text for a WinAnsi (Windows-1252) font.
fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| match c {
            '\t' | '\r' => Ok(b' '),
            ' '..='~' | '\u{A0}'..='\u{FF}' => Ok(u32::from(c) as u8),
            '€' => Ok(0x80),
            '‚' => Ok(0x82),
            '„' => Ok(0x84),
            '…' => Ok(0x85),
            '‘' => Ok(0x91),
            '’' => Ok(0x92),
            '“' => Ok(0x93),
            '”' => Ok(0x94),
            '•' => Ok(0x95),
            '–' => Ok(0x96),
            '—' => Ok(0x97),
            '™' => Ok(0x99),
            other => Err(ChatdocError::unsupported_character(other)),
        })
        .collect()
}

/// Builds the document: shared fonts, one content stream per page.
fn assemble(page_streams: Vec<Vec<Operation>>, layout: &PdfLayout) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_streams.len());
    for operations in page_streams {
        let content = Content { operations }
            .encode()
            .map_err(|e| ChatdocError::pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(layout.page_width), real(layout.page_height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if layout.compress {
        doc.compress();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ChatdocError::pdf(e.to_string()))?;
    Ok(bytes)
}
