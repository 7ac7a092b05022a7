//! Configuration types for rendering.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`RenderConfig`] - Top-level options shared by every renderer
//! - [`PdfLayout`] - Page geometry and font sizes for PDF output
//! - [`WordLayout`] - Column widths and font sizes for Word output
//!
//! # Example
//!
//! ```rust
//! use chatdoc::config::{RenderConfig, TextStyle};
//! use chatdoc::core::table::TableSyntax;
//!
//! let config = RenderConfig::new()
//!     .with_text_style(TextStyle::Styled)
//!     .with_table_syntax(TableSyntax::Strict);
//!
//! assert!(config.is_styled());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::table::TableSyntax;

/// How free text is rendered by the PDF and Word writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    /// Paragraphs as-is (Word: first line as a title).
    #[default]
    Plain,
    /// Each line classified as heading, bold lead-in, hyperlink or plain.
    Styled,
}

/// Options shared by all renderers.
///
/// # Example
///
/// ```rust
/// use chatdoc::config::RenderConfig;
///
/// let config = RenderConfig::default();
/// assert_eq!(config.pdf.font_size, 10.0);
/// assert_eq!(config.word.default_column_width, 90.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Free-text rendering mode (default: plain)
    pub text_style: TextStyle,

    /// Which lines count as markdown table lines (default: lenient)
    pub table_syntax: TableSyntax,

    /// PDF page geometry
    pub pdf: PdfLayout,

    /// Word table widths and font sizes
    pub word: WordLayout,
}

impl RenderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration using the styled text mode.
    pub fn styled() -> Self {
        Self::default().with_text_style(TextStyle::Styled)
    }

    /// Sets the free-text rendering mode.
    #[must_use]
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Sets the markdown table strictness.
    #[must_use]
    pub fn with_table_syntax(mut self, syntax: TableSyntax) -> Self {
        self.table_syntax = syntax;
        self
    }

    /// Replaces the PDF layout.
    #[must_use]
    pub fn with_pdf_layout(mut self, layout: PdfLayout) -> Self {
        self.pdf = layout;
        self
    }

    /// Replaces the Word layout.
    #[must_use]
    pub fn with_word_layout(mut self, layout: WordLayout) -> Self {
        self.word = layout;
        self
    }

    /// Returns `true` when the styled text mode is active.
    pub fn is_styled(&self) -> bool {
        self.text_style == TextStyle::Styled
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    #[cfg(feature = "json-input")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Page geometry for PDF output. All lengths are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    /// Page width (default: A4, 595.28)
    pub page_width: f64,

    /// Page height (default: A4, 841.89)
    pub page_height: f64,

    /// Margin on every side (default: 10 mm)
    pub margin: f64,

    /// Body and table font size (default: 10)
    pub font_size: f64,

    /// Heading font size in styled mode (default: 14)
    pub heading_font_size: f64,

    /// Line height as a multiple of the font size (default: 1.4)
    pub line_height_factor: f64,

    /// Vertical gap between paragraphs (default: 2 mm)
    pub paragraph_gap: f64,

    /// Extra gap after headings (default: 4 mm)
    pub heading_gap: f64,

    /// Inner padding of table cells (default: 3)
    pub cell_padding: f64,

    /// Width granted per character when balancing columns (default: 2.5 mm)
    pub char_width_factor: f64,

    /// Compress page content streams (default: true)
    pub compress: bool,
}

const MM: f64 = 72.0 / 25.4;

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 10.0 * MM,
            font_size: 10.0,
            heading_font_size: 14.0,
            line_height_factor: 1.4,
            paragraph_gap: 2.0 * MM,
            heading_gap: 4.0 * MM,
            cell_padding: 3.0,
            char_width_factor: 2.5 * MM,
            compress: true,
        }
    }
}

impl PdfLayout {
    /// Creates a new layout with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Width between the left and right margins.
    pub fn usable_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Enables or disables content stream compression.
    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Sets the body font size.
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }
}

/// Table and font settings for Word output. Lengths are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLayout {
    /// Preferred widths for known column labels
    pub column_widths: BTreeMap<String, f64>,

    /// Width of any other column (default: 90)
    pub default_column_width: f64,

    /// Width available to a table (default: A4 with 1 inch margins)
    pub usable_width: f64,

    /// Title line size in plain mode (default: 18)
    pub title_font_size: f64,

    /// Body text size (default: 12)
    pub body_font_size: f64,

    /// Heading size in styled mode (default: 14)
    pub heading_font_size: f64,

    /// Space after each paragraph (default: 6)
    pub space_after: f64,

    /// Space after headings in styled mode (default: 12)
    pub heading_space_after: f64,
}

impl Default for WordLayout {
    fn default() -> Self {
        let column_widths = [("First Name", 100.0), ("Last Name", 100.0), ("Age", 50.0)]
            .into_iter()
            .map(|(label, width)| (label.to_string(), width))
            .collect();
        Self {
            column_widths,
            default_column_width: 90.0,
            usable_width: 595.3 - 2.0 * 72.0,
            title_font_size: 18.0,
            body_font_size: 12.0,
            heading_font_size: 14.0,
            space_after: 6.0,
            heading_space_after: 12.0,
        }
    }
}

impl WordLayout {
    /// Creates a new layout with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred width for a column label.
    #[must_use]
    pub fn with_column_width(mut self, label: impl Into<String>, width: f64) -> Self {
        self.column_widths.insert(label.into(), width);
        self
    }

    /// Preferred width of a column, falling back to the default width.
    pub fn preferred_width(&self, label: &str) -> f64 {
        self.column_widths
            .get(label.trim())
            .copied()
            .unwrap_or(self.default_column_width)
    }
}
