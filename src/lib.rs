//! # Chatdoc
//!
//! A Rust library for turning chat-style messages and tabular rows into
//! shareable documents.
//!
//! ## Overview
//!
//! Chatdoc renders one batch of [`Record`]s into any of four formats:
//! - **Markdown** - paragraphs or a pipe table
//! - **PDF** - wrapped paragraphs or a bordered grid with balanced columns
//! - **Word** - paragraphs, styled runs and hyperlinks, or a `Table Grid` table
//! - **Excel** - a single flat sheet
//!
//! Before rendering, each batch is classified as free text (every record has
//! the single key `message`) or tabular (named columns taken from the first
//! record). Free text that is really a pasted Markdown table is detected and
//! rendered as a table where the format supports it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatdoc::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let records = records_from_lines("PROJECT STATUS\nOwner: Sid. Review on Friday.")?;
//!     let config = RenderConfig::styled();
//!
//!     // Render in memory
//!     let markdown = to_markdown(&records, &config);
//!
//!     // Or write chat_document_<timestamp>.<ext> into a directory
//!     let exported = export_to_dir(&records, DocumentFormat::Markdown, "exports", &config)?;
//!     println!("{} -> {}", exported.path.display(), exported.mime_type);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`record`] - [`Record`], the ordered column/value map
//! - [`core`] - Classification and rendering
//!   - [`core::shape`] - free text vs tabular ([`classify`](core::shape::classify))
//!   - [`core::table`] - pipe-table detection ([`parse_markdown_table`](core::table::parse_markdown_table))
//!   - [`core::styling`] - heading / bold lead-in / hyperlink line classes
//!   - [`core::layout`] - text metrics, wrapping and column widths
//!   - [`core::output`] - one writer per format
//! - [`format`] - [`DocumentFormat`](format::DocumentFormat), MIME types, generated file names
//! - [`config`] - [`RenderConfig`](config::RenderConfig) and per-format layouts
//! - [`ingest`] - CSV, line, text-block and JSON input
//! - [`session`] - [`ChatSession`](session::ChatSession), the per-session record buffer
//! - [`error`] - Unified error types ([`ChatdocError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod ingest;
pub mod record;
pub mod session;

// Re-export the main types at the crate root for convenience
pub use error::{ChatdocError, Result};
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatdoc::prelude::*;
/// ```
pub mod prelude {
    // Core record type
    pub use crate::Record;

    // Error types
    pub use crate::error::{ChatdocError, PdfErrorKind, Result};

    // Configuration
    pub use crate::config::{PdfLayout, RenderConfig, TextStyle, WordLayout};

    // Classification
    pub use crate::core::shape::{BatchShape, classify};
    pub use crate::core::styling::{LineKind, StyledLine, classify_line};
    pub use crate::core::table::{ParsedTable, TableSyntax, parse_markdown_table};

    // Writers
    pub use crate::core::output::{to_markdown, write_markdown};
    #[cfg(feature = "word")]
    pub use crate::core::output::{to_docx, write_docx};
    #[cfg(feature = "pdf")]
    pub use crate::core::output::{to_pdf, write_pdf};
    #[cfg(feature = "excel")]
    pub use crate::core::output::{to_xlsx, write_xlsx};

    // Formats and export
    pub use crate::format::{
        DocumentFormat, ExportedDocument, RenderedDocument, export, export_to_dir,
        render_to_format, write_to_format,
    };

    // Ingestion
    #[cfg(feature = "csv-input")]
    pub use crate::ingest::records_from_csv;
    #[cfg(feature = "json-input")]
    pub use crate::ingest::records_from_json;
    pub use crate::ingest::{normalize_legacy_keys, records_from_lines, records_from_text_block};

    // Session buffer
    pub use crate::session::ChatSession;
}
