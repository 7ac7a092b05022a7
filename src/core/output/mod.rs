//! Document writers.
//!
//! This module provides one renderer per output format:
//! - [`write_markdown`] / [`to_markdown`] - paragraphs or a pipe table (always available)
//! - [`write_pdf`] / [`to_pdf`] - paginated PDF - requires `pdf` feature
//! - [`write_docx`] / [`to_docx`] - Word document - requires `word` feature
//! - [`write_xlsx`] / [`to_xlsx`] - Excel workbook - requires `excel` feature
//!
//! Every renderer takes the same batch of [`Record`](crate::Record)s and
//! classifies it with [`classify`](crate::core::shape::classify) first.
//!
//! # Choosing a Format
//!
//! | Format | Free text | Tabular rows |
//! |--------|-----------|--------------|
//! | Markdown | Paragraphs | Pipe table |
//! | PDF | Wrapped paragraphs (optionally styled) | Bordered grid |
//! | Word | Title + paragraphs (optionally styled), or a pasted table | Table |
//! | Excel | `message` column, or a pasted table | One column per key |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "pdf", feature = "word", feature = "excel"))]
//! # fn main() -> chatdoc::Result<()> {
//! use chatdoc::core::output::{to_markdown, write_docx, write_pdf, write_xlsx};
//! use chatdoc::config::RenderConfig;
//! use chatdoc::Record;
//!
//! let rows = vec![
//!     Record::new().with("Name", "Sid").with("Age", "35"),
//!     Record::new().with("Name", "Stella").with("Age", "33"),
//! ];
//! let config = RenderConfig::new();
//!
//! write_pdf(&rows, "roster.pdf", &config)?;
//! write_docx(&rows, "roster.docx", &config)?;
//! write_xlsx(&rows, "roster.xlsx", &config)?;
//!
//! // Or get the Markdown as a string
//! let markdown = to_markdown(&rows, &config);
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "pdf", feature = "word", feature = "excel")))]
//! # fn main() {}
//! ```

#[cfg(feature = "word")]
mod docx_writer;
mod markdown_writer;
#[cfg(feature = "pdf")]
mod pdf_writer;
#[cfg(feature = "excel")]
mod xlsx_writer;

#[cfg(feature = "word")]
pub use docx_writer::{to_docx, write_docx};
pub use markdown_writer::{to_markdown, write_markdown};
#[cfg(feature = "pdf")]
pub use pdf_writer::{to_pdf, write_pdf};
#[cfg(feature = "excel")]
pub use xlsx_writer::{MAX_CELL_CHARS, SHEET_NAME, to_xlsx, write_xlsx};

pub(crate) use markdown_writer::write_pipe_table;
