//! Core processing logic for chatdoc.
//!
//! This module contains:
//! - [`shape`] - Batch classification (free text vs tabular)
//! - [`table`] - Markdown pipe-table detection and parsing
//! - [`styling`] - Line classification for the styled text mode
//! - [`layout`] - Text metrics, wrapping and column-width balancing
//! - [`output`] - Format writers (Markdown, PDF, Word, Excel)
//!
//! # Quick Start
//!
//! ```rust
//! use chatdoc::core::{BatchShape, classify, parse_markdown_table, TableSyntax};
//! use chatdoc::Record;
//!
//! let batch = vec![Record::message("| A | B |\n| 1 | 2 |")];
//! assert_eq!(classify(&batch), BatchShape::FreeText);
//!
//! let table = parse_markdown_table("| A | B |\n| 1 | 2 |", TableSyntax::Lenient).unwrap();
//! assert_eq!(table.rows, vec![vec!["1", "2"]]);
//! ```

pub mod layout;
pub mod output;
pub mod shape;
pub mod styling;
pub mod table;

// Re-export main types for convenience
pub use shape::{BatchShape, classify};
pub use styling::{LineKind, Span, StyledLine, classify_line};
pub use table::{ParsedTable, TableSyntax, parse_markdown_table};

// Conditionally re-export output writers
pub use output::{to_markdown, write_markdown};
#[cfg(feature = "word")]
pub use output::{to_docx, write_docx};
#[cfg(feature = "pdf")]
pub use output::{to_pdf, write_pdf};
#[cfg(feature = "excel")]
pub use output::{to_xlsx, write_xlsx};
