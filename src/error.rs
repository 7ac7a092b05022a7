//! Unified error types for chatdoc.
//!
//! This module provides a single [`ChatdocError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular crates
//! like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Only the PDF renderer is expected to fail on well-formed input: text the
//! built-in font cannot encode is reported as [`PdfErrorKind::FontCharacter`],
//! everything else as [`PdfErrorKind::Generic`]. Dropped table rows and
//! missing record fields are silent degradations, never errors.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatdoc operations.
///
/// # Example
///
/// ```rust
/// use chatdoc::error::Result;
/// use chatdoc::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatdocError>;

/// The error type for all chatdoc operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatdocError {
    /// An I/O error occurred while writing or reading a file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// PDF rendering failed.
    ///
    /// Terminal for the export attempt; retrying without changing the input
    /// fails the same way.
    #[error("{}", pdf_display(*kind, message))]
    Pdf {
        /// Which class of failure occurred
        kind: PdfErrorKind,
        /// Description of the failure
        message: String,
    },

    /// Building the Word document archive failed.
    #[error("Word generation failed: {0}")]
    Word(String),

    /// Building the Excel workbook failed.
    #[cfg(feature = "excel")]
    #[error("Excel generation failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// CSV input could not be read.
    #[cfg(feature = "csv-input")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON input or configuration could not be parsed.
    #[cfg(feature = "json-input")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ingested input does not describe a usable batch.
    ///
    /// This occurs when:
    /// - A CSV text has no header row
    /// - A CSV text has no data row below the header
    /// - Plain text contains no non-blank line
    #[error("Invalid {source_kind} input: {message}")]
    InvalidInput {
        /// The kind of input being read (e.g., "CSV", "text")
        source_kind: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Unknown or unavailable output format.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format family that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A session export was requested with nothing buffered.
    #[error("No chat history to export")]
    EmptyHistory,
}

/// Classes of PDF rendering failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfErrorKind {
    /// A character is outside what the built-in font can encode
    FontCharacter,
    /// Any other PDF failure
    Generic,
}

fn pdf_display(kind: PdfErrorKind, message: &str) -> String {
    match kind {
        PdfErrorKind::FontCharacter => format!(
            "PDF generation failed due to a font/character issue. \
             Use text the built-in Latin-1 font can encode. Error: {message}"
        ),
        PdfErrorKind::Generic => format!("PDF generation failed: {message}"),
    }
}

#[cfg(feature = "word")]
impl From<zip::result::ZipError> for ChatdocError {
    fn from(err: zip::result::ZipError) -> Self {
        ChatdocError::Word(err.to_string())
    }
}

#[cfg(feature = "word")]
impl From<quick_xml::Error> for ChatdocError {
    fn from(err: quick_xml::Error) -> Self {
        ChatdocError::Word(err.to_string())
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatdocError {
    /// Creates a PDF error for a character the built-in font cannot encode.
    pub fn unsupported_character(ch: char) -> Self {
        ChatdocError::Pdf {
            kind: PdfErrorKind::FontCharacter,
            message: format!(
                "character '{}' (U+{:04X}) is outside the range of the font",
                ch.escape_default(),
                u32::from(ch)
            ),
        }
    }

    /// Creates a PDF error from a failure message, classifying it.
    ///
    /// Messages that mention a font or a character/encoding problem become
    /// [`PdfErrorKind::FontCharacter`]; all others are [`PdfErrorKind::Generic`].
    pub fn pdf(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        let kind = if lowered.contains("font")
            || lowered.contains("character")
            || lowered.contains("encod")
        {
            PdfErrorKind::FontCharacter
        } else {
            PdfErrorKind::Generic
        };
        ChatdocError::Pdf { kind, message }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(source_kind: &'static str, message: impl Into<String>) -> Self {
        ChatdocError::InvalidInput {
            source_kind,
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatdocError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatdocError::Io(_))
    }

    /// Returns `true` if this is any PDF rendering error.
    pub fn is_pdf(&self) -> bool {
        matches!(self, ChatdocError::Pdf { .. })
    }

    /// Returns `true` if this is a PDF font/character error.
    pub fn is_pdf_font_character(&self) -> bool {
        matches!(
            self,
            ChatdocError::Pdf {
                kind: PdfErrorKind::FontCharacter,
                ..
            }
        )
    }

    /// Returns `true` if this is an ingestion error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ChatdocError::InvalidInput { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatdocError::InvalidFormat { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
