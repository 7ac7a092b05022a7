//! Document format types for the chatdoc library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks, plus the dispatch functions that pick a renderer by format.
//!
//! # Example
//!
//! ```rust
//! # fn example() -> chatdoc::Result<()> {
//! use chatdoc::config::RenderConfig;
//! use chatdoc::format::{DocumentFormat, render_to_format};
//! use chatdoc::Record;
//!
//! let records = vec![Record::message("Hello!")];
//! let bytes = render_to_format(&records, DocumentFormat::Markdown, &RenderConfig::new())?;
//! assert_eq!(bytes, b"Hello!\n\n");
//!
//! // Or detect the format from an extension
//! let format = DocumentFormat::from_path("report.docx")?;
//! assert_eq!(format, DocumentFormat::Word);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Record;
use crate::config::RenderConfig;
use crate::error::{ChatdocError, Result};

/// Prefix of every generated document name.
pub const FILENAME_PREFIX: &str = "chat_document_";

/// Output document format.
///
/// # Example
///
/// ```rust
/// use chatdoc::format::DocumentFormat;
/// use std::str::FromStr;
///
/// let format = DocumentFormat::from_str("excel").unwrap();
/// assert_eq!(format, DocumentFormat::Excel);
/// assert_eq!(format.extension(), "xlsx");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Paragraphs or a pipe table (always available)
    #[default]
    Markdown,

    /// Paginated PDF (requires the `pdf` feature)
    Pdf,

    /// Word document (requires the `word` feature)
    Word,

    /// Excel workbook (requires the `excel` feature)
    Excel,
}

impl DocumentFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatdoc::format::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::Markdown.extension(), "md");
    /// assert_eq!(DocumentFormat::Word.extension(), "docx");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "md",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Word => "docx",
            DocumentFormat::Excel => "xlsx",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["markdown", "md", "pdf", "word", "docx", "excel", "xlsx"]
    }

    /// Returns all formats.
    pub fn all() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Markdown,
            DocumentFormat::Pdf,
            DocumentFormat::Word,
            DocumentFormat::Excel,
        ]
    }

    /// Returns the MIME type the document is served with.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatdoc::format::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::Pdf.mime_type(), "application/pdf");
    /// ```
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "text/markdown",
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Returns the Cargo feature that enables this format, if any.
    pub fn feature(&self) -> Option<&'static str> {
        match self {
            DocumentFormat::Markdown => None,
            DocumentFormat::Pdf => Some("pdf"),
            DocumentFormat::Word => Some("word"),
            DocumentFormat::Excel => Some("excel"),
        }
    }

    /// Returns `true` if this build can render the format.
    pub fn is_enabled(&self) -> bool {
        match self {
            DocumentFormat::Markdown => true,
            DocumentFormat::Pdf => cfg!(feature = "pdf"),
            DocumentFormat::Word => cfg!(feature = "word"),
            DocumentFormat::Excel => cfg!(feature = "excel"),
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatdoc::format::DocumentFormat;
    ///
    /// let format = DocumentFormat::from_path("out/report.PDF").unwrap();
    /// assert_eq!(format, DocumentFormat::Pdf);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Word),
            "xlsx" => Ok(DocumentFormat::Excel),
            _ => Err(ChatdocError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: md, pdf, docx, xlsx"),
            )),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Markdown => write!(f, "Markdown"),
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Word => write!(f, "Word"),
            DocumentFormat::Excel => write!(f, "Excel"),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(DocumentFormat::Markdown),
            "pdf" => Ok(DocumentFormat::Pdf),
            "word" | "docx" => Ok(DocumentFormat::Word),
            "excel" | "xlsx" => Ok(DocumentFormat::Excel),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                DocumentFormat::all_names().join(", ")
            )),
        }
    }
}

/// Builds `chat_document_<YYYYMMDD_HHMMSS>.<ext>`.
///
/// # Example
///
/// ```rust
/// use chatdoc::format::{DocumentFormat, generated_filename};
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_opt(14, 5, 7)
///     .unwrap();
/// assert_eq!(
///     generated_filename(DocumentFormat::Pdf, at),
///     "chat_document_20240309_140507.pdf"
/// );
/// ```
pub fn generated_filename(format: DocumentFormat, timestamp: NaiveDateTime) -> String {
    format!(
        "{FILENAME_PREFIX}{}.{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn feature_disabled(format: DocumentFormat) -> ChatdocError {
    ChatdocError::invalid_format(
        "output",
        format!(
            "Output format {format} requires the '{}' feature to be enabled",
            format.feature().unwrap_or("default")
        ),
    )
}

/// Renders records into document bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The renderer fails (see [`ChatdocError::Pdf`])
#[allow(unused_variables)]
pub fn render_to_format(
    records: &[Record],
    format: DocumentFormat,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    match format {
        DocumentFormat::Markdown => {
            Ok(crate::core::output::to_markdown(records, config).into_bytes())
        }
        #[cfg(feature = "pdf")]
        DocumentFormat::Pdf => crate::core::output::to_pdf(records, config),
        #[cfg(feature = "word")]
        DocumentFormat::Word => crate::core::output::to_docx(records, config),
        #[cfg(feature = "excel")]
        DocumentFormat::Excel => crate::core::output::to_xlsx(records, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Writes records to a file in the specified format.
///
/// # Example
///
/// ```rust,no_run
/// # fn example() -> chatdoc::Result<()> {
/// use chatdoc::config::RenderConfig;
/// use chatdoc::format::{DocumentFormat, write_to_format};
/// use chatdoc::Record;
///
/// let records = vec![Record::new().with("Name", "Sid").with("Age", "35")];
/// write_to_format(&records, "roster.md", DocumentFormat::Markdown, &RenderConfig::new())?;
/// # Ok(())
/// # }
/// ```
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[Record],
    path: impl AsRef<Path>,
    format: DocumentFormat,
    config: &RenderConfig,
) -> Result<()> {
    match format {
        DocumentFormat::Markdown => crate::core::output::write_markdown(records, path, config),
        #[cfg(feature = "pdf")]
        DocumentFormat::Pdf => crate::core::output::write_pdf(records, path, config),
        #[cfg(feature = "word")]
        DocumentFormat::Word => crate::core::output::write_docx(records, path, config),
        #[cfg(feature = "excel")]
        DocumentFormat::Excel => crate::core::output::write_xlsx(records, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// A freshly rendered document, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Document bytes
    pub bytes: Vec<u8>,
    /// Format the bytes are in
    pub format: DocumentFormat,
    /// Generated name, `chat_document_<timestamp>.<ext>`
    pub filename: String,
}

impl RenderedDocument {
    /// MIME type of the document.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Writes the document into `dir` under its generated name.
    ///
    /// A document exported in the same second and format overwrites the
    /// earlier one.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Where an exported document was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// Full path of the written file
    pub path: PathBuf,
    /// File name within the output directory
    pub filename: String,
    /// MIME type to serve the file with
    pub mime_type: &'static str,
    /// Format of the file
    pub format: DocumentFormat,
}

/// Renders records and names the result after the current local time.
pub fn export(
    records: &[Record],
    format: DocumentFormat,
    config: &RenderConfig,
) -> Result<RenderedDocument> {
    let bytes = render_to_format(records, format, config)?;
    let filename = generated_filename(format, Local::now().naive_local());
    Ok(RenderedDocument {
        bytes,
        format,
        filename,
    })
}

/// Renders records and writes them into `dir` under a generated name.
pub fn export_to_dir(
    records: &[Record],
    format: DocumentFormat,
    dir: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ExportedDocument> {
    let document = export(records, format, config)?;
    let path = document.save_in(dir)?;
    info!(
        format = %format,
        records = records.len(),
        bytes = document.bytes.len(),
        file = %document.filename,
        "exported document"
    );
    Ok(ExportedDocument {
        path,
        mime_type: document.mime_type(),
        filename: document.filename,
        format,
    })
}
