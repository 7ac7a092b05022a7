//! In-memory record history for one user session.
//!
//! A [`ChatSession`] is what a front end (CLI, web handler) holds between
//! requests: messages are appended as they arrive, an upload replaces the
//! whole buffer, and every export renders from a snapshot of the current
//! contents. The session is not synchronized; wrap it in a lock if several
//! threads share it.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatdoc::Result<()> {
//! use chatdoc::config::RenderConfig;
//! use chatdoc::format::DocumentFormat;
//! use chatdoc::session::ChatSession;
//!
//! let mut session = ChatSession::new();
//! session.push_message("PROJECT STATUS");
//! session.push_message("Owner: Sid. Review on Friday.");
//!
//! let exported = session.export(DocumentFormat::Markdown, "exports", &RenderConfig::new())?;
//! println!("{} ({})", exported.path.display(), exported.mime_type);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use tracing::debug;

use crate::Record;
use crate::config::RenderConfig;
use crate::error::{ChatdocError, Result};
use crate::format::{DocumentFormat, ExportedDocument, export_to_dir};
use crate::ingest::normalize_legacy_keys;

/// Ordered record buffer owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    records: Vec<Record>,
}

impl ChatSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a free-text message. Blank text is ignored.
    pub fn push_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.records.push(Record::message(text));
    }

    /// Replaces the buffer with uploaded rows.
    pub fn replace_rows(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.clear();
        self.records.extend(records);
        debug!(records = self.records.len(), "replaced session rows");
    }

    /// Current contents, oldest first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Renders the current contents into `dir`.
    ///
    /// The buffer is left untouched, so a failed export can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::EmptyHistory`] when nothing is buffered, or the
    /// renderer's error.
    pub fn export(
        &self,
        format: DocumentFormat,
        dir: impl AsRef<Path>,
        config: &RenderConfig,
    ) -> Result<ExportedDocument> {
        if self.records.is_empty() {
            return Err(ChatdocError::EmptyHistory);
        }
        let mut snapshot = self.records.clone();
        normalize_legacy_keys(&mut snapshot);
        export_to_dir(&snapshot, format, dir, config)
    }
}

impl FromIterator<Record> for ChatSession {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
