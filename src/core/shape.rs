//! Batch shape classification.
//!
//! Every renderer first asks whether a batch is free text (each record holds a
//! single `message` field) or tabular (named columns, header taken from the
//! first record).

use tracing::{debug, warn};

use crate::record::{MESSAGE_KEY, Record};

/// The shape of a batch of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchShape {
    /// Every record has exactly the single key `message`.
    FreeText,
    /// Column-keyed rows. An empty batch is tabular with zero columns.
    Tabular {
        /// Column order of the first record.
        columns: Vec<String>,
        /// `true` when every record carries exactly `columns`, in order.
        ///
        /// When `false`, renderers look fields up per record and fill the
        /// gaps with empty strings.
        uniform: bool,
    },
}

impl BatchShape {
    /// Returns `true` for free-text batches.
    pub fn is_free_text(&self) -> bool {
        matches!(self, BatchShape::FreeText)
    }

    /// Returns the header columns (a single `message` column for free text).
    pub fn columns(&self) -> Vec<String> {
        match self {
            BatchShape::FreeText => vec![MESSAGE_KEY.to_string()],
            BatchShape::Tabular { columns, .. } => columns.clone(),
        }
    }
}

/// Classifies a batch.
///
/// # Example
///
/// ```
/// use chatdoc::Record;
/// use chatdoc::core::shape::{BatchShape, classify};
///
/// let lines = vec![Record::message("one"), Record::message("two")];
/// assert_eq!(classify(&lines), BatchShape::FreeText);
///
/// let rows = vec![Record::new().with("Name", "Sid").with("Age", "35")];
/// assert!(!classify(&rows).is_free_text());
/// ```
pub fn classify(records: &[Record]) -> BatchShape {
    let Some(first) = records.first() else {
        return BatchShape::Tabular {
            columns: Vec::new(),
            uniform: true,
        };
    };

    if records.iter().all(Record::is_message) {
        debug!(records = records.len(), "classified batch as free text");
        return BatchShape::FreeText;
    }

    let columns: Vec<String> = first.keys().map(str::to_string).collect();
    let uniform = records.iter().all(|r| r.keys().eq(columns.iter().map(String::as_str)));
    if !uniform {
        warn!(
            records = records.len(),
            columns = ?columns,
            "records do not share one column set; missing fields render empty"
        );
    }
    debug!(columns = columns.len(), uniform, "classified batch as tabular");

    BatchShape::Tabular { columns, uniform }
}

/// Returns the trimmed, non-blank `message` texts of a batch in order.
pub fn message_texts(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(Record::message_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Splits free-text records into trimmed, non-blank lines.
///
/// A record whose message spans several lines contributes each of them.
pub fn message_lines(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(Record::message_text)
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Returns the cell values of `record` in `columns` order, `""` for gaps.
pub fn row_values<'a>(record: &'a Record, columns: &[String]) -> Vec<&'a str> {
    columns.iter().map(|c| record.get_or_empty(c)).collect()
}
