//! Turning uploaded files and pasted text into a batch of records.
//!
//! | Source | Result |
//! |--------|--------|
//! | CSV | one record per row, keyed by the header |
//! | Lines | one `message` record per non-blank line |
//! | Text block | a single `message` record holding the whole text |
//! | JSON | one record per object of a top-level array |
//!
//! Every function rejects input that yields no records with
//! [`ChatdocError::InvalidInput`], so renderers only ever see well-formed
//! batches.

use tracing::debug;

use crate::Record;
use crate::error::{ChatdocError, Result};
use crate::record::MESSAGE_KEY;

/// Legacy free-text column name, renamed to `message` on export.
pub const LEGACY_MESSAGE_KEY: &str = "user";

/// Parses CSV text into header-keyed records.
///
/// Short rows are padded with empty values and surplus fields are dropped.
/// Rows whose fields are all blank are skipped.
///
/// # Errors
///
/// Returns [`ChatdocError::InvalidInput`] when the header row is missing or
/// blank, or when no row carries a value.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "csv-input")]
/// # fn main() -> chatdoc::Result<()> {
/// use chatdoc::ingest::records_from_csv;
///
/// let records = records_from_csv("Name,Age\nSid,35\nStella\n")?;
/// assert_eq!(records[1].get("Age"), Some(""));
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "csv-input"))]
/// # fn main() {}
/// ```
#[cfg(feature = "csv-input")]
pub fn records_from_csv(text: &str) -> Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(ChatdocError::invalid_input("csv", "missing header row"));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), row.get(i).unwrap_or("")))
            .collect();
        records.push(record);
    }

    if records.is_empty() {
        return Err(ChatdocError::invalid_input("csv", "no data rows below the header"));
    }
    debug!(columns = headers.len(), rows = records.len(), "parsed csv input");
    Ok(records)
}

/// Splits text into one `message` record per non-blank, trimmed line.
///
/// # Errors
///
/// Returns [`ChatdocError::InvalidInput`] when every line is blank.
///
/// # Example
///
/// ```rust
/// use chatdoc::ingest::records_from_lines;
///
/// let records = records_from_lines("first\n\n  second  \n").unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].message_text(), Some("second"));
/// ```
pub fn records_from_lines(text: &str) -> Result<Vec<Record>> {
    let records: Vec<Record> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Record::message)
        .collect();
    if records.is_empty() {
        return Err(ChatdocError::invalid_input("text", "no non-blank lines"));
    }
    debug!(lines = records.len(), "parsed line input");
    Ok(records)
}

/// Wraps the whole trimmed text in a single `message` record.
///
/// This keeps a pasted markdown table together so the Word renderer can
/// detect it.
///
/// # Errors
///
/// Returns [`ChatdocError::InvalidInput`] when the text is blank.
pub fn records_from_text_block(text: &str) -> Result<Vec<Record>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChatdocError::invalid_input("text", "text is empty"));
    }
    Ok(vec![Record::message(text)])
}

/// Parses a JSON array of objects into records, keeping key order.
///
/// Strings are kept verbatim, `null` becomes an empty value, and numbers,
/// booleans and nested values use their compact JSON text.
///
/// # Errors
///
/// Returns [`ChatdocError::InvalidInput`] when the top-level value is not an
/// array or the array is empty, and [`ChatdocError::Json`] for malformed JSON.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "json-input")]
/// # fn main() -> chatdoc::Result<()> {
/// use chatdoc::ingest::records_from_json;
///
/// let records = records_from_json(r#"[{"b": 2, "a": null}]"#)?;
/// assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(records[0].get("b"), Some("2"));
/// assert_eq!(records[0].get("a"), Some(""));
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "json-input"))]
/// # fn main() {}
/// ```
#[cfg(feature = "json-input")]
pub fn records_from_json(text: &str) -> Result<Vec<Record>> {
    if !text.trim_start().starts_with('[') {
        return Err(ChatdocError::invalid_input("json", "expected a JSON array of objects"));
    }
    let rows: Vec<json::JsonRow> = serde_json::from_str(text)?;
    if rows.is_empty() {
        return Err(ChatdocError::invalid_input("json", "array is empty"));
    }
    debug!(rows = rows.len(), "parsed json input");
    Ok(rows.into_iter().map(|row| row.0).collect())
}

#[cfg(feature = "json-input")]
mod json {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::Record;

    /// A JSON object read into a [`Record`] in document order.
    pub(super) struct JsonRow(pub(super) Record);

    impl<'de> Deserialize<'de> for JsonRow {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct RowVisitor;

            impl<'de> Visitor<'de> for RowVisitor {
                type Value = JsonRow;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a JSON object")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JsonRow, A::Error> {
                    let mut record = Record::new();
                    while let Some((key, value)) = access.next_entry::<String, Value>()? {
                        let value = match value {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        record.insert(key, value);
                    }
                    Ok(JsonRow(record))
                }
            }

            deserializer.deserialize_map(RowVisitor)
        }
    }
}

/// Renames the legacy `user` column to `message` when it is the only key of
/// every record. Returns `true` if anything was renamed.
///
/// # Example
///
/// ```rust
/// use chatdoc::Record;
/// use chatdoc::ingest::normalize_legacy_keys;
///
/// let mut records = vec![Record::new().with("user", "hi")];
/// assert!(normalize_legacy_keys(&mut records));
/// assert!(records[0].is_message());
/// ```
pub fn normalize_legacy_keys(records: &mut [Record]) -> bool {
    let legacy = !records.is_empty()
        && records
            .iter()
            .all(|record| record.has_sole_key(LEGACY_MESSAGE_KEY));
    if legacy {
        debug!(records = records.len(), "renaming legacy user column to message");
        for record in records.iter_mut() {
            record.rename_key(LEGACY_MESSAGE_KEY, MESSAGE_KEY);
        }
    }
    legacy
}
