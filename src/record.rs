//! Ordered record type shared by every renderer.
//!
//! A [`Record`] maps column names to cell values while keeping the order in
//! which columns were inserted. The first record of a batch defines the
//! canonical column order for tabular output.
//!
//! # Examples
//!
//! ```
//! use chatdoc::Record;
//!
//! let row = Record::new()
//!     .with("First Name", "Steve")
//!     .with("Age", "36");
//!
//! assert_eq!(row.get("Age"), Some("36"));
//! assert_eq!(row.keys().collect::<Vec<_>>(), vec!["First Name", "Age"]);
//!
//! let line = Record::message("Hello!");
//! assert!(line.is_message());
//! ```
//!
//! ## Serialization
//!
//! Records serialize as JSON objects with their column order intact:
//!
//! ```
//! use chatdoc::Record;
//!
//! let row = Record::new().with("b", "2").with("a", "1");
//! let json = serde_json::to_string(&row)?;
//! assert_eq!(json, r#"{"b":"2","a":"1"}"#);
//!
//! let parsed: Record = serde_json::from_str(&json)?;
//! assert_eq!(parsed, row);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column name used by free-text records.
pub const MESSAGE_KEY: &str = "message";

/// An ordered mapping from column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a free-text record with the single key `message`.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            fields: vec![(MESSAGE_KEY.to_string(), text.into())],
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value under `key`, or `""` when the column is missing.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Iterates over column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the record has exactly the single key `key`.
    pub fn has_sole_key(&self, key: &str) -> bool {
        self.fields.len() == 1 && self.fields[0].0 == key
    }

    /// Returns `true` if this is a free-text record (sole key `message`).
    pub fn is_message(&self) -> bool {
        self.has_sole_key(MESSAGE_KEY)
    }

    /// Returns the `message` value, if present.
    pub fn message_text(&self) -> Option<&str> {
        self.get(MESSAGE_KEY)
    }

    /// Renames a column in place, keeping its position.
    pub fn rename_key(&mut self, from: &str, to: impl Into<String>) {
        if let Some((k, _)) = self.fields.iter_mut().find(|(k, _)| k == from) {
            *k = to.into();
        }
    }

    /// Consumes the record, returning its pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.fields
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    record.insert(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
