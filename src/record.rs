//! Remote record model
//!
//! A [`Record`] is an opaque entity from the remote collection. The only
//! part the selection engine ever looks at is its [`RecordId`]; every other
//! field is carried along untouched so the output layer can display it.
//!
//! Two records with the same id are the same logical entity even when their
//! other fields differ between fetches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable identity of a remote record (integer or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier
    Int(i64),
    /// Textual identifier
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// One entity of the remote collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity used for every selection decision
    pub id: RecordId,

    /// Everything else the source returned, keyed by field name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no additional fields
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Attach a field, replacing any previous value under the same name
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw field value
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field rendered as display text
    ///
    /// Strings are returned without quotes, `null` and missing fields
    /// become an empty string.
    #[must_use]
    pub fn field_text(&self, name: &str) -> String {
        if name == "id" {
            return self.id.to_string();
        }
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_integer_id_with_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "date_start": 1884
        }))
        .unwrap();

        assert_eq!(record.id, RecordId::Int(27992));
        assert_eq!(record.field_text("title"), "A Sunday on La Grande Jatte");
        assert_eq!(record.field_text("date_start"), "1884");
    }

    #[test]
    fn test_deserialize_string_id() {
        let record: Record = serde_json::from_value(json!({ "id": "abc-1" })).unwrap();
        assert_eq!(record.id, RecordId::Text("abc-1".into()));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_field_text_null_and_missing() {
        let record = Record::new(1).with_field("inscriptions", Value::Null);
        assert_eq!(record.field_text("inscriptions"), "");
        assert_eq!(record.field_text("missing"), "");
        assert_eq!(record.field_text("id"), "1");
    }

    #[test]
    fn test_serialize_flattens_fields() {
        let record = Record::new(7).with_field("title", "Nighthawks");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "id": 7, "title": "Nighthawks" }));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(RecordId::from(42).to_string(), "42");
        assert_eq!(RecordId::from("x-9").to_string(), "x-9");
    }
}
