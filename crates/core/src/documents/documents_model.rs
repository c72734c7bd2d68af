//! Wire-level models for remote documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single typed value stored in a remote document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Name of the value's wire type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// Field map of a document, without its identifier.
pub type RawRecord = BTreeMap<String, FieldValue>;

/// A document as delivered by a snapshot: store-assigned id plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub id: String,
    pub fields: RawRecord,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: RawRecord) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_field_value_accessors_match_variant() {
        let ts = Utc.with_ymd_and_hms(2025, 4, 24, 0, 0, 0).unwrap();
        assert_eq!(FieldValue::from("x").as_str(), Some("x"));
        assert_eq!(FieldValue::from(true).as_bool(), Some(true));
        assert_eq!(FieldValue::from(ts).as_timestamp(), Some(ts));

        assert_eq!(FieldValue::from(1_i64).as_str(), None);
        assert_eq!(FieldValue::from("true").as_bool(), None);
        assert_eq!(FieldValue::Null.as_timestamp(), None);
    }

    #[test]
    fn test_field_value_serialization_is_tagged() {
        let json = serde_json::to_string(&FieldValue::Bool(false)).unwrap();
        assert_eq!(json, r#"{"type":"bool","value":false}"#);

        let null_json = serde_json::to_string(&FieldValue::Null).unwrap();
        assert_eq!(null_json, r#"{"type":"null"}"#);

        let parsed: FieldValue =
            serde_json::from_str(r#"{"type":"string","value":"Run 5k"}"#).unwrap();
        assert_eq!(parsed, FieldValue::String("Run 5k".to_string()));
    }
}
