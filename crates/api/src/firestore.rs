//! Firestore document-event decoding.
//!
//! Document-created events arrive as `DocumentEventData` JSON: the new
//! document's resource name plus its fields in Firestore's typed value
//! encoding (`{"stringValue": "..."}`, `{"mapValue": {"fields": ...}}`, ...).
//! This module turns that into a plain [`NotificationRecord`] and the
//! document's collection path and id.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use streetlight_core::error::CoreError;
use streetlight_core::NotificationRecord;

// ---------------------------------------------------------------------------
// Event envelope
// ---------------------------------------------------------------------------

/// Payload of a Firestore document event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    /// The document after the change; absent for deletes.
    #[serde(default)]
    pub value: Option<Document>,
}

/// A Firestore document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: IndexMap<String, FirestoreValue>,
}

impl Document {
    pub fn into_record(self) -> NotificationRecord {
        NotificationRecord::new(fields_to_json(self.fields))
    }
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: IndexMap<String, FirestoreValue>,
}

/// One Firestore value in its JSON wire encoding.
///
/// 64-bit integers travel as strings and doubles may be the strings `NaN`,
/// `Infinity` or `-Infinity`, hence the untyped payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(Value),
    BooleanValue(bool),
    IntegerValue(Value),
    DoubleValue(Value),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl FirestoreValue {
    /// Plain JSON form of the value.
    ///
    /// Timestamps, bytes (base64) and references stay strings. Non-finite
    /// doubles have no JSON form and become `null`.
    pub fn into_json(self) -> Value {
        match self {
            FirestoreValue::NullValue(_) => Value::Null,
            FirestoreValue::BooleanValue(b) => Value::Bool(b),
            FirestoreValue::IntegerValue(raw) => integer_json(raw),
            FirestoreValue::DoubleValue(raw) => double_json(raw),
            FirestoreValue::TimestampValue(s)
            | FirestoreValue::StringValue(s)
            | FirestoreValue::BytesValue(s)
            | FirestoreValue::ReferenceValue(s) => Value::String(s),
            FirestoreValue::GeoPointValue(point) => {
                let mut map = Map::new();
                map.insert("latitude".to_string(), finite_number(point.latitude));
                map.insert("longitude".to_string(), finite_number(point.longitude));
                Value::Object(map)
            }
            FirestoreValue::ArrayValue(array) => Value::Array(
                array
                    .values
                    .into_iter()
                    .map(FirestoreValue::into_json)
                    .collect(),
            ),
            FirestoreValue::MapValue(map) => Value::Object(fields_to_json(map.fields)),
        }
    }
}

fn fields_to_json(fields: IndexMap<String, FirestoreValue>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, value.into_json()))
        .collect()
}

fn integer_json(raw: Value) -> Value {
    match raw {
        Value::String(s) => match s.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

fn double_json(raw: Value) -> Value {
    match raw {
        Value::String(s) => s
            .parse::<f64>()
            .map(finite_number)
            .unwrap_or(Value::Null),
        other => other,
    }
}

fn finite_number(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Document names
// ---------------------------------------------------------------------------

/// Location of a document: its collection path and id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// e.g. `notifications`, or `users/u1/inbox` for subcollections.
    pub collection_path: String,
    pub document_id: String,
}

impl DocumentRef {
    /// Parse a full resource name or a database-relative path
    /// (`notifications/abc`).
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let relative = match name.split_once("/documents/") {
            Some((_, rest)) => rest,
            None => name,
        };

        let segments: Vec<&str> = relative.split('/').collect();
        if segments.len() < 2 || segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty())
        {
            return Err(CoreError::Validation(format!(
                "Not a document name: {name}"
            )));
        }

        let (collection, id) = segments.split_at(segments.len() - 1);
        Ok(Self {
            collection_path: collection.join("/"),
            document_id: id[0].to_string(),
        })
    }
}
