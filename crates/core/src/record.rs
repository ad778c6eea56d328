//! The notification record as written to the datastore by the monitoring
//! side.
//!
//! The record is schemaless: apart from the handful of fields read here it
//! may carry any attribute, and every field is optional. [`NotificationRecord`]
//! keeps the raw field map and exposes read-only accessors that apply the
//! fallback rules; it is never mutated after it has been read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::channels::{
    ATTR_APP_NAME, ATTR_LIGHT_NAME, DEFAULT_APP_NAME, FIELD_BODY, FIELD_MESSAGE, FIELD_NAME,
    FIELD_TITLE, FIELD_USER_ID,
};
use crate::message::attribute_text;

/// A newly created notification document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationRecord {
    fields: Map<String, Value>,
}

impl NotificationRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field map, in document order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Display text of a field, or `None` when the field is missing or falsy.
    ///
    /// `null`, `false`, `0` and `""` count as absent. Strings are returned
    /// verbatim; any other value is rendered as compact JSON.
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(truthy_text)
    }

    pub fn title(&self) -> Option<String> {
        self.text(FIELD_TITLE)
    }

    /// `body`, falling back to `message`.
    pub fn body(&self) -> Option<String> {
        self.text(FIELD_BODY).or_else(|| self.text(FIELD_MESSAGE))
    }

    pub fn user_id(&self) -> Option<String> {
        self.text(FIELD_USER_ID)
    }

    /// `appName`, or [`DEFAULT_APP_NAME`].
    pub fn app_name(&self) -> String {
        self.text(ATTR_APP_NAME)
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
    }

    /// `lightName`, then `name`, then the empty string.
    pub fn light_name(&self) -> String {
        self.text(ATTR_LIGHT_NAME)
            .or_else(|| self.text(FIELD_NAME))
            .unwrap_or_default()
    }
}

impl From<Map<String, Value>> for NotificationRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    let truthy = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    truthy.then(|| attribute_text(value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> NotificationRecord {
        serde_json::from_value(value).expect("test record must be a JSON object")
    }

    #[test]
    fn deserializes_from_plain_object() {
        let rec = record(json!({"title": "Light Out", "userId": "u1"}));
        assert_eq!(rec.fields().len(), 2);
        assert_eq!(rec.title().as_deref(), Some("Light Out"));
        assert_eq!(rec.user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn falsy_values_count_as_absent() {
        let rec = record(json!({
            "title": "",
            "body": null,
            "userId": 0,
            "appName": false,
        }));
        assert!(rec.title().is_none());
        assert!(rec.body().is_none());
        assert!(rec.user_id().is_none());
        assert_eq!(rec.app_name(), DEFAULT_APP_NAME);
    }

    #[test]
    fn non_string_values_render_as_json_text() {
        let rec = record(json!({"userId": 42, "title": true, "body": ["a", "b"]}));
        assert_eq!(rec.user_id().as_deref(), Some("42"));
        assert_eq!(rec.title().as_deref(), Some("true"));
        assert_eq!(rec.body().as_deref(), Some(r#"["a","b"]"#));
    }

    #[test]
    fn body_falls_back_to_message() {
        let rec = record(json!({"message": "Bulb flicker"}));
        assert_eq!(rec.body().as_deref(), Some("Bulb flicker"));

        let both = record(json!({"body": "primary", "message": "secondary"}));
        assert_eq!(both.body().as_deref(), Some("primary"));

        let empty_body = record(json!({"body": "", "message": "secondary"}));
        assert_eq!(empty_body.body().as_deref(), Some("secondary"));
    }

    #[test]
    fn light_name_prefers_light_name_then_name() {
        assert_eq!(
            record(json!({"lightName": "L-42", "name": "other"})).light_name(),
            "L-42"
        );
        assert_eq!(record(json!({"name": "Pole 7"})).light_name(), "Pole 7");
        assert_eq!(record(json!({})).light_name(), "");
    }

    #[test]
    fn app_name_uses_record_value_when_present() {
        assert_eq!(record(json!({"appName": "Lumen"})).app_name(), "Lumen");
    }
}
