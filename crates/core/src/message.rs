//! Push message derivation.
//!
//! [`PushMessage::from_record`] turns a [`NotificationRecord`] into the
//! title, body and flat string attribute map that push backends accept,
//! plus the fixed per-platform delivery hints.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::channels::{
    ANDROID_CHANNEL_ID, APNS_CATEGORY, ATTR_APP_NAME, ATTR_DOC_ID, ATTR_LIGHT_NAME,
    ATTR_NOTIFICATION_ID, ATTR_NOTIFICATION_ID_SNAKE, DEFAULT_SOUND,
};
use crate::record::NotificationRecord;

// ---------------------------------------------------------------------------
// Platform hints
// ---------------------------------------------------------------------------

/// Delivery priority requested from the platform push service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPriority {
    Normal,
    High,
}

/// Android-specific delivery metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidHints {
    pub priority: DeliveryPriority,
    pub channel_id: &'static str,
    pub default_sound: bool,
}

/// APNs-specific delivery metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsHints {
    pub sound: &'static str,
    /// Wakes the app in the background so it can refresh its alert list.
    pub content_available: bool,
    pub category: &'static str,
}

/// Metadata interpreted by the client OS, not by the relay.
///
/// These are not configurable: every alert is high priority, posted to the
/// street-lights channel with the default sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformHints {
    pub android: AndroidHints,
    pub apns: ApnsHints,
}

impl Default for PlatformHints {
    fn default() -> Self {
        Self {
            android: AndroidHints {
                priority: DeliveryPriority::High,
                channel_id: ANDROID_CHANNEL_ID,
                default_sound: true,
            },
            apns: ApnsHints {
                sound: DEFAULT_SOUND,
                content_available: true,
                category: APNS_CATEGORY,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PushMessage
// ---------------------------------------------------------------------------

/// A push message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Never empty: falls back to the app name.
    pub title: String,
    /// May be empty.
    pub body: String,
    /// Data payload. Push backends only accept string values.
    pub attributes: BTreeMap<String, String>,
    pub hints: PlatformHints,
}

impl PushMessage {
    /// Derive the message for the record stored under `record_id`.
    pub fn from_record(record: &NotificationRecord, record_id: &str) -> Self {
        let app_name = record.app_name();
        let title = record.title().unwrap_or_else(|| app_name.clone());
        let body = record.body().unwrap_or_default();

        Self {
            title,
            body,
            attributes: build_attributes(record, record_id, app_name),
            hints: PlatformHints::default(),
        }
    }
}

/// Copy every record field into a string map, then inject the id and
/// display-name keys on top.
fn build_attributes(
    record: &NotificationRecord,
    record_id: &str,
    app_name: String,
) -> BTreeMap<String, String> {
    let mut attributes: BTreeMap<String, String> = record
        .fields()
        .iter()
        .map(|(key, value)| (key.clone(), attribute_text(value)))
        .collect();

    for key in [ATTR_NOTIFICATION_ID, ATTR_NOTIFICATION_ID_SNAKE, ATTR_DOC_ID] {
        attributes.insert(key.to_string(), record_id.to_string());
    }
    attributes.insert(ATTR_APP_NAME.to_string(), app_name);
    attributes.insert(ATTR_LIGHT_NAME.to_string(), record.light_name());

    attributes
}

/// String form of an attribute value.
///
/// Strings pass through untouched; everything else is encoded as compact
/// JSON, falling back to the value's display text if encoding fails.
pub fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Attribute value not encodable, using display text");
            other.to_string()
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::channels::DEFAULT_APP_NAME;

    fn record(value: Value) -> NotificationRecord {
        serde_json::from_value(value).expect("test record must be a JSON object")
    }

    #[test]
    fn title_and_body_come_from_record() {
        let msg = PushMessage::from_record(
            &record(json!({"title": "Light Out", "body": "Pole 12 is dark"})),
            "d1",
        );
        assert_eq!(msg.title, "Light Out");
        assert_eq!(msg.body, "Pole 12 is dark");
    }

    #[test]
    fn missing_title_uses_app_name() {
        let msg = PushMessage::from_record(&record(json!({"appName": "Lumen"})), "d1");
        assert_eq!(msg.title, "Lumen");

        let msg = PushMessage::from_record(&record(json!({})), "d1");
        assert_eq!(msg.title, DEFAULT_APP_NAME);
        assert_eq!(msg.body, "");
    }

    #[test]
    fn id_keys_are_all_the_record_id() {
        let msg = PushMessage::from_record(&record(json!({"docId": "spoofed"})), "abc123");
        assert_eq!(msg.attributes["notificationId"], "abc123");
        assert_eq!(msg.attributes["notification_id"], "abc123");
        assert_eq!(msg.attributes["docId"], "abc123");
    }

    #[test]
    fn every_field_is_copied_as_a_string() {
        let msg = PushMessage::from_record(
            &record(json!({
                "title": "X",
                "severity": 3,
                "acknowledged": false,
                "cleared": null,
                "extra": {"a": 1},
                "tags": ["power", "grid"],
            })),
            "d3",
        );
        assert_eq!(msg.attributes["title"], "X");
        assert_eq!(msg.attributes["severity"], "3");
        assert_eq!(msg.attributes["acknowledged"], "false");
        assert_eq!(msg.attributes["cleared"], "null");
        assert_eq!(msg.attributes["extra"], r#"{"a":1}"#);
        assert_eq!(msg.attributes["tags"], r#"["power","grid"]"#);
    }

    #[test]
    fn display_names_are_normalized() {
        let msg = PushMessage::from_record(&record(json!({"name": "Pole 7"})), "d1");
        assert_eq!(msg.attributes["appName"], DEFAULT_APP_NAME);
        assert_eq!(msg.attributes["lightName"], "Pole 7");

        let msg = PushMessage::from_record(&record(json!({})), "d1");
        assert_eq!(msg.attributes["lightName"], "");
    }

    #[test]
    fn nested_objects_keep_field_order() {
        let msg = PushMessage::from_record(&record(json!({"geo": {"lng": 2, "lat": 1}})), "d1");
        assert_eq!(msg.attributes["geo"], r#"{"lng":2,"lat":1}"#);
    }

    #[test]
    fn hints_are_fixed() {
        let msg = PushMessage::from_record(&record(json!({})), "d1");
        assert_eq!(msg.hints.android.priority, DeliveryPriority::High);
        assert_eq!(msg.hints.android.channel_id, "street_lights_channel");
        assert!(msg.hints.android.default_sound);
        assert_eq!(msg.hints.apns.sound, "default");
        assert!(msg.hints.apns.content_available);
        assert_eq!(msg.hints.apns.category, "STREET_LIGHTS");
    }

    #[test]
    fn attribute_text_passes_strings_through() {
        assert_eq!(attribute_text(&json!("plain")), "plain");
        assert_eq!(attribute_text(&json!(1.5)), "1.5");
    }
}
