//! Well-known topic, channel and attribute name constants.
//!
//! Mobile clients subscribe to these topics and read these attribute keys,
//! so the values are part of the contract with the apps.

/// Topic every client subscribes to for alerts without a specific recipient.
pub const BROADCAST_TOPIC: &str = "street_lights_alerts";

/// Prefix of the per-user topic, followed by the user identifier.
pub const USER_TOPIC_PREFIX: &str = "user_";

/// Display name used when a record carries no `appName`.
pub const DEFAULT_APP_NAME: &str = "StreetLight Monitor";

/// Android notification channel the alert is posted to.
pub const ANDROID_CHANNEL_ID: &str = "street_lights_channel";

/// APNs category, lets iOS attach alert-specific actions.
pub const APNS_CATEGORY: &str = "STREET_LIGHTS";

/// Platform sound name for the system default sound.
pub const DEFAULT_SOUND: &str = "default";

/// Datastore collection whose document creations trigger a push.
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

// Record fields read during derivation.
pub const FIELD_TITLE: &str = "title";
pub const FIELD_BODY: &str = "body";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_USER_ID: &str = "userId";
pub const FIELD_NAME: &str = "name";

// Attribute keys injected into every message. Clients dedupe on the ids.
pub const ATTR_NOTIFICATION_ID: &str = "notificationId";
pub const ATTR_NOTIFICATION_ID_SNAKE: &str = "notification_id";
pub const ATTR_DOC_ID: &str = "docId";
pub const ATTR_APP_NAME: &str = "appName";
pub const ATTR_LIGHT_NAME: &str = "lightName";
