//! Delivery target selection.

use serde::Serialize;

use crate::channels::{BROADCAST_TOPIC, USER_TOPIC_PREFIX};
use crate::record::NotificationRecord;

/// The single topic a record is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum DeliveryTarget {
    /// Only the devices of one user (`user_<id>`).
    PerUser(String),
    /// Every subscribed device (`street_lights_alerts`).
    Broadcast,
}

impl DeliveryTarget {
    /// `PerUser` when the record names a user, otherwise `Broadcast`.
    pub fn select(record: &NotificationRecord) -> Self {
        match record.user_id() {
            Some(user_id) => Self::PerUser(user_id),
            None => Self::Broadcast,
        }
    }

    /// Topic name the transport publishes to.
    pub fn topic(&self) -> String {
        match self {
            Self::PerUser(user_id) => format!("{USER_TOPIC_PREFIX}{user_id}"),
            Self::Broadcast => BROADCAST_TOPIC.to_string(),
        }
    }
}

/// Whether `name` is usable as an FCM topic (`[A-Za-z0-9-_.~%]+`).
pub fn is_valid_topic_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'))
}
