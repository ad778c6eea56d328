//! Street-light alert relay: domain model.
//!
//! Turns a freshly created notification record into a push message and
//! picks the topic it is delivered to. Everything here is pure; the
//! transports and the trigger adapter live in `streetlight-push` and
//! `streetlight-api`.

pub mod channels;
pub mod error;
pub mod message;
pub mod record;
pub mod target;

pub use message::{AndroidHints, ApnsHints, DeliveryPriority, PlatformHints, PushMessage};
pub use record::NotificationRecord;
pub use target::DeliveryTarget;
