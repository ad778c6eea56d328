//! Push transports.
//!
//! [`fcm`] publishes to Firebase Cloud Messaging topics; [`log`] only logs
//! and is used when no FCM credentials are configured.

pub mod auth;
pub mod fcm;
pub mod log;
