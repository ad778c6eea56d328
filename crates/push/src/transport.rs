//! The outbound push seam.

use async_trait::async_trait;
use serde::Serialize;
use streetlight_core::PushMessage;

use crate::delivery::auth::AuthError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a failed topic send.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The topic name contains characters the push service rejects.
    #[error("Invalid topic name: {0}")]
    InvalidTopic(String),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The push service answered with a non-2xx status.
    #[error("Push service returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// No access token could be obtained.
    #[error("Push authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The transport is misconfigured.
    #[error("Push transport misconfigured: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// PushTransport
// ---------------------------------------------------------------------------

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    /// Provider-assigned message name, e.g. `projects/p/messages/123`.
    pub message_id: String,
}

/// A push backend that publishes to named topics.
///
/// Subscriptions are managed by the clients; a transport only publishes.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Publish `message` to every device subscribed to `topic`.
    async fn send_to_topic(
        &self,
        topic: &str,
        message: &PushMessage,
    ) -> Result<SendReceipt, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_includes_status_and_message() {
        let err = TransportError::Rejected {
            status: 404,
            message: "Requested entity was not found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Push service returned HTTP 404: Requested entity was not found."
        );
    }

    #[test]
    fn invalid_topic_display() {
        let err = TransportError::InvalidTopic("user_a b".to_string());
        assert_eq!(err.to_string(), "Invalid topic name: user_a b");
    }

    #[test]
    fn request_error_display() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = TransportError::Request(req_err);
        assert!(err.to_string().contains("Push request failed"));
    }
}
