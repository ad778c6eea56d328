//! Log-only transport for running the relay without push credentials.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use streetlight_core::PushMessage;

use crate::transport::{PushTransport, SendReceipt, TransportError};

/// Logs every message instead of sending it and reports success.
#[derive(Debug, Default)]
pub struct LogDelivery {
    sent: AtomicU64,
}

impl LogDelivery {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PushTransport for LogDelivery {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send_to_topic(
        &self,
        topic: &str,
        message: &PushMessage,
    ) -> Result<SendReceipt, TransportError> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let payload = serde_json::to_string(message).unwrap_or_default();
        tracing::info!(topic, title = %message.title, payload = %payload, "Push message (log only)");
        Ok(SendReceipt {
            message_id: format!("log-{n}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use streetlight_core::NotificationRecord;

    use super::*;

    #[tokio::test]
    async fn receipts_are_numbered() {
        let delivery = LogDelivery::new();
        let msg = PushMessage::from_record(&NotificationRecord::default(), "d1");

        let first = delivery.send_to_topic("street_lights_alerts", &msg).await.unwrap();
        let second = delivery.send_to_topic("user_u1", &msg).await.unwrap();

        assert_eq!(first.message_id, "log-1");
        assert_eq!(second.message_id, "log-2");
    }
}
