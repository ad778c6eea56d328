//! Record-to-push dispatch.
//!
//! [`NotificationDispatcher`] handles one newly created record per call:
//! derive the message, pick the topic, send once, report. Transport errors
//! are logged and folded into the [`DispatchResult`]; nothing propagates, so
//! the triggering event is always acknowledged and never redelivered because
//! of a failed send.

use std::sync::Arc;

use streetlight_core::{DeliveryTarget, NotificationRecord, PushMessage};

use crate::transport::{PushTransport, SendReceipt, TransportError};

/// Outcome of dispatching one record.
#[derive(Debug)]
pub struct DispatchResult {
    pub record_id: String,
    pub target: DeliveryTarget,
    pub outcome: Result<SendReceipt, TransportError>,
}

impl DispatchResult {
    /// Whether the transport accepted the message.
    pub fn sent(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn topic(&self) -> String {
        self.target.topic()
    }
}

/// Relays new notification records to a [`PushTransport`].
///
/// Holds no per-record state; one dispatcher serves any number of concurrent
/// invocations.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn PushTransport>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Push the record stored under `record_id` to its topic.
    ///
    /// Duplicate invocations for the same record send duplicate pushes;
    /// clients dedupe on the `notificationId` attribute.
    pub async fn dispatch(&self, record: &NotificationRecord, record_id: &str) -> DispatchResult {
        let message = PushMessage::from_record(record, record_id);
        let target = DeliveryTarget::select(record);
        let topic = target.topic();

        match &target {
            DeliveryTarget::PerUser(_) => {
                tracing::info!(doc_id = record_id, %topic, "Sending notification to user topic");
            }
            DeliveryTarget::Broadcast => {
                tracing::info!(doc_id = record_id, %topic, "No userId, sending notification to broadcast topic");
            }
        }

        let outcome = self.transport.send_to_topic(&topic, &message).await;

        match &outcome {
            Ok(receipt) => {
                tracing::info!(
                    doc_id = record_id,
                    %topic,
                    transport = self.transport.name(),
                    message_id = %receipt.message_id,
                    "Push send accepted"
                );
            }
            Err(e) => {
                tracing::error!(
                    doc_id = record_id,
                    %topic,
                    transport = self.transport.name(),
                    error = %e,
                    "Push send failed"
                );
            }
        }

        DispatchResult {
            record_id: record_id.to_string(),
            target,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct Rejecting;

    #[async_trait]
    impl PushTransport for Rejecting {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        async fn send_to_topic(
            &self,
            _topic: &str,
            _message: &PushMessage,
        ) -> Result<SendReceipt, TransportError> {
            Err(TransportError::Rejected {
                status: 503,
                message: "UNAVAILABLE".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn failure_is_folded_into_result() {
        let dispatcher = NotificationDispatcher::new(Arc::new(Rejecting));
        let record: NotificationRecord =
            serde_json::from_value(json!({"title": "Light Out", "userId": "u1"})).unwrap();

        let result = dispatcher.dispatch(&record, "d1").await;

        assert!(!result.sent());
        assert_eq!(result.record_id, "d1");
        assert_eq!(result.topic(), "user_u1");
        assert!(matches!(
            result.outcome,
            Err(TransportError::Rejected { status: 503, .. })
        ));
    }

    #[test]
    fn transport_name_is_exposed() {
        let dispatcher = NotificationDispatcher::new(Arc::new(Rejecting));
        assert_eq!(dispatcher.transport_name(), "rejecting");
    }
}
