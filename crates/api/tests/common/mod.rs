#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use streetlight_api::config::ServerConfig;
use streetlight_api::router::build_app_router;
use streetlight_api::state::AppState;
use streetlight_core::PushMessage;
use streetlight_push::{NotificationDispatcher, PushTransport, SendReceipt, TransportError};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        shutdown_timeout_secs: 10,
    }
}

/// Build the full application router around `transport`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(transport: Arc<dyn PushTransport>) -> Router {
    build_test_app_with_config(transport, &test_config())
}

pub fn build_test_app_with_config(
    transport: Arc<dyn PushTransport>,
    config: &ServerConfig,
) -> Router {
    let state = AppState {
        dispatcher: NotificationDispatcher::new(transport),
    };
    build_app_router(state, config)
}

// ---------------------------------------------------------------------------
// Transports
// ---------------------------------------------------------------------------

/// Records every send; fails them all when built with [`Self::failing`].
#[derive(Default)]
pub struct RecordingTransport {
    sends: Mutex<Vec<(String, PushMessage)>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sends(&self) -> Vec<(String, PushMessage)> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send_to_topic(
        &self,
        topic: &str,
        message: &PushMessage,
    ) -> Result<SendReceipt, TransportError> {
        self.sends
            .lock()
            .unwrap()
            .push((topic.to_string(), message.clone()));

        if self.fail {
            return Err(TransportError::Rejected {
                status: 429,
                message: "RESOURCE_EXHAUSTED: quota exceeded".to_string(),
            });
        }
        Ok(SendReceipt {
            message_id: "projects/demo/messages/1".to_string(),
        })
    }
}

/// Accepts every send after a fixed delay.
pub struct SlowTransport {
    pub delay: Duration,
}

#[async_trait]
impl PushTransport for SlowTransport {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn send_to_topic(
        &self,
        _topic: &str,
        _message: &PushMessage,
    ) -> Result<SendReceipt, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(SendReceipt {
            message_id: "projects/demo/messages/slow".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
