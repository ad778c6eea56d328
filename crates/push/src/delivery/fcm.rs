//! Firebase Cloud Messaging delivery over the HTTP v1 API.
//!
//! [`FcmDelivery`] publishes a [`PushMessage`] to an FCM topic with a single
//! `messages:send` request. There is no retry here: a failed send is
//! reported to the caller once and dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use streetlight_core::target::is_valid_topic_name;
use streetlight_core::{DeliveryPriority, PushMessage};

use crate::delivery::auth::{ServiceAccountKey, ServiceAccountTokens, TokenSource};
use crate::transport::{PushTransport, SendReceipt, TransportError};

/// Production FCM endpoint.
const DEFAULT_API_BASE: &str = "https://fcm.googleapis.com";

/// HTTP request timeout for a single send.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// FcmConfig
// ---------------------------------------------------------------------------

/// How the relay authenticates against FCM.
#[derive(Clone)]
pub enum FcmCredentials {
    /// A ready-made OAuth2 bearer token.
    AccessToken(String),
    /// Path to a service-account JSON key.
    ServiceAccountFile(PathBuf),
}

impl fmt::Debug for FcmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FcmCredentials::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            FcmCredentials::ServiceAccountFile(path) => {
                f.debug_tuple("ServiceAccountFile").field(path).finish()
            }
        }
    }
}

/// Configuration for the FCM transport.
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Firebase project; defaults to the service-account key's project.
    pub project_id: Option<String>,
    pub credentials: FcmCredentials,
    /// Base URL of the FCM API (overridable for emulators and tests).
    pub api_base: String,
    pub request_timeout: Duration,
}

impl FcmConfig {
    /// Build a config around `credentials` with production defaults.
    pub fn new(credentials: FcmCredentials) -> Self {
        Self {
            project_id: None,
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` if neither credential variable is set, signalling that
    /// FCM delivery is not configured.
    ///
    /// | Variable                         | Required | Default                      |
    /// |----------------------------------|----------|------------------------------|
    /// | `FCM_ACCESS_TOKEN`               | one of   | -                            |
    /// | `GOOGLE_APPLICATION_CREDENTIALS` | one of   | -                            |
    /// | `FCM_PROJECT_ID`                 | no       | key's `project_id`           |
    /// | `FCM_API_BASE`                   | no       | `https://fcm.googleapis.com` |
    /// | `FCM_REQUEST_TIMEOUT_SECS`       | no       | `10`                         |
    pub fn from_env() -> Option<Self> {
        let credentials = match std::env::var("FCM_ACCESS_TOKEN") {
            Ok(token) if !token.is_empty() => FcmCredentials::AccessToken(token),
            _ => FcmCredentials::ServiceAccountFile(
                std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok()?.into(),
            ),
        };

        Some(Self {
            project_id: std::env::var("FCM_PROJECT_ID").ok(),
            credentials,
            api_base: std::env::var("FCM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(
                std::env::var("FCM_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    topic: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
    android: AndroidConfig<'a>,
    apns: ApnsConfig<'a>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct AndroidConfig<'a> {
    priority: DeliveryPriority,
    notification: AndroidNotification<'a>,
}

#[derive(Serialize)]
struct AndroidNotification<'a> {
    channel_id: &'a str,
    default_sound: bool,
}

#[derive(Serialize)]
struct ApnsConfig<'a> {
    payload: ApnsPayload<'a>,
}

#[derive(Serialize)]
struct ApnsPayload<'a> {
    aps: Aps<'a>,
}

#[derive(Serialize)]
struct Aps<'a> {
    sound: &'a str,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    content_available: Option<u8>,
    category: &'a str,
}

impl<'a> SendRequest<'a> {
    fn new(topic: &'a str, message: &'a PushMessage) -> Self {
        let hints = &message.hints;
        Self {
            message: FcmMessage {
                topic,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.attributes,
                android: AndroidConfig {
                    priority: hints.android.priority,
                    notification: AndroidNotification {
                        channel_id: hints.android.channel_id,
                        default_sound: hints.android.default_sound,
                    },
                },
                apns: ApnsConfig {
                    payload: ApnsPayload {
                        aps: Aps {
                            sound: hints.apns.sound,
                            content_available: hints.apns.content_available.then_some(1),
                            category: hints.apns.category,
                        },
                    },
                },
            },
        }
    }
}

#[derive(Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Human-readable reason from a non-2xx response body.
fn rejection_message(raw: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(ErrorEnvelope {
            error: ErrorBody {
                message,
                status: Some(status),
            },
        }) => format!("{status}: {message}"),
        Ok(envelope) => envelope.error.message,
        Err(_) if raw.trim().is_empty() => "empty response body".to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// FcmDelivery
// ---------------------------------------------------------------------------

/// Publishes push messages to FCM topics.
pub struct FcmDelivery {
    client: reqwest::Client,
    tokens: TokenSource,
    project_id: String,
    send_url: String,
}

impl FcmDelivery {
    /// Build the transport, loading and validating credentials.
    pub fn new(config: FcmConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let (tokens, key_project_id) = match config.credentials {
            FcmCredentials::AccessToken(token) => (TokenSource::Static(token), None),
            FcmCredentials::ServiceAccountFile(path) => {
                let key = ServiceAccountKey::from_file(&path)?;
                let project_id = key.project_id.clone();
                let tokens = ServiceAccountTokens::new(key, client.clone())?;
                (TokenSource::ServiceAccount(tokens), project_id)
            }
        };

        let project_id = config.project_id.or(key_project_id).ok_or_else(|| {
            TransportError::Config(
                "FCM_PROJECT_ID is not set and the credentials name no project".to_string(),
            )
        })?;

        let send_url = format!(
            "{}/v1/projects/{project_id}/messages:send",
            config.api_base.trim_end_matches('/')
        );

        Ok(Self {
            client,
            tokens,
            project_id,
            send_url,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl PushTransport for FcmDelivery {
    fn name(&self) -> &'static str {
        "fcm"
    }

    async fn send_to_topic(
        &self,
        topic: &str,
        message: &PushMessage,
    ) -> Result<SendReceipt, TransportError> {
        if !is_valid_topic_name(topic) {
            return Err(TransportError::InvalidTopic(topic.to_string()));
        }

        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&SendRequest::new(topic, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&raw),
            });
        }

        let sent: SendResponse = response.json().await?;
        Ok(SendReceipt {
            message_id: sent.name,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
