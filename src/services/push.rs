// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push notification dispatch.
//!
//! [`PushDispatcher`] is the only way the jobs reach a device. The production
//! implementation talks to the Firebase Cloud Messaging HTTP v1 API; the
//! log-only implementation is used when no service-account key is
//! configured.

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Google access tokens live for an hour; refresh well before that.
const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

/// What a user sees, plus the key/value data handed to the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl PushPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl ToString) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    /// Value of a data entry, if present.
    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// Errors from a single dispatch attempt.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("FCM API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Best-effort delivery of one message to one device.
#[async_trait]
pub trait PushDispatcher: Send + Sync {
    /// Send `payload` to the device registered under `token`.
    ///
    /// Returns the provider's message ID.
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<String, PushError>;
}

// ─── FCM ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    message: Message<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: Notification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    /// "projects/{project_id}/messages/{message_id}"
    name: String,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Firebase Cloud Messaging HTTP v1 client.
pub struct FcmDispatcher {
    http_client: reqwest::Client,
    send_url: String,
    service_account_key: yup_oauth2::ServiceAccountKey,
    access_token: Mutex<Option<CachedToken>>,
}

impl FcmDispatcher {
    /// Create a dispatcher from a service-account key file.
    pub async fn from_key_file(project_id: &str, key_path: &str) -> anyhow::Result<Self> {
        let service_account_key = yup_oauth2::read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| anyhow::anyhow!("failed reading FCM service account key: {}", e))?;

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        tracing::info!(project = project_id, "Initialized FCM dispatcher");

        Ok(Self {
            http_client,
            send_url: format!(
                "https://fcm.googleapis.com/v1/projects/{}/messages:send",
                project_id
            ),
            service_account_key,
            access_token: Mutex::new(None),
        })
    }

    /// Get a cached OAuth2 access token or mint a new one.
    async fn access_token(&self) -> Result<String, PushError> {
        let mut cached = self.access_token.lock().await;
        if let Some(entry) = cached.as_ref() {
            if entry.expires_at > Instant::now() {
                return Ok(entry.token.clone());
            }
        }

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(self.service_account_key.clone())
            .build()
            .await
            .map_err(|e| PushError::Auth(e.to_string()))?;

        let access_token = auth
            .token(&[FCM_SCOPE])
            .await
            .map_err(|e| PushError::Auth(e.to_string()))?;

        let token = access_token
            .token()
            .ok_or_else(|| PushError::Auth("No token available".to_string()))?
            .to_string();

        *cached = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + ACCESS_TOKEN_TTL,
        });

        Ok(token)
    }
}

#[async_trait]
impl PushDispatcher for FcmDispatcher {
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<String, PushError> {
        let bearer = self.access_token().await?;

        let message = FcmMessage {
            message: Message {
                token,
                notification: Notification {
                    title: &payload.title,
                    body: &payload.body,
                },
                data: &payload.data,
            },
        };

        let response = self
            .http_client
            .post(&self.send_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let fcm_response: FcmResponse = response.json().await?;
        Ok(fcm_response.name)
    }
}

// ─── Log only ────────────────────────────────────────────────────

/// Dispatcher that only logs, for local development without FCM credentials.
#[derive(Debug, Default)]
pub struct LogOnlyDispatcher;

#[async_trait]
impl PushDispatcher for LogOnlyDispatcher {
    async fn send(&self, _token: &str, payload: &PushPayload) -> Result<String, PushError> {
        tracing::info!(
            title = %payload.title,
            body = %payload.body,
            data = ?payload.data,
            "Push dispatch skipped (log-only dispatcher)"
        );
        Ok("log-only".to_string())
    }
}
