//! Firebase Cloud Messaging HTTP v1 gateway.
//!
//! FCM v1 has no multicast endpoint, so one multicast call fans the batch out
//! into individual `messages:send` requests with bounded concurrency. Results
//! come back in token order.

use crate::adapters::credentials::Credentials;
use crate::core::{GatewaySettings, MessagingGateway, MulticastMessage, MulticastResponse, SendResponse};
use crate::domain::identifiers::Token;
use crate::utils::error::{PushError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FcmGateway {
    client: Client,
    send_url: String,
    credentials: Credentials,
    concurrency: usize,
}

impl FcmGateway {
    /// Resolves credentials from the settings. The project id falls back to
    /// the one named in the credentials.
    pub async fn connect(settings: &impl GatewaySettings) -> Result<Self> {
        let credentials = Credentials::from_settings(settings).await?;

        let project_id = match settings.project_id().trim() {
            "" => credentials
                .project_id()
                .await
                .ok_or_else(|| PushError::MissingConfigError {
                    field: "gateway.project_id".to_string(),
                })?,
            id => id.to_string(),
        };

        Self::build(settings, &project_id, credentials)
    }

    pub fn new(settings: &impl GatewaySettings, credentials: Credentials) -> Result<Self> {
        Self::build(settings, settings.project_id().trim(), credentials)
    }

    fn build(settings: &impl GatewaySettings, project_id: &str, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                settings.endpoint().trim_end_matches('/'),
                project_id
            ),
            credentials,
            concurrency: settings.concurrency().max(1),
        })
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    async fn send_one(
        &self,
        token: &Token,
        message: &MulticastMessage<'_>,
        bearer: &str,
    ) -> Result<SendResponse> {
        let notification = message.notification;
        let icon = notification.icon.as_deref().map(|icon| IconPayload { icon });
        let body = SendRequest {
            message: MessagePayload {
                token: token.as_str(),
                notification: NotificationPayload {
                    title: &notification.title,
                    body: &notification.body,
                },
                data: message.data,
                webpush: icon.map(|notification| PlatformPayload { notification }),
                android: icon.map(|notification| PlatformPayload { notification }),
            },
        };

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let sent: SendResult = response.json().await?;
            return Ok(SendResponse::delivered(sent.name));
        }

        // error bodies are best effort, the status alone is enough
        let text = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &text);

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(PushError::gateway(format!(
                "authentication failed (HTTP {}): {}",
                status.as_u16(),
                detail
            )));
        }

        Ok(SendResponse::failed(detail))
    }
}

#[async_trait]
impl MessagingGateway for FcmGateway {
    async fn send_multicast(&self, message: &MulticastMessage<'_>) -> Result<MulticastResponse> {
        tracing::debug!(
            token_count = message.tokens.len(),
            concurrency = self.concurrency,
            "📤 Sending FCM multicast"
        );

        // one token lookup per batch, the provider handles renewal
        let bearer = self.credentials.bearer().await?;

        // futures are built up front so the stream type carries no
        // higher-ranked closure, which trips the Send check under async_trait
        let sends: Vec<_> = message
            .tokens
            .iter()
            .map(|token| self.send_one(token, message, &bearer))
            .collect();

        let responses: Vec<SendResponse> = stream::iter(sends)
            .buffered(self.concurrency)
            .try_collect()
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, token_count = message.tokens.len(), "❌ FCM multicast send failed");
            })?;

        Ok(MulticastResponse::from_responses(responses))
    }
}

/// Turns an FCM error body into `ERROR_CODE: message`, falling back to the
/// HTTP status when the body is not the documented shape.
fn error_detail(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let Some(error) = parsed.map(|envelope| envelope.error) else {
        return format!("HTTP {}", status.as_u16());
    };

    let code = error
        .details
        .iter()
        .find_map(|d| d.error_code.clone())
        .or(error.status)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    match error.message {
        Some(message) if !message.is_empty() => format!("{}: {}", code, message),
        _ => code,
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: MessagePayload<'a>,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    token: &'a str,
    notification: NotificationPayload<'a>,
    data: &'a HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webpush: Option<PlatformPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    android: Option<PlatformPayload<'a>>,
}

#[derive(Serialize)]
struct NotificationPayload<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct PlatformPayload<'a> {
    notification: IconPayload<'a>,
}

#[derive(Serialize, Clone, Copy)]
struct IconPayload<'a> {
    icon: &'a str,
}

#[derive(Deserialize)]
struct SendResult {
    name: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}
