//! SMS relay endpoint and its client
//!
//! `POST /sms/api` accepts `{phone, message}` and forwards the message to the
//! configured notifier. [`RelayNotifier`] is the matching client, so one
//! organizer can send through another's relay.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::SmsReceipt;
use crate::notifier::Notifier;
use crate::AppState;

pub const MISSING_FIELDS: &str = "Phone and message are required.";

/// Relay request body
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SendSmsRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SendSmsRequest {
    pub fn new(phone: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            message: Some(message.into()),
        }
    }

    /// Both fields, or a client error if either is absent or empty
    fn required_fields(&self) -> Result<(&str, &str)> {
        match (self.phone.as_deref(), self.message.as_deref()) {
            (Some(phone), Some(message)) if !phone.is_empty() && !message.is_empty() => {
                Ok((phone, message))
            }
            _ => Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
        }
    }
}

/// Relay response body. Error responses carry `error` and no `result`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendSmsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /sms/api`
pub async fn send_sms(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SendSmsResponse>> {
    let request: SendSmsRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
    let (phone, message) = request.required_fields()?;

    let receipt = state.notifier.send(phone, message).await?;
    tracing::info!("Relayed SMS to {}", phone);

    Ok(Json(SendSmsResponse {
        success: true,
        result: Some(receipt.raw),
        error: None,
    }))
}

/// Notifier that posts to a remote `/sms/api` relay
pub struct RelayNotifier {
    client: Client,
    url: String,
}

impl RelayNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        let response = self
            .client
            .post(&self.url)
            .json(&SendSmsRequest::new(to, body))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let parsed: SendSmsResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::Provider(format!("Unexpected relay response ({}): {}", status, e))
        })?;

        // A body without `success: true` is a failure whatever the status code says
        if !parsed.success {
            return Err(AppError::Provider(
                parsed
                    .error
                    .unwrap_or_else(|| format!("Relay responded with {}", status)),
            ));
        }

        Ok(SmsReceipt::from_provider(
            parsed.result.unwrap_or(serde_json::Value::Null),
        ))
    }
}
