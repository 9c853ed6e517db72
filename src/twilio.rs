//! Twilio SMS client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::SmsReceipt;
use crate::notifier::Notifier;

pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Account credentials and sender number
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// Sends messages through the Twilio Messages API
pub struct TwilioNotifier {
    client: Client,
    base_url: String,
    credentials: TwilioCredentials,
}

impl TwilioNotifier {
    pub fn new(base_url: impl Into<String>, credentials: TwilioCredentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        let params = [
            ("To", to),
            ("From", self.credentials.from.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(error_message(status, &text)));
        }

        let raw: serde_json::Value = response.json().await?;
        let receipt = SmsReceipt::from_provider(raw);
        tracing::debug!("Twilio accepted message {:?} to {}", receipt.sid, to);
        Ok(receipt)
    }
}

/// Twilio's JSON error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    message: String,
}

fn error_message(status: StatusCode, text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            code: Some(code),
            message,
        }) => format!("{} (code {})", message, code),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) => format!("{} - {}", status, text),
    }
}
