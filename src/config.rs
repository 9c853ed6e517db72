//! Server configuration, read from flags or the environment

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::notifier::{DryRunNotifier, Notifier};
use crate::relay::RelayNotifier;
use crate::twilio::{self, TwilioCredentials, TwilioNotifier};

#[derive(Parser, Clone)]
#[command(name = "santa")]
#[command(about = "Secret Santa organizer server")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SANTA_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Twilio account SID
    #[arg(long, env = "TWILIO_ACCOUNT_SID", hide_env_values = true)]
    pub twilio_account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub twilio_auth_token: Option<String>,

    /// Sender phone number
    #[arg(long, env = "TWILIO_PHONE_NUMBER")]
    pub twilio_phone_number: Option<String>,

    /// Twilio API base URL
    #[arg(long, env = "TWILIO_API_URL", default_value = twilio::DEFAULT_API_URL)]
    pub twilio_api_url: String,

    /// Forward messages to another relay's /sms/api instead of Twilio
    #[arg(long, env = "SMS_RELAY_URL")]
    pub sms_relay_url: Option<String>,

    /// Seed for assignment shuffles (random when unset)
    #[arg(long, env = "SANTA_SEED")]
    pub seed: Option<u64>,
}

impl Config {
    /// Twilio credentials if all three values are set.
    ///
    /// Empty values count as unset. Setting only some of them is an error.
    pub fn twilio_credentials(&self) -> Result<Option<TwilioCredentials>> {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        match (
            non_empty(&self.twilio_account_sid),
            non_empty(&self.twilio_auth_token),
            non_empty(&self.twilio_phone_number),
        ) {
            (Some(account_sid), Some(auth_token), Some(from)) => Ok(Some(TwilioCredentials {
                account_sid,
                auth_token,
                from,
            })),
            (None, None, None) => Ok(None),
            _ => Err(AppError::Config(
                "TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_PHONE_NUMBER must be set together"
                    .to_string(),
            )),
        }
    }

    /// Which notifier to build: Twilio, then a remote relay, then dry run
    pub fn notifier_kind(&self) -> Result<NotifierKind> {
        if let Some(credentials) = self.twilio_credentials()? {
            return Ok(NotifierKind::Twilio(credentials));
        }

        match self.sms_relay_url.as_ref().filter(|u| !u.is_empty()) {
            Some(url) => Ok(NotifierKind::Relay(url.clone())),
            None => Ok(NotifierKind::DryRun),
        }
    }

    pub fn notifier(&self) -> Result<Arc<dyn Notifier>> {
        let notifier: Arc<dyn Notifier> = match self.notifier_kind()? {
            NotifierKind::Twilio(credentials) => {
                tracing::info!(
                    "Sending SMS through Twilio as {} ({})",
                    credentials.from,
                    self.twilio_api_url
                );
                Arc::new(TwilioNotifier::new(self.twilio_api_url.clone(), credentials))
            }
            NotifierKind::Relay(url) => {
                tracing::info!("Forwarding SMS to relay at {}", url);
                Arc::new(RelayNotifier::new(url))
            }
            NotifierKind::DryRun => {
                tracing::warn!("No SMS provider configured, messages will only be logged");
                Arc::new(DryRunNotifier)
            }
        };
        Ok(notifier)
    }
}

/// Notifier selected from configuration
#[derive(Debug, Clone)]
pub enum NotifierKind {
    Twilio(TwilioCredentials),
    /// URL of a remote `/sms/api`
    Relay(String),
    DryRun,
}
