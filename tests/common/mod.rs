//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use santa::error::{AppError, Result};
use santa::models::SmsReceipt;
use santa::notifier::Notifier;
use std::sync::Mutex;

/// Records every send; numbers listed in `failing` are rejected
#[derive(Default)]
pub struct RecordingNotifier {
    failing: Vec<String>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn failing(phones: &[&str]) -> Self {
        Self {
            failing: phones.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));

        if self.failing.iter().any(|p| p == to) {
            return Err(AppError::Provider(format!("Cannot deliver to {}", to)));
        }

        Ok(SmsReceipt::from_provider(serde_json::json!({
            "sid": format!("SM{}", to.trim_start_matches('+')),
            "status": "queued",
            "to": to,
            "body": body,
        })))
    }
}
