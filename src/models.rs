//! Data models for participants and notification outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered gift-exchange participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub phone: String,
    /// Name of the person this participant gives a gift to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            assigned_to: None,
        }
    }
}

/// Receipt returned by the SMS provider for an accepted message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Provider payload as received
    pub raw: serde_json::Value,
}

impl SmsReceipt {
    /// Wrap a provider message resource, lifting out `sid` and `status`
    pub fn from_provider(raw: serde_json::Value) -> Self {
        let field = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            sid: field("sid"),
            status: field("status"),
            raw,
        }
    }
}

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent { receipt: SmsReceipt },
    Failed { error: String },
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent { .. })
    }
}

/// One participant's notification attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub outcome: DeliveryOutcome,
    pub attempted_at: DateTime<Utc>,
}

/// Per-recipient outcomes of a notification batch, in roster order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub deliveries: Vec<Delivery>,
}

impl DeliveryReport {
    pub fn sent_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.outcome.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.deliveries.len() - self.sent_count()
    }

    pub fn all_sent(&self) -> bool {
        self.failed_count() == 0
    }

    /// Deliveries that did not go through
    pub fn failures(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(|d| !d.outcome.is_sent())
    }
}
