//! Notification relay
//!
//! A [`Notifier`] delivers one text message. [`notify_all`] walks an assigned
//! roster and attempts exactly one delivery per participant, recording each
//! outcome instead of stopping at the first failure.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Delivery, DeliveryOutcome, DeliveryReport, Participant, SmsReceipt};
use crate::roster::Roster;

/// Something that can deliver an SMS
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt>;
}

/// Message text for a participant, or `None` if they have no recipient yet
pub fn compose_message(participant: &Participant) -> Option<String> {
    participant.assigned_to.as_ref().map(|recipient| {
        format!(
            "Hi {}, you are Secret Santa for {}!",
            participant.name, recipient
        )
    })
}

/// Send every participant their assignment, in roster order.
///
/// Sends are sequential and never retried. A failed send is logged and
/// recorded; the remaining participants are still attempted.
pub async fn notify_all(roster: &Roster, notifier: &dyn Notifier) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for participant in roster {
        let attempted_at = Utc::now();
        let outcome = match deliver(participant, notifier).await {
            Ok(receipt) => DeliveryOutcome::Sent { receipt },
            Err(e) => {
                tracing::warn!("{}", e);
                DeliveryOutcome::Failed {
                    error: match e {
                        AppError::Notification { reason, .. } => reason,
                        other => other.to_string(),
                    },
                }
            }
        };

        report.deliveries.push(Delivery {
            name: participant.name.clone(),
            phone: participant.phone.clone(),
            outcome,
            attempted_at,
        });
    }

    tracing::info!(
        "Notifications finished: {} sent, {} failed",
        report.sent_count(),
        report.failed_count()
    );
    report
}

async fn deliver(participant: &Participant, notifier: &dyn Notifier) -> Result<SmsReceipt> {
    let message = compose_message(participant).ok_or_else(|| AppError::Notification {
        phone: participant.phone.clone(),
        reason: format!("{} has no Secret Santa assignment", participant.name),
    })?;

    notifier
        .send(&participant.phone, &message)
        .await
        .map_err(|e| AppError::Notification {
            phone: participant.phone.clone(),
            reason: e.to_string(),
        })
}

/// Logs messages instead of sending them
#[derive(Debug, Default, Clone)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        tracing::info!("[dry run] SMS to {}: {}", to, body);
        Ok(SmsReceipt::from_provider(serde_json::json!({
            "sid": format!("dry-run-{}", Uuid::new_v4()),
            "status": "dry_run",
            "to": to,
            "body": body,
        })))
    }
}
