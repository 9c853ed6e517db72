//! Secret Santa organizer - assignment sessions and SMS relay

pub mod assign;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod relay;
pub mod roster;
pub mod twilio;
pub mod websocket;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::notifier::Notifier;

/// Application state shared across handlers
pub struct AppState {
    pub notifier: Arc<dyn Notifier>,
    /// Fixed seed for session shuffles, if configured
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Self::with_seed(notifier, None)
    }

    pub fn with_seed(notifier: Arc<dyn Notifier>, seed: Option<u64>) -> Arc<Self> {
        Arc::new(Self { notifier, seed })
    }
}

/// Routes without middleware
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sms/api", post(relay::send_sms))
        .route("/ws", get(websocket::handler))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
