//! WebSocket organizer sessions
//!
//! Each connection owns one roster. Participants are added one at a time,
//! `assign` commits a fresh assignment and then notifies everyone.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::assign::assign;
use crate::error::AppError;
use crate::models::{DeliveryReport, Participant};
use crate::notifier::notify_all;
use crate::roster::Roster;
use crate::AppState;

/// WebSocket handler
pub async fn handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection state
struct Session {
    id: Uuid,
    roster: Roster,
    rng: ChaCha8Rng,
}

impl Session {
    fn new(seed: Option<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            roster: Roster::new(),
            rng: seed
                .map(ChaCha8Rng::seed_from_u64)
                .unwrap_or_else(ChaCha8Rng::from_entropy),
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = Session::new(state.seed);
    tracing::debug!("Session {} opened", session.id);

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        };

        let client_msg: ClientMessage = match serde_json::from_str(&msg) {
            Ok(m) => m,
            Err(e) => {
                let error = ServerMessage::Error {
                    kind: "invalid_message".to_string(),
                    message: format!("Invalid message: {}", e),
                };
                if send(&mut sender, &error).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let delivered = match client_msg {
            ClientMessage::AddParticipant { name, phone } => {
                let reply = match session.roster.add_participant(&name, &phone) {
                    Ok(participant) => ServerMessage::ParticipantAdded {
                        participant: participant.clone(),
                    },
                    Err(e) => ServerMessage::from(e),
                };
                send(&mut sender, &reply).await
            }
            ClientMessage::ListParticipants => {
                let reply = ServerMessage::Participants {
                    participants: session.roster.participants().to_vec(),
                };
                send(&mut sender, &reply).await
            }
            ClientMessage::Assign => handle_assign(&mut sender, &mut session, &state).await,
        };

        if delivered.is_err() {
            break;
        }
    }

    tracing::debug!("Session {} closed", session.id);
}

/// Commit a new assignment, report it, then notify each participant.
async fn handle_assign(
    sender: &mut SplitSink<WebSocket, Message>,
    session: &mut Session,
    state: &Arc<AppState>,
) -> Result<(), axum::Error> {
    let assigned = match assign(&session.roster, &mut session.rng) {
        Ok(assigned) => assigned,
        Err(e) => return send(sender, &ServerMessage::from(e)).await,
    };

    session.roster = assigned;
    tracing::info!(
        "Session {} assigned {} participants",
        session.id,
        session.roster.len()
    );

    send(
        sender,
        &ServerMessage::Assigned {
            participants: session.roster.participants().to_vec(),
        },
    )
    .await?;

    let report = notify_all(&session.roster, state.notifier.as_ref()).await;
    send(sender, &ServerMessage::DeliveryReport { report }).await
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(json)).await.map_err(|e| {
        tracing::error!("Failed to send message: {}", e);
        e
    })
}

/// Messages from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Register a participant
    AddParticipant { name: String, phone: String },
    /// Current roster
    ListParticipants,
    /// Assign Secret Santas and send notifications
    Assign,
}

/// Messages from server to client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ParticipantAdded { participant: Participant },
    Participants { participants: Vec<Participant> },
    /// Assignment committed; notifications follow
    Assigned { participants: Vec<Participant> },
    DeliveryReport { report: DeliveryReport },
    Error { kind: String, message: String },
}

impl From<AppError> for ServerMessage {
    fn from(e: AppError) -> Self {
        ServerMessage::Error {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}
