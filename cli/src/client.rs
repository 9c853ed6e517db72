//! WebSocket client for the organizer server

use anyhow::{anyhow, Result};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::connect_async;

use crate::messages::{ClientMessage, DeliveryReport, Participant, ServerMessage};

/// One organizer session. The server keeps the roster for as long as the
/// connection stays open.
pub struct SantaClient {
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<ServerMessage>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl SantaClient {
    /// Connect to an organizer server
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::info!("Connecting to {}", url);

        let (ws_stream, _) = connect_async(url).await?;
        let (sink, stream) = ws_stream.split();

        let (out_tx, out_rx) = mpsc::channel::<Message>(32);
        let (in_tx, in_rx) = mpsc::channel::<ServerMessage>(32);

        let writer = tokio::spawn(forward_frames(out_rx, sink));
        let reader = tokio::spawn(decode_frames(stream, in_tx));

        tracing::info!("Connected successfully");

        Ok(Self {
            tx: out_tx,
            rx: in_rx,
            reader,
            writer,
        })
    }

    async fn send(&self, msg: ClientMessage) -> Result<()> {
        let json = serde_json::to_string(&msg)?;
        self.tx
            .send(Message::Text(json))
            .await
            .map_err(|e| anyhow!("Failed to send message: {}", e))
    }

    async fn recv(&mut self) -> Option<ServerMessage> {
        self.rx.recv().await
    }

    /// Register a participant in this session's roster
    pub async fn add_participant(&mut self, name: &str, phone: &str) -> Result<Participant> {
        self.send(ClientMessage::AddParticipant {
            name: name.to_string(),
            phone: phone.to_string(),
        })
        .await?;

        while let Some(msg) = self.recv().await {
            match msg {
                ServerMessage::ParticipantAdded { participant } => return Ok(participant),
                ServerMessage::Error { message, .. } => {
                    return Err(anyhow!("Server error: {}", message));
                }
                _ => continue,
            }
        }

        Err(anyhow!("Connection closed"))
    }

    /// Current roster
    pub async fn list_participants(&mut self) -> Result<Vec<Participant>> {
        self.send(ClientMessage::ListParticipants).await?;

        while let Some(msg) = self.recv().await {
            match msg {
                ServerMessage::Participants { participants } => return Ok(participants),
                ServerMessage::Error { message, .. } => {
                    return Err(anyhow!("Server error: {}", message));
                }
                _ => continue,
            }
        }

        Err(anyhow!("Connection closed"))
    }

    /// Assign Secret Santas and wait for the delivery report.
    ///
    /// `on_assigned` runs as soon as the server commits the assignment, before
    /// any notification goes out.
    pub async fn assign<F>(&mut self, mut on_assigned: F) -> Result<DeliveryReport>
    where
        F: FnMut(&[Participant]),
    {
        self.send(ClientMessage::Assign).await?;

        while let Some(msg) = self.recv().await {
            match msg {
                ServerMessage::Assigned { participants } => on_assigned(&participants),
                ServerMessage::DeliveryReport { report } => return Ok(report),
                ServerMessage::Error { message, .. } => {
                    return Err(anyhow!("Server error: {}", message));
                }
                _ => continue,
            }
        }

        Err(anyhow!("Connection closed"))
    }
}

impl Drop for SantaClient {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// Write queued frames to the socket until either side goes away
async fn forward_frames<S>(mut outgoing: mpsc::Receiver<Message>, mut sink: S)
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    while let Some(frame) = outgoing.recv().await {
        if let Err(e) = sink.send(frame).await {
            tracing::error!("WebSocket send failed: {}", e);
            break;
        }
    }
}

/// Parse text frames into server messages; anything unparseable is logged and skipped
async fn decode_frames<S>(mut stream: S, incoming: mpsc::Sender<ServerMessage>)
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        };

        match serde_json::from_str::<ServerMessage>(&text) {
            Ok(msg) => {
                if incoming.send(msg).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!("Ignoring unparseable frame: {} - {}", e, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decode_frames_skips_garbage_and_stops_at_close() {
        let frames = futures::stream::iter(vec![
            Ok(Message::Text(
                r#"{"type": "participants", "participants": []}"#.to_string(),
            )),
            Ok(Message::Text("not json".to_string())),
            Ok(Message::Ping(vec![1])),
            Ok(Message::Text(
                r#"{"type": "error", "kind": "validation", "message": "bad"}"#.to_string(),
            )),
            Ok(Message::Close(None)),
            Ok(Message::Text(
                r#"{"type": "participants", "participants": []}"#.to_string(),
            )),
        ]);
        let (tx, mut rx) = mpsc::channel(8);

        decode_frames(frames, tx).await;

        assert!(matches!(
            rx.recv().await,
            Some(ServerMessage::Participants { .. })
        ));
        assert!(matches!(rx.recv().await, Some(ServerMessage::Error { .. })));
        // Sender dropped once the close frame ends decoding
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_forward_frames_stops_when_queue_closes() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Message::Text("one".to_string())).await.unwrap();
        tx.send(Message::Text("two".to_string())).await.unwrap();
        drop(tx);

        let (frames_tx, frames_rx) = futures::channel::mpsc::unbounded::<Message>();
        let sink = frames_tx.sink_map_err(|_| tungstenite::Error::ConnectionClosed);
        forward_frames(rx, sink).await;

        let written: Vec<Message> = frames_rx.collect().await;
        assert_eq!(
            written,
            vec![
                Message::Text("one".to_string()),
                Message::Text("two".to_string())
            ]
        );
    }
}
