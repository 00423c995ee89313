//! WebSocket client for a participant talking to the relay.
//!
//! The client moves every inbound frame into a local queue from a reader
//! task, so callers poll for remote messages at their own pace (typically
//! once per input event). Sending a canvas operation also drains at most one
//! queued remote message, which keeps a busy painter from starving intake.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::{ProtocolError, WireMessage};

/// Client connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A participant's connection to the relay.
pub struct RelayClient {
    participant: String,
    server_url: String,
    state: Arc<RwLock<ConnectionState>>,
    outgoing_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
    incoming_rx: Option<mpsc::UnboundedReceiver<WireMessage>>,
}

impl RelayClient {
    pub fn new(participant: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            server_url: server_url.into(),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            outgoing_tx: None,
            incoming_rx: None,
        }
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Connect to the relay and announce our identity.
    ///
    /// On success a writer and a reader task run until the connection drops;
    /// the reader flips the state back to `Disconnected` when it does.
    pub async fn connect(&mut self) -> Result<(), ProtocolError> {
        *self.state.write().await = ConnectionState::Connecting;

        let (ws_stream, _) = match tokio_tungstenite::connect_async(&self.server_url).await {
            Ok(connected) => connected,
            Err(e) => {
                log::warn!("Failed to connect to {}: {e}", self.server_url);
                *self.state.write().await = ConnectionState::Disconnected;
                return Err(ProtocolError::ConnectionClosed);
            }
        };
        let (mut ws_writer, mut ws_reader) = ws_stream.split();

        // Writer task: forward the outgoing queue to the socket
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        tokio::spawn(async move {
            while let Some(data) = out_rx.recv().await {
                if ws_writer.send(Message::Binary(data.into())).await.is_err() {
                    break;
                }
            }
            let _ = ws_writer.send(Message::Close(None)).await;
        });

        // Reader task: decode inbound frames into the local queue
        let (in_tx, in_rx) = mpsc::unbounded_channel::<WireMessage>();
        let participant = self.participant.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(frame) = ws_reader.next().await {
                match frame {
                    Ok(Message::Binary(data)) => {
                        let bytes: Vec<u8> = data.into();
                        match WireMessage::decode(&bytes) {
                            Ok(message) => {
                                if in_tx.send(message).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                log::warn!("{participant} received an undecodable frame: {e}");
                            }
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            *state.write().await = ConnectionState::Disconnected;
            log::info!("{participant} disconnected from relay");
        });

        self.outgoing_tx = Some(out_tx);
        self.incoming_rx = Some(in_rx);
        *self.state.write().await = ConnectionState::Connected;

        // Join frame: registers our identity with the relay before any edit
        self.send_raw(&WireMessage::Idle {
            from: self.participant.clone(),
        })?;
        log::info!("{} connected to {}", self.participant, self.server_url);
        Ok(())
    }

    fn send_raw(&self, message: &WireMessage) -> Result<(), ProtocolError> {
        let encoded = message.encode()?;
        let tx = self
            .outgoing_tx
            .as_ref()
            .ok_or(ProtocolError::ConnectionClosed)?;
        tx.send(encoded).map_err(|_| ProtocolError::ConnectionClosed)
    }

    /// Next queued remote message, if any. Never blocks.
    pub fn poll_message(&mut self) -> Option<WireMessage> {
        self.incoming_rx.as_mut()?.try_recv().ok()
    }

    /// Send one operation, then drain at most one queued remote message.
    pub fn send_command(
        &mut self,
        message: &WireMessage,
    ) -> Result<Option<WireMessage>, ProtocolError> {
        self.send_raw(message)?;
        Ok(self.poll_message())
    }

    /// Drop both queues; the writer task closes the socket behind us.
    pub async fn disconnect(&mut self) {
        self.outgoing_tx = None;
        self.incoming_rx = None;
        *self.state.write().await = ConnectionState::Disconnected;
    }

    pub async fn connection_state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub async fn is_disconnected(&self) -> bool {
        *self.state.read().await == ConnectionState::Disconnected
    }
}
