//! Store-and-forward WebSocket relay.
//!
//! The relay keeps no canvas of its own. Every binary frame a participant
//! sends is appended to an in-memory log and fanned out to every other
//! connection; a joiner first receives the entire log in arrival order, so
//! replaying it rebuilds the canvas all earlier participants produced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch, RwLock};
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::WireMessage;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind to
    pub bind_addr: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Relay-wide counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelayStats {
    pub total_connections: u64,
    pub messages_relayed: u64,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Outbound queue for one live connection.
struct PeerHandle {
    tx: mpsc::UnboundedSender<Arc<Vec<u8>>>,
}

/// Everything behind the relay's single lock.
#[derive(Default)]
struct RelayState {
    /// Live connections by connection id
    peers: HashMap<u64, PeerHandle>,
    /// Participant name → connection id, registered on first frame
    identities: HashMap<String, u64>,
    /// Every frame ever relayed, in arrival order
    log: Vec<Arc<Vec<u8>>>,
    stats: RelayStats,
}

/// The relay server.
pub struct Relay {
    config: RelayConfig,
    state: Arc<RwLock<RelayState>>,
    next_conn_id: AtomicU64,
    shutdown: watch::Sender<bool>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            state: Arc::new(RwLock::new(RelayState::default())),
            next_conn_id: AtomicU64::new(0),
            shutdown,
        }
    }

    /// Create with the default bind address.
    pub fn with_defaults() -> Self {
        Self::new(RelayConfig::default())
    }

    pub fn bind_addr(&self) -> &str {
        &self.config.bind_addr
    }

    /// Accept WebSocket connections until [`Relay::stop`] is called.
    pub async fn run(&self) -> Result<(), RelayError> {
        let listener =
            TcpListener::bind(&self.config.bind_addr)
                .await
                .map_err(|source| RelayError::Bind {
                    addr: self.config.bind_addr.clone(),
                    source,
                })?;
        log::info!("Relay listening on {}", self.config.bind_addr);

        let mut shutdown_rx = self.shutdown.subscribe();
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, addr) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            log::warn!("Accept failed: {e}");
                            continue;
                        }
                    };
                    let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
                    log::debug!("New TCP connection #{conn_id} from {addr}");

                    let state = self.state.clone();
                    let shutdown_rx = self.shutdown.subscribe();
                    tokio::spawn(async move {
                        if let Err(e) =
                            Self::handle_connection(stream, conn_id, state, shutdown_rx).await
                        {
                            log::error!("Connection #{conn_id} error: {e}");
                        }
                    });
                }
                _ = shutdown_rx.changed() => {
                    log::info!("Relay shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Stop accepting and force-close every live connection.
    pub async fn stop(&self) {
        let _ = self.shutdown.send(true);
        let mut state = self.state.write().await;
        state.peers.clear();
        state.identities.clear();
    }

    /// Registered participant names (one per identity seen so far).
    pub async fn participant_count(&self) -> usize {
        self.state.read().await.identities.len()
    }

    /// Live WebSocket connections.
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.peers.len()
    }

    /// Frames accumulated in the replay log.
    pub async fn log_len(&self) -> usize {
        self.state.read().await.log.len()
    }

    pub async fn stats(&self) -> RelayStats {
        self.state.read().await.stats
    }

    async fn handle_connection(
        stream: TcpStream,
        conn_id: u64,
        state: Arc<RwLock<RelayState>>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ws_stream = tokio_tungstenite::accept_async(stream).await?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let (tx, mut rx) = mpsc::unbounded_channel::<Arc<Vec<u8>>>();

        // Register and snapshot the log under one lock so the backlog plus
        // the live queue together carry every frame exactly once.
        let backlog = {
            let mut state = state.write().await;
            state.peers.insert(conn_id, PeerHandle { tx });
            state.stats.total_connections += 1;
            state.log.clone()
        };

        log::info!(
            "Connection #{conn_id} established, replaying {} frames",
            backlog.len()
        );

        // Registered from here on: every exit below, including a failed
        // write to a peer that died mid-stream, must reach deregistration.
        let result: Result<(), tokio_tungstenite::tungstenite::Error> = async {
            for frame in backlog {
                ws_sender
                    .send(Message::Binary(frame.as_ref().clone().into()))
                    .await?;
            }

            loop {
                tokio::select! {
                    inbound = ws_receiver.next() => {
                        match inbound {
                            Some(Ok(Message::Binary(data))) => {
                                let bytes: Vec<u8> = data.into();
                                Self::relay_frame(conn_id, bytes, &state).await;
                            }
                            Some(Ok(Message::Ping(payload))) => {
                                ws_sender.send(Message::Pong(payload)).await?;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                log::info!("Connection #{conn_id} closed");
                                return Ok(());
                            }
                            Some(Ok(_)) => {
                                log::debug!("Connection #{conn_id} sent a non-binary frame, ignoring");
                            }
                            Some(Err(e)) => {
                                log::warn!("Connection #{conn_id} receive error: {e}");
                                return Ok(());
                            }
                        }
                    }
                    queued = rx.recv() => {
                        match queued {
                            Some(frame) => {
                                ws_sender
                                    .send(Message::Binary(frame.as_ref().clone().into()))
                                    .await?;
                            }
                            // Queue dropped: the relay force-closed us
                            None => {
                                let _ = ws_sender.send(Message::Close(None)).await;
                                return Ok(());
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        let _ = ws_sender.send(Message::Close(None)).await;
                        return Ok(());
                    }
                }
            }
        }
        .await;

        let mut state = state.write().await;
        state.peers.remove(&conn_id);
        state.identities.retain(|_, id| *id != conn_id);
        result.map_err(Into::into)
    }

    /// Log one inbound frame and fan it out to every other connection.
    async fn relay_frame(conn_id: u64, bytes: Vec<u8>, state: &Arc<RwLock<RelayState>>) {
        let message = match WireMessage::decode(&bytes) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Connection #{conn_id} sent an undecodable frame: {e}");
                return;
            }
        };
        log::debug!(
            "Relaying {} from {} (connection #{conn_id})",
            message.kind(),
            message.sender()
        );

        let frame = Arc::new(bytes);
        let mut state = state.write().await;
        state.log.push(frame.clone());
        state.stats.messages_relayed += 1;
        state
            .identities
            .entry(message.sender().to_owned())
            .or_insert(conn_id);

        for (id, peer) in &state.peers {
            if *id == conn_id {
                continue;
            }
            if peer.tx.send(frame.clone()).is_err() {
                log::warn!("Failed to queue frame for connection #{id}");
            }
        }
    }
}
