//! # fresco-collab — Store-and-forward replication for Fresco
//!
//! Replicates canvas operations between participants through a central relay
//! that keeps no canvas state of its own, only an append-only frame log.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     WebSocket      ┌─────────────┐
//! │ RelayClient │ ◄─────────────────► │    Relay    │
//! │ (per user)  │    Binary frames    │  (central)  │
//! └──────┬──────┘                     └──────┬──────┘
//!        │                                   │
//!        ▼                                   ▼
//! ┌─────────────┐                     ┌─────────────┐
//! │ Session     │                     │ Frame log   │
//! │ (local)     │                     │ (replayed   │
//! │  canvas +   │                     │  to every   │
//! │  history    │                     │  joiner)    │
//! └─────────────┘                     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] — binary wire format (bincode-encoded [`WireMessage`])
//! - [`relay`] — store-and-forward server with full-log replay for joiners
//! - [`client`] — participant connection with a polled inbound queue
//! - [`dispatch`] — deterministic application of frames to a local session

pub mod client;
pub mod dispatch;
pub mod protocol;
pub mod relay;

// Re-exports for convenience
pub use client::{ConnectionState, RelayClient};
pub use dispatch::apply_message;
pub use protocol::{ProtocolError, WireMessage};
pub use relay::{Relay, RelayConfig, RelayError, RelayStats};
