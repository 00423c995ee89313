//! Binary wire protocol for canvas replication.
//!
//! Every frame is a bincode-encoded [`WireMessage`] carrying the sender's
//! participant name plus the payload of one canvas operation. Coordinates
//! travel as signed integers so off-canvas samples survive the trip; colors
//! travel as one-based palette indices, with index 0 reserved for "no color".

use fresco_core::Tool;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while encoding, decoding, or transporting frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode message: {0}")]
    Encode(String),
    #[error("failed to decode message: {0}")]
    Decode(String),
    #[error("connection closed")]
    ConnectionClosed,
}

/// One replicated canvas operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireMessage {
    /// One brush sample. `color` is a one-based palette index.
    BrushEdit {
        from: String,
        x: i32,
        y: i32,
        color: u8,
        radius: u8,
    },
    /// One eraser sample; the receiver supplies its own background color.
    EraserEdit {
        from: String,
        x: i32,
        y: i32,
        radius: u8,
    },
    /// Flood the canvas with the receiver's background.
    ClearScreen { from: String },
    /// Open a stroke for the sender.
    StrokeStart { from: String, tool: Tool },
    /// Close the sender's stroke and commit it to history.
    StrokeEnd { from: String, tool: Tool },
    Undo { from: String },
    Redo { from: String },
    /// No-op frame; announces the sender's identity to the relay.
    Idle { from: String },
}

impl WireMessage {
    /// The participant name this frame originated from.
    pub fn sender(&self) -> &str {
        match self {
            WireMessage::BrushEdit { from, .. }
            | WireMessage::EraserEdit { from, .. }
            | WireMessage::ClearScreen { from }
            | WireMessage::StrokeStart { from, .. }
            | WireMessage::StrokeEnd { from, .. }
            | WireMessage::Undo { from }
            | WireMessage::Redo { from }
            | WireMessage::Idle { from } => from,
        }
    }

    /// Short operation name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::BrushEdit { .. } => "brush-edit",
            WireMessage::EraserEdit { .. } => "eraser-edit",
            WireMessage::ClearScreen { .. } => "clear-screen",
            WireMessage::StrokeStart { .. } => "stroke-start",
            WireMessage::StrokeEnd { .. } => "stroke-end",
            WireMessage::Undo { .. } => "undo",
            WireMessage::Redo { .. } => "redo",
            WireMessage::Idle { .. } => "idle",
        }
    }

    /// Serialize to the binary wire format.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Deserialize from the binary wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (msg, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| ProtocolError::Decode(e.to_string()))?;
        Ok(msg)
    }
}
