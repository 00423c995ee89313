//! Applies decoded wire messages to a local [`Session`].
//!
//! Every receiver runs the same dispatch over the same frame sequence, so
//! identical logs produce identical canvases. The match is exhaustive; a
//! new [`WireMessage`] variant will not compile until it is handled here.

use fresco_core::{Color, Session};

use crate::protocol::WireMessage;

/// Apply one remote operation to the session.
pub fn apply_message(session: &mut Session, message: &WireMessage) {
    match message {
        WireMessage::BrushEdit {
            from,
            x,
            y,
            color,
            radius,
        } => {
            let Some(color) = Color::from_index(*color) else {
                log::warn!("{from} sent brush edit with unknown palette index {color}, dropping");
                return;
            };
            session.brush_edit(from, *x, *y, *radius, color);
        }
        WireMessage::EraserEdit { from, x, y, radius } => {
            session.eraser_edit(from, *x, *y, *radius);
        }
        WireMessage::ClearScreen { from: _ } => {
            session.clear_screen(session.background());
        }
        WireMessage::StrokeStart { from, tool } => {
            session.start_stroke(from, *tool);
        }
        WireMessage::StrokeEnd { from, tool: _ } => {
            session.end_stroke(from);
        }
        WireMessage::Undo { from: _ } => {
            session.undo();
        }
        WireMessage::Redo { from: _ } => {
            session.redo();
        }
        WireMessage::Idle { from } => {
            log::trace!("{from} is idle");
        }
    }
}
