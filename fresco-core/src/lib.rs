//! # fresco-core — Reversible raster editing for Fresco
//!
//! The single-machine heart of the Fresco collaborative canvas: a fixed-size
//! pixel canvas, reversible commands with snapshot-based undo, stroke
//! interpolation that fills the gaps between input samples, and a session
//! type that multiplexes several participants over one canvas and history.
//!
//! ## Modules
//!
//! - [`canvas`] — [`PixelCanvas`], [`Color`] and the eight-entry palette
//! - [`command`] — disc and clear commands that capture their own undo state
//! - [`stroke`] — sample interpolation and stroke-level undo grouping
//! - [`history`] — bounded undo/redo stack with duplicate suppression
//! - [`session`] — per-participant stroke tracking over a shared canvas

pub mod canvas;
pub mod command;
pub mod history;
pub mod session;
pub mod stroke;

// Re-exports for convenience
pub use canvas::{Color, PixelCanvas, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use command::{ClearScreen, Command, DiscEdit, Tool};
pub use history::{History, MAX_HISTORY};
pub use session::Session;
pub use stroke::Stroke;
