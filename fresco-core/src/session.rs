//! Per-participant editing sessions over a shared canvas.
//!
//! A [`Session`] owns one [`PixelCanvas`] and one [`History`] and tracks an
//! open stroke per participant name, so interleaved samples from several
//! painters interpolate along the right paths instead of zig-zagging between
//! cursors.

use std::collections::HashMap;

use crate::canvas::{Color, PixelCanvas};
use crate::command::{ClearScreen, Command, DiscEdit, Tool};
use crate::history::History;
use crate::stroke::Stroke;

/// A canvas, its undo history, and the strokes currently in flight.
#[derive(Debug)]
pub struct Session {
    canvas: PixelCanvas,
    history: History,
    background: Color,
    open_strokes: HashMap<String, Stroke>,
}

impl Session {
    /// Session over a full-size shared canvas filled with `background`.
    pub fn new(background: Color) -> Self {
        Self::with_canvas(PixelCanvas::shared(background), background)
    }

    /// Session over an existing canvas. `background` is what the eraser
    /// paints and what a clear reverts to.
    pub fn with_canvas(canvas: PixelCanvas, background: Color) -> Self {
        Self {
            canvas,
            history: History::new(),
            background,
            open_strokes: HashMap::new(),
        }
    }

    /// Open a stroke for `participant`. A restart while a stroke is still
    /// open replaces it; the orphaned edits stay on the canvas but leave
    /// the history, so they can no longer be undone.
    pub fn start_stroke(&mut self, participant: &str, tool: Tool) {
        if self
            .open_strokes
            .insert(participant.to_owned(), Stroke::new(tool))
            .is_some()
        {
            log::warn!("{participant} restarted a stroke that was never ended");
        }
    }

    /// Record one brush sample for `participant`'s open stroke.
    pub fn brush_edit(&mut self, participant: &str, x: i32, y: i32, radius: u8, color: Color) {
        self.stroke_edit(participant, x, y, radius, color);
    }

    /// Record one eraser sample; the eraser paints the session background.
    pub fn eraser_edit(&mut self, participant: &str, x: i32, y: i32, radius: u8) {
        self.stroke_edit(participant, x, y, radius, self.background);
    }

    fn stroke_edit(&mut self, participant: &str, x: i32, y: i32, radius: u8, color: Color) {
        // Samples centered off the canvas never become edits; a far-out
        // position decoded from the wire must not feed interpolation.
        if self.canvas.pixel(x, y).is_none() {
            log::warn!("{participant} sent an edit off the canvas at ({x}, {y}); dropping it");
            return;
        }
        let Some(stroke) = self.open_strokes.get_mut(participant) else {
            log::warn!("{participant} has no active stroke; dropping edit at ({x}, {y})");
            return;
        };
        let edit = DiscEdit::capture(&self.canvas, x, y, radius, color);
        stroke.add_and_execute(&mut self.canvas, edit);
    }

    /// Close `participant`'s stroke and commit it to the history as one
    /// undoable unit. Its edits already ran, so the canvas is untouched.
    pub fn end_stroke(&mut self, participant: &str) {
        let Some(stroke) = self.open_strokes.remove(participant) else {
            log::warn!("{participant} ended a stroke that was never started");
            return;
        };
        self.history.record_executed(Command::Stroke(stroke));
    }

    /// Flood the canvas with `fill` as a single undoable command.
    pub fn clear_screen(&mut self, fill: Color) {
        let command = Command::Clear(ClearScreen::new(self.background, fill));
        self.history.push(&mut self.canvas, command);
    }

    pub fn undo(&mut self) {
        self.history.undo(&mut self.canvas);
    }

    pub fn redo(&mut self) {
        self.history.redo(&mut self.canvas);
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn has_open_stroke(&self, participant: &str) -> bool {
        self.open_strokes.contains_key(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::with_canvas(PixelCanvas::new(64, 64, Color::WHITE), Color::WHITE)
    }

    #[test]
    fn stroke_lifecycle_paints_and_commits_one_command() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        assert!(session.has_open_stroke("alice"));
        session.brush_edit("alice", 10, 10, 0, Color::BLACK);
        session.brush_edit("alice", 11, 10, 0, Color::BLACK);
        session.end_stroke("alice");

        assert!(!session.has_open_stroke("alice"));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.canvas().pixel(10, 10), Some(Color::BLACK));
        assert_eq!(session.canvas().pixel(11, 10), Some(Color::BLACK));
    }

    #[test]
    fn edits_without_an_open_stroke_are_dropped() {
        let mut session = session();

        session.brush_edit("alice", 5, 5, 0, Color::BLACK);
        assert_eq!(session.canvas().pixel(5, 5), Some(Color::WHITE));
        assert_eq!(session.history().len(), 0);
    }

    #[test]
    fn ending_an_unstarted_stroke_is_ignored() {
        let mut session = session();

        session.end_stroke("alice");
        assert_eq!(session.history().len(), 0);
    }

    #[test]
    fn empty_strokes_still_commit() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        session.end_stroke("alice");
        assert_eq!(session.history().len(), 1);

        // Undoing the empty stroke touches nothing
        session.undo();
        assert_eq!(session.canvas(), &PixelCanvas::new(64, 64, Color::WHITE));
    }

    #[test]
    fn participants_keep_independent_strokes() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        session.start_stroke("bob", Tool::Brush);
        session.brush_edit("alice", 0, 0, 0, Color::RED);
        session.brush_edit("bob", 63, 63, 0, Color::BLUE);
        session.brush_edit("alice", 1, 0, 0, Color::RED);
        session.brush_edit("bob", 62, 63, 0, Color::BLUE);
        session.end_stroke("alice");
        session.end_stroke("bob");

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.canvas().pixel(0, 0), Some(Color::RED));
        assert_eq!(session.canvas().pixel(1, 0), Some(Color::RED));
        assert_eq!(session.canvas().pixel(63, 63), Some(Color::BLUE));
        assert_eq!(session.canvas().pixel(62, 63), Some(Color::BLUE));

        // Bob's stroke ended last, so one undo removes only his pixels
        session.undo();
        assert_eq!(session.canvas().pixel(63, 63), Some(Color::WHITE));
        assert_eq!(session.canvas().pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn restarting_a_stroke_orphans_the_previous_edits() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        session.brush_edit("alice", 3, 3, 0, Color::BLACK);
        session.start_stroke("alice", Tool::Brush);
        session.brush_edit("alice", 7, 7, 0, Color::BLACK);
        session.end_stroke("alice");

        // Both edits are on the canvas but only the second stroke is undoable
        assert_eq!(session.history().len(), 1);
        session.undo();
        assert_eq!(session.canvas().pixel(3, 3), Some(Color::BLACK));
        assert_eq!(session.canvas().pixel(7, 7), Some(Color::WHITE));
    }

    #[test]
    fn off_canvas_samples_are_dropped() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        session.brush_edit("alice", 0, 0, 0, Color::BLACK);
        session.brush_edit("alice", 1, 0, 0, Color::BLACK);
        // Interpolation is armed now; a far-out sample must not reach it
        session.brush_edit("alice", 1_500_000_000, 0, 0, Color::BLACK);
        session.brush_edit("alice", -5, 3, 0, Color::BLACK);
        session.end_stroke("alice");

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.canvas().pixel(0, 0), Some(Color::BLACK));
        assert_eq!(session.canvas().pixel(1, 0), Some(Color::BLACK));
        assert_eq!(session.canvas().pixel(2, 0), Some(Color::WHITE));
        assert_eq!(session.canvas().pixel(63, 0), Some(Color::WHITE));
    }

    #[test]
    fn eraser_paints_the_session_background() {
        let mut session = Session::with_canvas(
            PixelCanvas::new(64, 64, Color::GREEN),
            Color::GREEN,
        );

        session.start_stroke("alice", Tool::Brush);
        session.brush_edit("alice", 20, 20, 1, Color::BLACK);
        session.end_stroke("alice");

        session.start_stroke("alice", Tool::Eraser);
        session.eraser_edit("alice", 20, 20, 1);
        session.end_stroke("alice");

        assert_eq!(session.canvas().pixel(20, 20), Some(Color::GREEN));
        assert_eq!(session.canvas().pixel(21, 20), Some(Color::GREEN));
    }

    #[test]
    fn clear_screen_round_trips_through_undo_and_redo() {
        let mut session = session();

        session.start_stroke("alice", Tool::Brush);
        session.brush_edit("alice", 30, 30, 0, Color::RED);
        session.end_stroke("alice");

        session.clear_screen(Color::YELLOW);
        assert_eq!(session.canvas().pixel(0, 0), Some(Color::YELLOW));
        assert_eq!(session.canvas().pixel(30, 30), Some(Color::YELLOW));

        session.undo();
        assert_eq!(session.canvas().pixel(0, 0), Some(Color::WHITE));
        assert_eq!(session.canvas().pixel(30, 30), Some(Color::WHITE));

        session.redo();
        assert_eq!(session.canvas().pixel(30, 30), Some(Color::YELLOW));
    }
}
