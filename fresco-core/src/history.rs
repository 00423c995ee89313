//! Bounded undo/redo history.
//!
//! Newest command at the front, strict FIFO eviction at capacity, and a
//! LIFO redo stack that any fresh edit invalidates. All operations are
//! total over possibly-empty collections: undoing with nothing to undo is
//! a no-op, never an error.

use std::collections::VecDeque;

use crate::canvas::PixelCanvas;
use crate::command::Command;

/// How many executed commands are remembered for undo.
pub const MAX_HISTORY: usize = 100;

#[derive(Debug, Default)]
pub struct History {
    /// Executed commands, newest first.
    commands: VecDeque<Command>,
    /// Commands removed by undo, awaiting redo.
    undone: Vec<Command>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a fresh command and record it.
    ///
    /// A fresh edit invalidates every pending redo.
    pub fn push(&mut self, canvas: &mut PixelCanvas, command: Command) {
        self.record(canvas, command);
        self.undone.clear();
    }

    /// The shared execute-and-record path used by both `push` and `redo`.
    fn record(&mut self, canvas: &mut PixelCanvas, command: Command) {
        if let Some(front) = self.commands.front() {
            if command.equivalent(front) {
                log::debug!(
                    "suppressing duplicate of newest command: {}",
                    command.description()
                );
                return;
            }
        }
        self.evict_at_capacity();
        command.execute(canvas);
        self.commands.push_front(command);
    }

    /// Record a command whose effects are already on the canvas.
    ///
    /// This is how finished strokes enter history: their edits executed
    /// incrementally while the stroke was open, so only the bookkeeping is
    /// left. Eviction at capacity still applies.
    pub fn record_executed(&mut self, command: Command) {
        self.evict_at_capacity();
        self.commands.push_front(command);
    }

    fn evict_at_capacity(&mut self) {
        while self.commands.len() >= MAX_HISTORY {
            // Evicted commands are gone for good; they can never be redone.
            self.commands.pop_back();
        }
    }

    /// Reverse the newest command, if any, and park it for redo.
    pub fn undo(&mut self, canvas: &mut PixelCanvas) {
        if let Some(command) = self.commands.pop_front() {
            command.undo(canvas);
            self.undone.push(command);
        }
    }

    /// Re-apply the most recently undone command, if any.
    ///
    /// Redo goes through the same guarded record path as a fresh command
    /// but leaves the rest of the redo stack intact.
    pub fn redo(&mut self, canvas: &mut PixelCanvas) {
        if let Some(command) = self.undone.pop() {
            self.record(canvas, command);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// How many commands are waiting to be redone.
    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    /// The newest recorded command.
    pub fn newest(&self) -> Option<&Command> {
        self.commands.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, PixelCanvas};
    use crate::command::DiscEdit;

    fn canvas() -> PixelCanvas {
        PixelCanvas::new(16, 128, Color::WHITE)
    }

    fn dot(canvas: &PixelCanvas, x: i32, y: i32) -> Command {
        Command::Brush(DiscEdit::capture(canvas, x, y, 0, Color::BLACK))
    }

    #[test]
    fn push_executes_and_records() {
        let mut canvas = canvas();
        let mut history = History::new();

        let command = dot(&canvas, 10, 15);
        history.push(&mut canvas, command);

        assert_eq!(canvas.pixel(10, 15), Some(Color::BLACK));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut canvas = canvas();
        let mut history = History::new();

        let command = dot(&canvas, 10, 15);
        history.push(&mut canvas, command);
        history.undo(&mut canvas);
        assert_eq!(canvas.pixel(10, 15), Some(Color::WHITE));

        history.redo(&mut canvas);
        assert_eq!(canvas.pixel(10, 15), Some(Color::BLACK));
        assert_eq!(history.len(), 1);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn undo_and_redo_on_empty_are_noops() {
        let mut canvas = canvas();
        let mut history = History::new();

        history.undo(&mut canvas);
        history.redo(&mut canvas);
        assert!(history.is_empty());
    }

    #[test]
    fn distinct_commands_accumulate_up_to_capacity() {
        let mut canvas = canvas();
        let mut history = History::new();

        for y in 0..100 {
            let command = dot(&canvas, 5, y);
            history.push(&mut canvas, command);
        }
        assert_eq!(history.len(), 100);

        // Undoing everything restores the canvas pixel for pixel
        for _ in 0..100 {
            history.undo(&mut canvas);
        }
        assert_eq!(canvas, PixelCanvas::new(16, 128, Color::WHITE));

        // One more undo is a no-op
        history.undo(&mut canvas);
        assert!(history.is_empty());
    }

    #[test]
    fn capacity_overflow_evicts_oldest_permanently() {
        let mut canvas = canvas();
        let mut history = History::new();

        for y in 0..101 {
            let command = dot(&canvas, 5, y);
            history.push(&mut canvas, command);
        }
        assert_eq!(history.len(), 100);

        // Undo everything that is left; the evicted first command at
        // (5, 0) cannot be reversed and its pixel survives.
        for _ in 0..100 {
            history.undo(&mut canvas);
        }
        assert_eq!(canvas.pixel(5, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(5, 1), Some(Color::WHITE));
    }

    #[test]
    fn fresh_command_clears_pending_redos() {
        let mut canvas = canvas();
        let mut history = History::new();

        let command = dot(&canvas, 1, 1);
        history.push(&mut canvas, command);
        history.undo(&mut canvas);
        assert_eq!(history.redo_len(), 1);

        let command = dot(&canvas, 2, 2);
        history.push(&mut canvas, command);
        assert_eq!(history.redo_len(), 0);

        // Redo now has nothing to do; (1, 1) stays untouched
        history.redo(&mut canvas);
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn redo_keeps_remaining_redo_stack() {
        let mut canvas = canvas();
        let mut history = History::new();

        let command = dot(&canvas, 1, 1);
        history.push(&mut canvas, command);
        let command = dot(&canvas, 2, 2);
        history.push(&mut canvas, command);
        history.undo(&mut canvas);
        history.undo(&mut canvas);
        assert_eq!(history.redo_len(), 2);

        history.redo(&mut canvas);
        assert_eq!(history.redo_len(), 1);
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));

        history.redo(&mut canvas);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(canvas.pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn duplicate_of_newest_is_suppressed() {
        let mut canvas = canvas();
        let mut history = History::new();

        let command = dot(&canvas, 4, 4);
        history.push(&mut canvas, command);
        let command = dot(&canvas, 4, 4);
        history.push(&mut canvas, command);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn record_executed_skips_execution_but_not_eviction() {
        let mut canvas = canvas();
        let mut history = History::new();

        for y in 0..100 {
            let command = dot(&canvas, 5, y);
            history.push(&mut canvas, command);
        }

        // Already-executed insert: canvas untouched, oldest evicted
        let command = dot(&canvas, 9, 9);
        history.record_executed(command);
        assert_eq!(history.len(), 100);
        assert_eq!(canvas.pixel(9, 9), Some(Color::WHITE));
    }
}
