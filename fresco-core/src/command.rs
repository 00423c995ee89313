//! Reversible canvas edits.
//!
//! Every edit is a value that carries everything needed to both apply and
//! reverse itself: disc edits capture the pixels they are about to repaint
//! at construction time, clear commands hold a previous/next fill pair.
//! Commands form a closed sum type — dispatch is a `match`, resolved once,
//! with no downcasting anywhere.

use serde::{Deserialize, Serialize};

use crate::canvas::{Color, PixelCanvas};
use crate::stroke::Stroke;

/// Which drawing tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Brush,
    Eraser,
}

/// One filled-disc stamp: the atomic unit of both brush and eraser strokes.
///
/// The disc covers every offset `(i, j)` in the `(2r+1)²` bounding box with
/// `sqrt(i² + j²) <= r`. Radius 0 is a single pixel. Previous colors of all
/// in-bounds disc members are captured when the edit is constructed, so
/// `undo` restores exactly what `execute` overwrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscEdit {
    x: i32,
    y: i32,
    radius: u8,
    color: Color,
    prev: Vec<(i32, i32, Color)>,
}

fn in_disc(dx: i32, dy: i32, radius: i32) -> bool {
    f64::from(dx * dx + dy * dy).sqrt() <= f64::from(radius)
}

impl DiscEdit {
    /// Build an edit at `(x, y)`, recording the current canvas content
    /// under the disc.
    pub fn capture(canvas: &PixelCanvas, x: i32, y: i32, radius: u8, color: Color) -> Self {
        let r = i32::from(radius);
        let mut prev = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if !in_disc(dx, dy, r) {
                    continue;
                }
                if let Some(c) = canvas.pixel(x + dx, y + dy) {
                    prev.push((x + dx, y + dy, c));
                }
            }
        }
        Self {
            x,
            y,
            radius,
            color,
            prev,
        }
    }

    pub fn execute(&self, canvas: &mut PixelCanvas) {
        let r = i32::from(self.radius);
        for dy in -r..=r {
            for dx in -r..=r {
                if in_disc(dx, dy, r) {
                    canvas.set_pixel(self.x + dx, self.y + dy, self.color);
                }
            }
        }
    }

    pub fn undo(&self, canvas: &mut PixelCanvas) {
        for &(x, y, color) in &self.prev {
            canvas.set_pixel(x, y, color);
        }
    }

    /// Two disc edits are equivalent when re-applying one over the other
    /// changes nothing: same center, radius, and color.
    pub fn equivalent(&self, other: &DiscEdit) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.radius == other.radius
            && self.color == other.color
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn radius(&self) -> u8 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Full-canvas repaint, held as a previous/next fill pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearScreen {
    prev: Color,
    next: Color,
}

impl ClearScreen {
    pub fn new(prev: Color, next: Color) -> Self {
        Self { prev, next }
    }

    pub fn execute(&self, canvas: &mut PixelCanvas) {
        canvas.fill(self.next);
    }

    pub fn undo(&self, canvas: &mut PixelCanvas) {
        canvas.fill(self.prev);
    }

    pub fn next(&self) -> Color {
        self.next
    }
}

/// A reversible unit of canvas editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Brush(DiscEdit),
    Eraser(DiscEdit),
    Clear(ClearScreen),
    Stroke(Stroke),
}

impl Command {
    pub fn execute(&self, canvas: &mut PixelCanvas) {
        match self {
            Command::Brush(edit) | Command::Eraser(edit) => edit.execute(canvas),
            Command::Clear(clear) => clear.execute(canvas),
            Command::Stroke(stroke) => stroke.execute(canvas),
        }
    }

    pub fn undo(&self, canvas: &mut PixelCanvas) {
        match self {
            Command::Brush(edit) | Command::Eraser(edit) => edit.undo(canvas),
            Command::Clear(clear) => clear.undo(canvas),
            Command::Stroke(stroke) => stroke.undo(canvas),
        }
    }

    /// Human-readable description, for diagnostics only.
    pub fn description(&self) -> String {
        match self {
            Command::Brush(e) => format!(
                "paint disc at ({}, {}) radius {} color ({}, {}, {})",
                e.x, e.y, e.radius, e.color.r, e.color.g, e.color.b
            ),
            Command::Eraser(e) => {
                format!("erase disc at ({}, {}) radius {}", e.x, e.y, e.radius)
            }
            Command::Clear(c) => format!(
                "repaint canvas to ({}, {}, {})",
                c.next.r, c.next.g, c.next.b
            ),
            Command::Stroke(s) => {
                let tool = match s.tool() {
                    Tool::Brush => "brush",
                    Tool::Eraser => "eraser",
                };
                format!("{tool} stroke of {} edits", s.len())
            }
        }
    }

    /// Whether applying `self` right after `other` would leave the canvas
    /// unchanged. Used to suppress duplicate work, never for undo
    /// correctness.
    pub fn equivalent(&self, other: &Command) -> bool {
        match (self, other) {
            (Command::Brush(a), Command::Brush(b)) => a.equivalent(b),
            (Command::Eraser(a), Command::Eraser(b)) => a.equivalent(b),
            (Command::Clear(a), Command::Clear(b)) => a.next == b.next,
            (Command::Stroke(a), Command::Stroke(b)) => a.equivalent(b),
            _ => false,
        }
    }
}
