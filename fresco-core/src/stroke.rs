//! Continuous strokes built from discrete pointer samples.
//!
//! Pointer sampling is coarser than pixel granularity: a fast drag delivers
//! samples many pixels apart, and stamping only the samples leaves a dotted
//! line. The stroke closes those gaps by synthesizing one disc edit per unit
//! of Euclidean distance along the segment between the previous sample and
//! the new one. Linear interpolation is enough — the defect being corrected
//! is visible gaps, not curvature.

use crate::canvas::PixelCanvas;
use crate::command::{DiscEdit, Tool};

/// An ordered group of disc edits representing one continuous stroke:
/// everything between pointer-down and pointer-up for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    tool: Tool,
    edits: Vec<DiscEdit>,
}

impl Stroke {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            edits: Vec::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn edits(&self) -> &[DiscEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Append a sampled edit, filling the gap back to the previous sample.
    ///
    /// Interpolation engages only once the stroke already holds at least two
    /// edits. Candidates equivalent to the current tail are discarded;
    /// everything else executes immediately and joins the stroke.
    pub fn add_and_execute(&mut self, canvas: &mut PixelCanvas, edit: DiscEdit) {
        self.interpolate(canvas, &edit);
        self.push_edit(canvas, edit);
    }

    fn interpolate(&mut self, canvas: &mut PixelCanvas, newest: &DiscEdit) {
        if self.edits.len() < 2 {
            return;
        }
        let Some(previous) = self.edits.last() else {
            return;
        };
        let (px, py) = (previous.x(), previous.y());

        // Deltas widen to i64 so the squared distance cannot overflow for
        // any pair of i32 sample positions.
        let dx = i64::from(px) - i64::from(newest.x());
        let dy = i64::from(py) - i64::from(newest.y());
        let distance = ((dx * dx + dy * dy) as f64).sqrt();

        for i in 1..=distance.floor() as i64 {
            let nx = if dx == 0 {
                px
            } else {
                px - ((i as f64) * (dx as f64) / distance).round() as i32
            };
            let ny = if dy == 0 {
                py
            } else {
                py - ((i as f64) * (dy as f64) / distance).round() as i32
            };
            // Captured after the previous step executed, so undo is exact
            // even where synthesized discs overlap.
            let step = DiscEdit::capture(canvas, nx, ny, newest.radius(), newest.color());
            self.push_edit(canvas, step);
        }
    }

    fn push_edit(&mut self, canvas: &mut PixelCanvas, edit: DiscEdit) {
        if let Some(tail) = self.edits.last() {
            if edit.equivalent(tail) {
                return;
            }
        }
        edit.execute(canvas);
        self.edits.push(edit);
    }

    /// Re-apply every edit in stroke order.
    pub fn execute(&self, canvas: &mut PixelCanvas) {
        for edit in &self.edits {
            edit.execute(canvas);
        }
    }

    /// Reverse every edit, newest first.
    pub fn undo(&self, canvas: &mut PixelCanvas) {
        for edit in self.edits.iter().rev() {
            edit.undo(canvas);
        }
    }

    pub fn equivalent(&self, other: &Stroke) -> bool {
        self.tool == other.tool
            && self.edits.len() == other.edits.len()
            && self
                .edits
                .iter()
                .zip(&other.edits)
                .all(|(a, b)| a.equivalent(b))
    }
}
