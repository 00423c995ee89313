//! Canvas grid and the fixed drawing palette.
//!
//! The canvas is a plain owned grid of colors. All mutation goes through
//! commands; the grid itself only knows how to read and write pixels.
//! Out-of-bounds writes are silently ignored, which is how coordinates
//! arriving from remote participants get clamped.

use serde::{Deserialize, Serialize};

/// Canvas width shared by every participant.
pub const CANVAS_WIDTH: u32 = 800;
/// Canvas height shared by every participant.
pub const CANVAS_HEIGHT: u32 = 800;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    /// The eight drawing colors, in wire-index order (index 1 is black).
    pub const PALETTE: [Color; 8] = [
        Color::BLACK,
        Color::WHITE,
        Color::RED,
        Color::GREEN,
        Color::BLUE,
        Color::YELLOW,
        Color::MAGENTA,
        Color::CYAN,
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up a palette color by its 1-based wire index.
    ///
    /// Index 0 and anything past the palette are invalid and yield `None`.
    pub fn from_index(index: u8) -> Option<Color> {
        if (1..=Self::PALETTE.len() as u8).contains(&index) {
            Some(Self::PALETTE[usize::from(index) - 1])
        } else {
            None
        }
    }

    /// The 1-based wire index of this color, if it is a palette color.
    pub fn palette_index(&self) -> Option<u8> {
        Self::PALETTE
            .iter()
            .position(|c| c == self)
            .map(|i| i as u8 + 1)
    }
}

/// A mutable 2-D grid of colors.
///
/// Coordinates are signed so that values decoded from the wire can be
/// bounds-checked rather than wrapped: `pixel` returns `None` outside the
/// grid and `set_pixel` does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelCanvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width * height) as usize],
        }
    }

    /// Create a canvas at the shared dimensions every participant uses.
    pub fn shared(background: Color) -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, background)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Read a pixel; `None` outside the grid.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Repaint the whole canvas with one color.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_indices_round_trip() {
        for index in 1..=8u8 {
            let color = Color::from_index(index).unwrap();
            assert_eq!(color.palette_index(), Some(index));
        }
    }

    #[test]
    fn invalid_palette_indices_rejected() {
        assert_eq!(Color::from_index(0), None);
        assert_eq!(Color::from_index(9), None);
        assert_eq!(Color::from_index(255), None);
    }

    #[test]
    fn non_palette_color_has_no_index() {
        assert_eq!(Color::rgb(1, 2, 3).palette_index(), None);
    }

    #[test]
    fn pixels_read_back_after_write() {
        let mut canvas = PixelCanvas::new(16, 16, Color::WHITE);
        assert_eq!(canvas.pixel(5, 5), Some(Color::WHITE));

        canvas.set_pixel(5, 5, Color::RED);
        assert_eq!(canvas.pixel(5, 5), Some(Color::RED));
        assert_eq!(canvas.pixel(5, 6), Some(Color::WHITE));
    }

    #[test]
    fn out_of_bounds_access_is_harmless() {
        let mut canvas = PixelCanvas::new(8, 8, Color::WHITE);

        assert_eq!(canvas.pixel(-1, 0), None);
        assert_eq!(canvas.pixel(0, -1), None);
        assert_eq!(canvas.pixel(8, 0), None);
        assert_eq!(canvas.pixel(0, 8), None);

        // Writes outside the grid are dropped, not wrapped
        canvas.set_pixel(-1, -1, Color::RED);
        canvas.set_pixel(100, 100, Color::RED);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(canvas.pixel(x, y), Some(Color::WHITE));
            }
        }
    }

    #[test]
    fn fill_repaints_everything() {
        let mut canvas = PixelCanvas::new(4, 4, Color::WHITE);
        canvas.set_pixel(1, 1, Color::BLUE);
        canvas.fill(Color::GREEN);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Some(Color::GREEN));
            }
        }
    }

    #[test]
    fn shared_canvas_dimensions() {
        let canvas = PixelCanvas::shared(Color::WHITE);
        assert_eq!(canvas.width(), CANVAS_WIDTH);
        assert_eq!(canvas.height(), CANVAS_HEIGHT);
    }
}
