//! Render boundary: what a presenter sees of the current generation.
//!
//! Cell rows grow upwards while pixel rows grow downwards, so pixel
//! `(x, y)` shows cell `(x, height - 1 - y)`.
use crate::WorldGrid;

/// Top-down view of the current generation of a grid.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    grid: &'a WorldGrid,
}

impl<'a> FrameView<'a> {
    pub fn new(grid: &'a WorldGrid) -> Self {
        Self { grid }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Returns `true` if the pixel at `(x, y)` shows a live cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(y < self.height(), "pixel row {} is outside the frame", y);
        self.grid.get(x, self.height() - 1 - y)
    }

    /// Draws the frame as text, one line per pixel row.
    pub fn to_text(&self, alive: char, dead: char) -> String {
        let mut text = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() {
            text.extend((0..self.width()).map(|x| if self.pixel(x, y) { alive } else { dead }));
            text.push('\n');
        }
        text
    }

    /// Encodes the frame as a binary PBM (P4) image, live cells black.
    pub fn to_pbm(&self) -> Vec<u8> {
        let row_bytes = self.width().div_ceil(8);
        let mut image = format!("P4\n{} {}\n", self.width(), self.height()).into_bytes();
        image.reserve(row_bytes * self.height());
        for y in 0..self.height() {
            let mut row = vec![0u8; row_bytes];
            for x in (0..self.width()).filter(|&x| self.pixel(x, y)) {
                row[x / 8] |= 0x80 >> (x % 8);
            }
            image.extend_from_slice(&row);
        }
        image
    }
}
