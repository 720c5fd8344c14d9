//! Terminal cursor state.
//!
//! Tracks the write position, the brush applied to newly written cells,
//! and the wrap anchor. The anchor records that the previous operation was
//! a character write, so the next write continues the same logical line;
//! explicit cursor motion clears it, which is what lets reflow distinguish
//! soft-wrapped rows from hard line breaks.

use crate::cell::Style;

/// Cursor shape for rendering (DECSCUSR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

/// Terminal cursor: position, brush, and wrap anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Row index into the visible view (0-based).
    line: usize,
    /// Column index (0-based). Transiently equal to `cols` between the
    /// write that filled the last column and the wrap on the next write.
    col: usize,
    /// Style applied to newly written cells.
    pub brush: Style,
    /// Whether the previous operation was a write (soft-wrap anchor).
    anchored: bool,
}

impl Cursor {
    /// Create a cursor at the origin with the default brush.
    pub fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            brush: Style::default(),
            anchored: false,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn anchored(&self) -> bool {
        self.anchored
    }

    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub fn set_col(&mut self, col: usize) {
        self.col = col;
    }

    pub fn set_anchored(&mut self, anchored: bool) {
        self.anchored = anchored;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
