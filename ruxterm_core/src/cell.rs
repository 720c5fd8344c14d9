//! Terminal cell types.
//!
//! A `Cell` is one character position in the grid: a codepoint, a small
//! layout-flag set, and a `Style`. Empty cells carry the NUL codepoint with
//! the default style. Cells are `Copy` so rows can be moved with bulk
//! memory operations during scrolling.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Per-cell layout flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        /// This cell logically continues the line above (soft wrap) or, on
        /// a non-leading cell, was written while the cursor was anchored.
        /// Reflow consults the flag on the first cell of each row.
        const LINE_CONTINUATION = 1;
        /// Trailing half of a wide glyph: adopts the style of the cell to
        /// its left and renders nothing itself.
        const INHERIT_STYLE = 1 << 1;
    }
}

bitflags! {
    /// Visual attribute flags carried by a `Style`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u16 {
        const BOLD      = 1;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE   = 1 << 3;
    }
}

/// Visual attributes of a cell: flag word plus foreground and background
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub flags: StyleFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    /// Font style index (0 regular, 1 bold, 2 italic, 3 bold italic) used
    /// to select a fallback chain and to tag uploaded glyphs.
    pub fn font_style(self) -> u8 {
        let mut style = 0;
        if self.flags.contains(StyleFlags::BOLD) {
            style |= 1;
        }
        if self.flags.contains(StyleFlags::ITALIC) {
            style |= 2;
        }
        style
    }
}

/// One character position in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// The stored codepoint; `\0` marks a cell that has never been written.
    pub ch: char,
    pub flags: CellFlags,
    pub style: Style,
}

impl Cell {
    /// An empty cell: NUL codepoint, default style, no flags.
    pub const EMPTY: Self = Self {
        ch: '\0',
        flags: CellFlags::empty(),
        style: Style {
            flags: StyleFlags::empty(),
            fg: Color::Default,
            bg: Color::Default,
        },
    };

    /// An empty filler cell carrying the given continuation flag, used when
    /// padding out the tail of a row during a soft wrap.
    pub fn filler(continuation: bool) -> Self {
        let mut cell = Self::EMPTY;
        if continuation {
            cell.flags |= CellFlags::LINE_CONTINUATION;
        }
        cell
    }

    /// Whether this cell has never been written.
    pub fn is_empty(self) -> bool {
        self.ch == '\0'
    }

    /// Whether this cell is the trailing half of a wide glyph.
    pub fn is_wide_spacer(self) -> bool {
        self.ch == '\0' && self.flags.contains(CellFlags::INHERIT_STYLE)
    }
}
