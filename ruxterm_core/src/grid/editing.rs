//! Grid editing operations.
//!
//! Character writes (including wide glyphs and soft wrap) plus the
//! character-level insert/delete/erase primitives the interpreter invokes
//! for escape sequences.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags};
use crate::index::Line;

use super::Grid;

/// Erase mode for display and line erase operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end (of display or line).
    Below,
    /// From the start (of display or line) to the cursor, inclusive.
    Above,
    /// The entire display or line.
    All,
}

impl Grid {
    /// Write a codepoint at the cursor with the current brush.
    ///
    /// Zero-width codepoints are treated as width 1 for layout safety. If
    /// the glyph does not fit in the remainder of the row, the tail is
    /// filled with empty cells carrying the cursor's anchor as their
    /// continuation flag and the write wraps to the next line, scrolling
    /// if it runs off the bottom. Wide glyphs occupy their leading cell
    /// plus spacer cells flagged `INHERIT_STYLE`.
    pub fn write(&mut self, ch: char) {
        let width = UnicodeWidthChar::width(ch).unwrap_or(1).max(1);
        let cols = self.size.cols;

        if self.cursor.col() + width > cols {
            let filler = Cell::filler(self.cursor.anchored());
            let col = self.cursor.col().min(cols);
            let line = self.cursor_line();
            for cell in &mut self.row_mut(line)[col..] {
                *cell = filler;
            }
            self.cursor.set_col(0);
            self.linefeed();
        }

        let mut flags = CellFlags::empty();
        if self.cursor.anchored() {
            flags |= CellFlags::LINE_CONTINUATION;
        }
        let brush = self.cursor.brush;
        let col = self.cursor.col();
        let line = self.cursor_line();

        let row = self.row_mut(line);
        row[col] = Cell { ch, flags, style: brush };
        for spacer in &mut row[col + 1..(col + width).min(cols)] {
            *spacer = Cell {
                ch: '\0',
                flags: CellFlags::INHERIT_STYLE | CellFlags::LINE_CONTINUATION,
                style: brush,
            };
        }

        self.cursor.set_col(col + width);
        self.cursor.set_anchored(true);
    }

    /// Insert `count` blank cells at the cursor, shifting the tail right.
    ///
    /// Cells pushed past the right edge are lost.
    pub fn insert_blank_chars(&mut self, count: usize) {
        let cols = self.size.cols;
        let col = self.cursor.col();
        if col >= cols {
            return;
        }

        let count = count.min(cols - col);
        let line = self.cursor_line();
        let row = self.row_mut(line);
        row.copy_within(col..cols - count, col + count);
        row[col..col + count].fill(Cell::EMPTY);
    }

    /// Delete `count` cells at the cursor, shifting the tail left and
    /// clearing the vacated cells at the end of the row.
    pub fn delete_chars(&mut self, count: usize) {
        let cols = self.size.cols;
        let col = self.cursor.col();
        if col >= cols {
            return;
        }

        let count = count.min(cols - col);
        let line = self.cursor_line();
        let row = self.row_mut(line);
        row.copy_within(col + count..cols, col);
        row[cols - count..].fill(Cell::EMPTY);
    }

    /// Clear `count` cells starting at the cursor without shifting.
    pub fn erase_chars(&mut self, count: usize) {
        let cols = self.size.cols;
        let col = self.cursor.col();
        if col >= cols {
            return;
        }

        let end = (col + count).min(cols);
        let line = self.cursor_line();
        self.row_mut(line)[col..end].fill(Cell::EMPTY);
    }

    /// Erase part or all of the current line.
    pub fn erase_line(&mut self, mode: EraseMode) {
        let cols = self.size.cols;
        let col = self.cursor.col();
        let line = self.cursor_line();
        let row = self.row_mut(line);

        match mode {
            EraseMode::Below => row[col.min(cols)..].fill(Cell::EMPTY),
            EraseMode::Above => row[..(col + 1).min(cols)].fill(Cell::EMPTY),
            EraseMode::All => row.fill(Cell::EMPTY),
        }
    }

    /// Erase part or all of the display.
    ///
    /// Erased rows are not moved into scrollback.
    pub fn erase_display(&mut self, mode: EraseMode) {
        let cursor_line = self.cursor.line();
        match mode {
            EraseMode::Below => {
                self.erase_line(EraseMode::Below);
                for line in cursor_line + 1..self.size.rows {
                    self.clear_row(Line(line as i32));
                }
            }
            EraseMode::Above => {
                self.erase_line(EraseMode::Above);
                for line in 0..cursor_line {
                    self.clear_row(Line(line as i32));
                }
            }
            EraseMode::All => {
                for line in 0..self.size.rows {
                    self.clear_row(Line(line as i32));
                }
            }
        }
    }
}
