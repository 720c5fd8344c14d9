//! Terminal grid: ring-buffered cell storage with cursor, scroll margins,
//! and scrollback.
//!
//! The backing store is a single contiguous `Vec<Cell>` of
//! `cols × (rows + scrollback_rows)` cells used as a ring of rows.
//! `row_start` names the storage row holding the logical top of the view;
//! logical row `r ∈ [-scrollback_len, rows)` maps to storage row
//! `(row_start + r) mod (rows + scrollback_rows)`. Scrolling the view is a
//! bump of `row_start`, which simultaneously retires the top row into
//! scrollback and recycles the oldest history row as the fresh bottom row.

pub mod cursor;
pub mod editing;
pub mod mode;
pub mod navigation;
pub mod reflow;
pub mod scroll;

use crate::cell::Cell;
use crate::index::Line;

pub use cursor::{Cursor, CursorShape};
pub use editing::EraseMode;
pub use mode::PrivateModes;
pub use scroll::LineInsertPoint;

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (≥ 1).
    pub cols: usize,
    /// Number of visible rows (≥ 1).
    pub rows: usize,
    /// Scrollback capacity in rows (may be 0).
    pub scrollback_rows: usize,
}

impl Size {
    pub fn new(cols: usize, rows: usize, scrollback_rows: usize) -> Self {
        debug_assert!(cols >= 1 && rows >= 1, "grid must be at least 1x1 (got {cols}x{rows})");
        Self { cols, rows, scrollback_rows }
    }

    /// Total storage rows: view plus scrollback capacity.
    fn total_rows(self) -> usize {
        self.rows + self.scrollback_rows
    }
}

/// The terminal cell grid.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Ring-buffered backing store, `cols * (rows + scrollback_rows)` cells.
    cells: Vec<Cell>,
    size: Size,
    /// Storage row index of logical row 0 (top of view).
    row_start: usize,
    /// Number of valid history rows above the view (≤ `scrollback_rows`).
    scrollback_len: usize,
    /// Cursor position, brush, and wrap anchor.
    cursor: Cursor,
    /// DECSC/DECRC saved cursor.
    saved_cursor: Option<Cursor>,
    /// Scroll margin top (inclusive, 0-based).
    scroll_top: usize,
    /// Scroll margin bottom (exclusive, 0-based).
    scroll_bot: usize,
    /// Active private modes (DECSET/DECRST).
    modes: PrivateModes,
    /// Content changed since the last `take_dirty`.
    dirty: bool,
}

impl Grid {
    /// Create a grid of the given size with an empty view, empty
    /// scrollback, and the cursor at the origin.
    pub fn new(size: Size) -> Self {
        Self {
            cells: vec![Cell::EMPTY; size.cols * size.total_rows()],
            size,
            row_start: 0,
            scrollback_len: 0,
            cursor: Cursor::new(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bot: size.rows,
            modes: PrivateModes::default(),
            dirty: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    /// Number of history rows currently held above the view.
    pub fn scrollback_len(&self) -> usize {
        self.scrollback_len
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        self.dirty = true;
        &mut self.cursor
    }

    /// The cursor's position as a logical line index.
    pub fn cursor_line(&self) -> Line {
        Line(self.cursor.line() as i32)
    }

    /// Active private modes.
    pub fn modes(&self) -> PrivateModes {
        self.modes
    }

    /// Enable or disable a private mode flag.
    pub fn set_private_mode(&mut self, mode: PrivateModes, on: bool) {
        self.modes.set(mode, on);
        self.dirty = true;
    }

    /// Scroll margins as a 0-based half-open row range.
    pub fn scroll_margins(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bot)
    }

    /// Borrow a logical row. `line` may reach into scrollback
    /// (`-scrollback_len ..= -1`) or the view (`0 .. rows`).
    pub fn row(&self, line: Line) -> &[Cell] {
        let base = self.storage_row(line) * self.size.cols;
        &self.cells[base..base + self.size.cols]
    }

    /// Mutably borrow a logical row, marking the grid dirty.
    pub fn row_mut(&mut self, line: Line) -> &mut [Cell] {
        self.dirty = true;
        let base = self.storage_row(line) * self.size.cols;
        &mut self.cells[base..base + self.size.cols]
    }

    /// Save the cursor position and brush (DECSC).
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(self.cursor);
    }

    /// Restore the saved cursor, or reset to the origin if none was saved
    /// (DECRC).
    pub fn restore_cursor(&mut self) {
        self.cursor = self.saved_cursor.unwrap_or_default();
        self.cursor.set_anchored(false);
        self.clamp_cursor();
        self.dirty = true;
    }

    /// Whether content changed since the last call; resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Map a logical row to a storage row index.
    ///
    /// Valid for `line ∈ [-scrollback_len, rows)`.
    fn storage_row(&self, line: Line) -> usize {
        let total = self.size.total_rows() as i64;
        debug_assert!(
            (-(self.scrollback_len as i64)..self.size.rows as i64).contains(&i64::from(line.0)),
            "logical row {line} outside [-{}, {})",
            self.scrollback_len,
            self.size.rows,
        );
        (self.row_start as i64 + i64::from(line.0)).rem_euclid(total) as usize
    }

    /// Copy a whole row's cells from one logical row to another.
    pub(super) fn copy_row(&mut self, src: Line, dst: Line) {
        let cols = self.size.cols;
        let src_base = self.storage_row(src) * cols;
        let dst_base = self.storage_row(dst) * cols;
        if src_base != dst_base {
            self.cells.copy_within(src_base..src_base + cols, dst_base);
        }
        self.dirty = true;
    }

    /// Reset a logical row to empty cells.
    pub(super) fn clear_row(&mut self, line: Line) {
        self.row_mut(line).fill(Cell::EMPTY);
    }

    /// Advance the ring by `count` rows: the top of the view retires into
    /// scrollback (up to capacity) and the exposed bottom rows are cleared.
    pub(super) fn rotate_view_up(&mut self, count: usize) {
        let count = count.min(self.size.rows);
        self.row_start = (self.row_start + count) % self.size.total_rows();
        self.scrollback_len = (self.scrollback_len + count).min(self.size.scrollback_rows);
        for line in (self.size.rows - count)..self.size.rows {
            self.clear_row(Line(line as i32));
        }
        self.dirty = true;
    }

    /// Clamp the cursor into the view after external updates.
    pub(super) fn clamp_cursor(&mut self) {
        let line = self.cursor.line().min(self.size.rows - 1);
        let col = self.cursor.col().min(self.size.cols - 1);
        self.cursor.set_line(line);
        self.cursor.set_col(col);
    }
}

#[cfg(test)]
mod tests;
