//! Cursor movement operations.
//!
//! Implements CUU/CUD/CUF/CUB/CUP/CR/BS/HT. Movement is clamped to the
//! view (or the scroll region for vertical moves starting inside it) and
//! never scrolls. Every explicit motion clears the wrap anchor.

use super::Grid;

impl Grid {
    /// CUU: move the cursor up by `count` lines, clamped to the top of the
    /// scroll region (if inside it) or line 0.
    pub fn move_up(&mut self, count: usize) {
        let line = self.cursor.line();
        let top = if (self.scroll_top..self.scroll_bot).contains(&line) {
            self.scroll_top
        } else {
            0
        };
        self.cursor.set_line(line.saturating_sub(count).max(top));
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// CUD: move the cursor down by `count` lines, clamped to the bottom
    /// of the scroll region (if inside it) or the last line.
    pub fn move_down(&mut self, count: usize) {
        let line = self.cursor.line();
        let bottom = if (self.scroll_top..self.scroll_bot).contains(&line) {
            self.scroll_bot - 1
        } else {
            self.size.rows - 1
        };
        self.cursor.set_line((line + count).min(bottom));
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// CUF: move the cursor right by `count` columns.
    pub fn move_forward(&mut self, count: usize) {
        let col = self.cursor.col().min(self.size.cols - 1);
        self.cursor.set_col((col + count).min(self.size.cols - 1));
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// CUB: move the cursor left by `count` columns.
    pub fn move_backward(&mut self, count: usize) {
        let col = self.cursor.col().min(self.size.cols - 1);
        self.cursor.set_col(col.saturating_sub(count));
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// CUP: move the cursor to an absolute position, clamped to the view.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.set_line(line.min(self.size.rows - 1));
        self.cursor.set_col(col.min(self.size.cols - 1));
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// CR: move the cursor to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.set_col(0);
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// BS: move the cursor one column left, snapping a pending-wrap cursor
    /// (`col == cols`) back onto the last column first.
    pub fn backspace(&mut self) {
        let col = self.cursor.col();
        if col >= self.size.cols {
            self.cursor.set_col(self.size.cols - 1);
        } else if col > 0 {
            self.cursor.set_col(col - 1);
        }
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// HT: pad with spaces until the column is a multiple of 8 (or the
    /// line runs out).
    pub fn tab(&mut self) {
        let cols = self.size.cols;
        let col = self.cursor.col();
        if col >= cols {
            return;
        }
        let stop = ((col / 8) + 1) * 8;
        while self.cursor.col() < stop.min(cols) {
            self.write(' ');
        }
    }
}

#[cfg(test)]
mod tests;
