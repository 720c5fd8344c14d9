//! Scroll margins and scroll operations.
//!
//! Full-view scrolls on a grid with scrollback go through the ring
//! (`rotate_view_up`), retiring the top row into history in O(1). Scrolls
//! confined to a DECSTBM sub-region move rows by copying and never touch
//! scrollback.

use crate::index::Line;

use super::Grid;

/// Where `insert_blank_lines` opens its gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineInsertPoint {
    /// At the top scroll margin (reverse-index style).
    Top,
    /// At the cursor row (IL).
    Cursor,
}

impl Grid {
    /// DECSTBM: set the scroll margins from 1-based parameters. `bot` is
    /// inclusive; `None` means the bottom of the view. Degenerate regions
    /// (fewer than two lines) are ignored. Moves the cursor to the origin.
    pub fn set_scroll_margins(&mut self, top: usize, bot: Option<usize>) {
        let top = top.max(1) - 1;
        let bot = bot.map_or(self.size.rows, |b| b.min(self.size.rows));

        if top + 1 >= bot {
            return;
        }

        self.scroll_top = top;
        self.scroll_bot = bot;
        self.move_to(0, 0);
    }

    /// LF: move the cursor down one line. At the bottom margin the region
    /// scrolls up instead; at the last line outside the region the cursor
    /// stays put. Does not touch the wrap anchor, since soft wraps route
    /// through here too.
    pub fn linefeed(&mut self) {
        let line = self.cursor.line();
        if line + 1 == self.scroll_bot {
            self.scroll_up(1);
        } else if line + 1 < self.size.rows {
            self.cursor.set_line(line + 1);
            self.dirty = true;
        }
    }

    /// RI: move the cursor up one line, scrolling the region down when the
    /// cursor sits on the top margin.
    pub fn reverse_index(&mut self) {
        let line = self.cursor.line();
        if line == self.scroll_top {
            self.scroll_down(1);
        } else if line > 0 {
            self.cursor.set_line(line - 1);
        }
        self.cursor.set_anchored(false);
        self.dirty = true;
    }

    /// Scroll the margin region up by `count` lines. A full-view scroll
    /// feeds the retired top rows into scrollback via the ring; a
    /// sub-region scroll discards them.
    pub fn scroll_up(&mut self, count: usize) {
        let (top, bot) = (self.scroll_top, self.scroll_bot);
        let count = count.min(bot - top);

        if top == 0 && bot == self.size.rows {
            self.rotate_view_up(count);
            return;
        }

        for line in top..bot - count {
            self.copy_row(Line((line + count) as i32), Line(line as i32));
        }
        for line in bot - count..bot {
            self.clear_row(Line(line as i32));
        }
    }

    /// Scroll the margin region down by `count` lines. Rows pushed past
    /// the bottom margin are lost; scrollback is never consulted.
    pub fn scroll_down(&mut self, count: usize) {
        let (top, bot) = (self.scroll_top, self.scroll_bot);
        let count = count.min(bot - top);

        for line in (top + count..bot).rev() {
            self.copy_row(Line((line - count) as i32), Line(line as i32));
        }
        for line in top..top + count {
            self.clear_row(Line(line as i32));
        }
    }

    /// IL: open `count` blank lines, shifting rows below the insertion
    /// point down within the margin region.
    pub fn insert_blank_lines(&mut self, count: usize, at: LineInsertPoint) {
        let start = match at {
            LineInsertPoint::Top => self.scroll_top,
            LineInsertPoint::Cursor => self.cursor.line().max(self.scroll_top),
        };
        if start >= self.scroll_bot {
            return;
        }

        let count = count.min(self.scroll_bot - start);
        for line in (start + count..self.scroll_bot).rev() {
            self.copy_row(Line((line - count) as i32), Line(line as i32));
        }
        for line in start..start + count {
            self.clear_row(Line(line as i32));
        }
    }

    /// DL: delete `count` lines at the cursor, pulling rows below up
    /// within the margin region and clearing the vacated bottom rows.
    pub fn delete_lines(&mut self, count: usize) {
        let start = self.cursor.line().max(self.scroll_top);
        if start >= self.scroll_bot {
            return;
        }

        let count = count.min(self.scroll_bot - start);
        for line in start..self.scroll_bot - count {
            self.copy_row(Line((line + count) as i32), Line(line as i32));
        }
        for line in self.scroll_bot - count..self.scroll_bot {
            self.clear_row(Line(line as i32));
        }
    }
}

#[cfg(test)]
mod tests;
