//! Content reflow into a differently sized grid.
//!
//! Replays every cell from the oldest scrollback row down to the cursor
//! row into a target grid, turning the recorded soft-wrap bookkeeping
//! into fresh wrap decisions at the target width.

use crate::cell::CellFlags;
use crate::index::Line;

use super::Grid;

impl Grid {
    /// Replay this grid's content into `target`.
    ///
    /// Rows are walked oldest-first; each row whose first cell lacks the
    /// continuation flag starts a new line in the target (an untouched
    /// blank row still counts as one hard line break). Trailing
    /// never-written cells are trimmed, wide-glyph spacers are skipped so
    /// the leading cell recreates them, and each written cell re-seeds the
    /// target's brush and wrap anchor from its own style and flag.
    pub fn reflow_into(&self, target: &mut Grid) {
        let first_line = -(self.scrollback_len as i32);
        let last_line = self.cursor.line() as i32;

        for (i, line) in (first_line..=last_line).enumerate() {
            let row = self.row(Line(line));

            let soft_wrapped = row[0].flags.contains(CellFlags::LINE_CONTINUATION);
            if i > 0 && !soft_wrapped {
                target.carriage_return();
                target.linefeed();
            }

            let content_len = row.len() - row.iter().rev().take_while(|c| c.is_empty()).count();
            for cell in &row[..content_len] {
                if cell.is_wide_spacer() {
                    continue;
                }
                target.cursor_mut().brush = cell.style;
                let continuation = cell.flags.contains(CellFlags::LINE_CONTINUATION);
                target.cursor_mut().set_anchored(continuation);
                target.write(cell.ch);
            }
        }

        target.cursor_mut().brush = self.cursor.brush;
        target.modes = self.modes;
        target.mark_dirty();
    }
}

#[cfg(test)]
mod tests;
