//! CSI sequence dispatch.

use log::{debug, warn};

use crate::event::{Event, EventListener};
use crate::grid::{CursorShape, EraseMode, Grid, LineInsertPoint, PrivateModes, Size};

use super::Term;

impl<T: EventListener> Term<T> {
    /// Dispatch a parsed CSI sequence on its final byte. An intermediate
    /// byte selects a different command space (`?` private modes, space
    /// DECSCUSR, `=` progressive keyboard enhancements).
    pub(super) fn csi_dispatch(&mut self, intermediate: Option<u8>, final_byte: u8) {
        // Counts default to 1, and an explicit 0 means 1.
        let count = usize::from(self.params.get_or(0, 1).max(1));

        match (intermediate, final_byte) {
            (None, b'm') => self.sgr(),

            (Some(b'?'), b'h') => self.set_private_modes(true),
            (Some(b'?'), b'l') => self.set_private_modes(false),
            (None, b'h') | (None, b'l') => {
                debug!("ANSI mode {} not implemented", self.params.get_or(0, 0));
            }

            (None, b'@') => self.grid_mut().insert_blank_chars(count),
            (None, b'A') => self.grid_mut().move_up(count),
            (None, b'B') => self.grid_mut().move_down(count),
            (None, b'C') => self.grid_mut().move_forward(count),
            (None, b'D') => self.grid_mut().move_backward(count),

            (None, b'H') | (None, b'f') => {
                let line = usize::from(self.params.get_or(0, 1).max(1)) - 1;
                let col = usize::from(self.params.get_or(1, 1).max(1)) - 1;
                self.grid_mut().move_to(line, col);
            }

            (None, b'J') => match self.params.get_or(0, 0) {
                0 => self.grid_mut().erase_display(EraseMode::Below),
                1 => self.grid_mut().erase_display(EraseMode::Above),
                2 => self.grid_mut().erase_display(EraseMode::All),
                mode => warn!("unhandled erase-display mode {mode}"),
            },
            (None, b'K') => match self.params.get_or(0, 0) {
                0 => self.grid_mut().erase_line(EraseMode::Below),
                1 => self.grid_mut().erase_line(EraseMode::Above),
                2 => self.grid_mut().erase_line(EraseMode::All),
                mode => warn!("unhandled erase-line mode {mode}"),
            },

            (None, b'L') => self.grid_mut().insert_blank_lines(count, LineInsertPoint::Cursor),
            (None, b'M') => self.grid_mut().delete_lines(count),
            (None, b'P') => self.grid_mut().delete_chars(count),
            (None, b'X') => self.grid_mut().erase_chars(count),

            (Some(b' '), b'q') => {
                self.cursor_shape = match self.params.get_or(0, 0) {
                    0..=2 => CursorShape::Block,
                    3 | 4 => CursorShape::Underline,
                    5 | 6 => CursorShape::Bar,
                    other => {
                        warn!("unknown cursor shape {other}");
                        return;
                    }
                };
                self.grid_mut().mark_dirty();
            }

            (None, b'r') => {
                let top = usize::from(self.params.get_or(0, 1));
                let bot = self.params.get(1).map(usize::from);
                self.grid_mut().set_scroll_margins(top, bot);
            }

            // Progressive keyboard enhancements (kitty protocol): accepted
            // and ignored.
            (Some(b'='), b'u') => {}

            (None, b's') => self.grid_mut().save_cursor(),
            (None, b'u') => self.grid_mut().restore_cursor(),

            (None, b'c') => {
                self.listener.send_event(Event::PtyWrite(b"\x1b[?6c".to_vec()));
            }

            _ => match intermediate {
                Some(b) => warn!("unimplemented CSI {}{}", b as char, final_byte as char),
                None => warn!("unimplemented CSI {}", final_byte as char),
            },
        }
    }

    /// DECSET/DECRST: toggle each private mode named in the parameters.
    fn set_private_modes(&mut self, on: bool) {
        for i in 0..self.params.len() {
            let Some(mode) = self.params.get(i) else { continue };
            match mode {
                25 => self.grid_mut().set_private_mode(PrivateModes::CURSOR_VISIBLE, on),
                1049 => self.set_alt_screen(on),
                2004 => self.grid_mut().set_private_mode(PrivateModes::BRACKETED_PASTE, on),
                other => debug!("private mode {other} not implemented"),
            }
        }
    }

    /// Mode 1049: enter/leave the alternate screen. Entering saves the
    /// primary cursor and starts from a blank alternate grid; leaving
    /// restores the primary cursor and discards the alternate content.
    fn set_alt_screen(&mut self, on: bool) {
        if on == self.active_is_alt {
            return;
        }

        if on {
            self.grid.save_cursor();
            let size = self.grid.size();
            let mut alt = Grid::new(Size::new(size.cols, size.rows, 0));
            // Carry the toggleable modes across so the full-screen
            // application starts from the same state.
            alt.set_private_mode(PrivateModes::all(), false);
            alt.set_private_mode(self.grid.modes() | PrivateModes::ALT_SCREEN, true);
            self.alt_grid = alt;
            self.active_is_alt = true;
        } else {
            self.active_is_alt = false;
            self.grid.restore_cursor();
            self.grid.mark_dirty();
        }
    }
}
