//! SGR (select graphic rendition) handling.

use log::warn;

use crate::cell::{Style, StyleFlags};
use crate::color::{Color, Rgb};
use crate::event::EventListener;

use super::Term;

impl<T: EventListener> Term<T> {
    /// `CSI ... m`: edit the cursor brush. An empty parameter list resets.
    /// Unknown codes stop the iteration without error.
    pub(super) fn sgr(&mut self) {
        let mut brush = self.grid().cursor().brush;

        if self.params.is_empty() {
            brush = Style::default();
        }

        let mut i = 0;
        while i < self.params.len() {
            match self.params.get_or(i, 0) {
                0 => brush = Style::default(),
                1 => brush.flags.insert(StyleFlags::BOLD),
                22 => brush.flags.remove(StyleFlags::BOLD),
                3 => brush.flags.insert(StyleFlags::ITALIC),
                23 => brush.flags.remove(StyleFlags::ITALIC),
                4 => brush.flags.insert(StyleFlags::UNDERLINE),
                24 => brush.flags.remove(StyleFlags::UNDERLINE),
                7 => brush.flags.insert(StyleFlags::INVERSE),
                27 => brush.flags.remove(StyleFlags::INVERSE),

                n @ 30..=37 => brush.fg = Color::Indexed((n - 30) as u8),
                39 => brush.fg = Color::Default,
                n @ 40..=47 => brush.bg = Color::Indexed((n - 40) as u8),
                49 => brush.bg = Color::Default,
                n @ 90..=97 => brush.fg = Color::Indexed((n - 90 + 8) as u8),
                n @ 100..=107 => brush.bg = Color::Indexed((n - 100 + 8) as u8),

                n @ (38 | 48) => match self.parse_extended_color(i) {
                    Some((color, skip)) => {
                        if n == 38 {
                            brush.fg = color;
                        } else {
                            brush.bg = color;
                        }
                        i += skip;
                    }
                    None => {
                        warn!("malformed SGR {n} extended color");
                        break;
                    }
                },

                other => {
                    warn!("unhandled SGR code {other}");
                    break;
                }
            }
            i += 1;
        }

        self.grid_mut().cursor_mut().brush = brush;
    }

    /// Parse the tail of an SGR 38/48: `2;r;g;b` or `5;index`. Returns the
    /// color and how many extra parameters were consumed.
    fn parse_extended_color(&self, i: usize) -> Option<(Color, usize)> {
        match self.params.get(i + 1)? {
            2 => {
                let r = self.params.get(i + 2)? as u8;
                let g = self.params.get(i + 3)? as u8;
                let b = self.params.get(i + 4)? as u8;
                Some((Color::Rgb(Rgb::new(r, g, b)), 4))
            }
            5 => {
                let index = self.params.get(i + 2)? as u8;
                Some((Color::Indexed(index), 2))
            }
            _ => None,
        }
    }
}
