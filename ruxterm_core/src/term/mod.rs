//! The terminal interpreter.
//!
//! `Term<T: EventListener>` owns the primary and alternate grids and turns
//! the shell's byte stream into grid mutations: printable ASCII takes a
//! fast path straight into the grid, everything else goes through the
//! streaming parser and the CSI/OSC dispatchers in the submodules. A
//! residual prefix of an incomplete escape sequence is carried between
//! calls so sequences may arrive split across reads.

pub mod attr;
pub mod csi;
pub mod osc;

use log::debug;

use crate::event::{Event, EventListener};
use crate::grid::{CursorShape, Grid, Size};
use crate::parser::{self, Command, Params};

/// The terminal state machine: grids, parser context, and dispatch.
pub struct Term<T: EventListener> {
    /// Primary grid (with scrollback).
    grid: Grid,
    /// Alternate-screen grid (no scrollback).
    alt_grid: Grid,
    /// Which grid is active.
    active_is_alt: bool,
    /// Parameter context reused across parse calls.
    params: Params,
    /// Unconsumed tail of an escape sequence split across reads.
    pending: Vec<u8>,
    /// Window title (OSC 0/2).
    title: String,
    /// Cursor shape (DECSCUSR); global, not per-screen.
    cursor_shape: CursorShape,
    /// Event sink.
    listener: T,
}

impl<T: EventListener> Term<T> {
    /// Create a terminal with the given primary grid size.
    pub fn new(size: Size, listener: T) -> Self {
        Self {
            grid: Grid::new(size),
            alt_grid: Grid::new(Size::new(size.cols, size.rows, 0)),
            active_is_alt: false,
            params: Params::new(),
            pending: Vec::new(),
            title: String::new(),
            cursor_shape: CursorShape::default(),
            listener,
        }
    }

    /// Reference to the active grid.
    pub fn grid(&self) -> &Grid {
        if self.active_is_alt { &self.alt_grid } else { &self.grid }
    }

    /// Mutable reference to the active grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        if self.active_is_alt { &mut self.alt_grid } else { &mut self.grid }
    }

    /// Whether the alternate screen is active.
    pub fn is_alt_screen(&self) -> bool {
        self.active_is_alt
    }

    /// Current window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current cursor shape.
    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape
    }

    /// Reference to the event listener.
    pub fn listener(&self) -> &T {
        &self.listener
    }

    /// Resize both screens. The primary grid's content reflows into the
    /// new dimensions; the alternate screen is recreated blank, since
    /// full-screen applications repaint on resize anyway.
    pub fn resize(&mut self, size: Size) {
        let mut new_grid = Grid::new(size);
        self.grid.reflow_into(&mut new_grid);
        self.grid = new_grid;
        self.alt_grid = Grid::new(Size::new(size.cols, size.rows, 0));
    }

    /// Feed shell output. Consumes as much as possible; the unconsumed
    /// tail of a split escape sequence is kept for the next call.
    pub fn advance(&mut self, bytes: &[u8]) {
        if self.pending.is_empty() {
            let used = self.run(bytes);
            if used < bytes.len() {
                self.pending.extend_from_slice(&bytes[used..]);
            }
        } else {
            // Compact the residue to the front and retry with the new bytes
            // appended.
            let mut data = std::mem::take(&mut self.pending);
            data.extend_from_slice(bytes);
            let used = self.run(&data);
            if used < data.len() {
                data.drain(..used);
                self.pending = data;
            }
        }
    }

    /// Process the head of `data`, returning how many bytes were consumed.
    fn run(&mut self, data: &[u8]) -> usize {
        let mut pos = 0;
        while pos < data.len() {
            // Fast path: printable ASCII goes straight into the grid.
            while pos < data.len() && (0x20..0x7f).contains(&data[pos]) {
                self.grid_mut().write(data[pos] as char);
                pos += 1;
            }
            if pos >= data.len() {
                break;
            }

            let (consumed, cmd) = parser::parse(&data[pos..], &mut self.params);
            match cmd {
                Command::Incomplete { .. } => break,
                Command::Invalid => {
                    debug_assert!(consumed > 0);
                    self.grid_mut().write(parser::REPLACEMENT);
                    pos += consumed;
                }
                cmd => {
                    let seq = &data[pos..pos + consumed];
                    pos += consumed;
                    self.dispatch(cmd, seq);
                }
            }
        }
        pos
    }

    /// Apply one parsed command. `seq` is the raw byte range the command
    /// was parsed from (OSC payload offsets index into it).
    fn dispatch(&mut self, cmd: Command, seq: &[u8]) {
        match cmd {
            Command::Print(ch) => self.grid_mut().write(ch),

            Command::Bell => self.listener.send_event(Event::Bell),
            Command::Backspace => self.grid_mut().backspace(),
            Command::Tab => self.grid_mut().tab(),
            Command::LineFeed | Command::Index => {
                let grid = self.grid_mut();
                grid.linefeed();
                grid.cursor_mut().set_anchored(false);
            }
            Command::CarriageReturn => self.grid_mut().carriage_return(),
            Command::NextLine => {
                let grid = self.grid_mut();
                grid.carriage_return();
                grid.linefeed();
            }
            Command::ReverseIndex => self.grid_mut().reverse_index(),
            Command::SaveCursor => self.grid_mut().save_cursor(),
            Command::RestoreCursor => self.grid_mut().restore_cursor(),
            Command::IdentifyTerminal => {
                // VT102 identity, same answer as CSI c.
                self.listener.send_event(Event::PtyWrite(b"\x1b[?6c".to_vec()));
            }
            Command::TabSet => debug!("HTS ignored: tab stops are fixed every 8 columns"),
            Command::KeypadApplication | Command::KeypadNumeric => {
                debug!("keypad mode changes are not tracked");
            }

            Command::Csi { intermediate, final_byte } => {
                self.csi_dispatch(intermediate, final_byte);
            }
            Command::Osc { arg_min, arg_max } => self.osc_dispatch(&seq[arg_min..arg_max]),

            Command::Delete
            | Command::Ignore
            | Command::SetCharset
            | Command::StringTerminator => {}

            // Filtered out by `run`.
            Command::Incomplete { .. } | Command::Invalid => {}
        }
    }
}

#[cfg(test)]
mod tests;
