//! The latency-adaptive event loop.
//!
//! Multiplexes the display connection and the shell PTY on one thread.
//! Each iteration waits (unless display events are already queued),
//! drains window events, pushes pending writes to the shell until it
//! would block, feeds shell output to the interpreter, and then decides
//! whether to redraw: immediately in the idle regime, or deferred to a
//! 40 ms cadence once the waiter keeps completing in under a millisecond
//! (a busy shell saturating the loop).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info};
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};

use ruxterm_core::grid::{PrivateModes, Size};
use ruxterm_core::{Event, EventListener, Palette, Term};

use crate::error::Result;
use crate::font::FontCache;
use crate::keybindings::{self, Action, KeyBinding};
use crate::keymap::{self, Modifiers};
use crate::pty::Pty;
use crate::render::Renderer;
use crate::window::{WindowEvent, X11Window};

const TOKEN_DISPLAY: Token = Token(0);
const TOKEN_PTY: Token = Token(1);

/// Redraw cadence while the loop is saturated.
const REDRAW_INTERVAL: Duration = Duration::from_millis(40);
/// A waiter round-trip under this counts towards the busy regime.
const FAST_WAIT: Duration = Duration::from_millis(1);
/// Consecutive fast waits before redraws are deferred.
const FAST_WAIT_THRESHOLD: u32 = 10;
/// Bounds of the shell read buffer (`min(2 · largest read, 4 MiB)`).
const MIN_READ_BUFFER: usize = 4096;
const MAX_READ_BUFFER: usize = 4 * 1024 * 1024;

/// Scrollback capacity of the primary screen.
pub const SCROLLBACK_ROWS: usize = 10_000;

/// Queues interpreter events for the loop to apply between batches.
#[derive(Default, Clone)]
pub struct EventProxy(Rc<RefCell<VecDeque<Event>>>);

impl EventListener for EventProxy {
    fn send_event(&self, event: Event) {
        self.0.borrow_mut().push_back(event);
    }
}

pub struct EventLoop {
    window: X11Window,
    term: Term<EventProxy>,
    proxy: EventProxy,
    pty: Pty,
    font: FontCache,
    renderer: Renderer,
    palette: Palette,
    bindings: Vec<KeyBinding>,

    poll: Poll,
    write_queue: VecDeque<u8>,
    pty_writable: bool,

    read_buf: Vec<u8>,
    largest_read: usize,

    fast_waits: u32,
    last_redraw: Instant,
    dirty: bool,
    pending_resize: Option<(u16, u16)>,
}

impl EventLoop {
    pub fn new(
        window: X11Window,
        term: Term<EventProxy>,
        proxy: EventProxy,
        pty: Pty,
        font: FontCache,
        renderer: Renderer,
    ) -> Result<Self> {
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut SourceFd(&window.fd()), TOKEN_DISPLAY, Interest::READABLE)?;
        poll.registry()
            .register(&mut SourceFd(&pty.fd()), TOKEN_PTY, Interest::READABLE)?;

        Ok(Self {
            window,
            term,
            proxy,
            pty,
            font,
            renderer,
            palette: Palette::default(),
            bindings: keybindings::default_bindings(),
            poll,
            write_queue: VecDeque::new(),
            pty_writable: false,
            read_buf: Vec::new(),
            largest_read: 0,
            fast_waits: 0,
            last_redraw: Instant::now(),
            dirty: true,
            pending_resize: None,
        })
    }

    /// Run until the window closes or the shell hangs up.
    pub fn run(&mut self) -> Result<()> {
        let mut events = Events::with_capacity(16);

        loop {
            if !self.window.has_queued_event() {
                let timeout = self.wait_timeout();
                let started = Instant::now();
                match self.poll.poll(&mut events, timeout) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
                if started.elapsed() < FAST_WAIT {
                    self.fast_waits = self.fast_waits.saturating_add(1);
                } else {
                    self.fast_waits = 0;
                }
            }

            if !self.drain_display_events()? {
                return Ok(());
            }

            self.flush_writes()?;

            if !self.read_shell()? {
                info!("shell hung up, exiting");
                return Ok(());
            }
            self.apply_term_events()?;

            if let Some((width, height)) = self.pending_resize.take() {
                self.apply_resize(width, height)?;
            }

            self.maybe_redraw()?;
        }
    }

    /// How long the waiter may block: indefinitely when idle, or until
    /// the next allowed redraw while one is deferred.
    fn wait_timeout(&self) -> Option<Duration> {
        if self.dirty && self.fast_waits > FAST_WAIT_THRESHOLD {
            Some(REDRAW_INTERVAL.saturating_sub(self.last_redraw.elapsed()))
        } else {
            None
        }
    }

    /// Returns `false` when the loop should exit.
    fn drain_display_events(&mut self) -> Result<bool> {
        while let Some(event) = self.window.poll_event()? {
            match event {
                WindowEvent::Key { keysym, mods } => {
                    if !self.handle_key(keysym, mods)? {
                        return Ok(false);
                    }
                }
                WindowEvent::Resize { width, height } => {
                    self.pending_resize = Some((width, height));
                }
                WindowEvent::Paste(bytes) => self.enqueue_paste(&bytes)?,
                WindowEvent::Exposed => self.dirty = true,
                WindowEvent::CloseRequested => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Shortcuts first; unconsumed keys encode to shell bytes. Returns
    /// `false` when the close shortcut fired.
    fn handle_key(&mut self, keysym: u32, mods: Modifiers) -> Result<bool> {
        if let Some(action) = keybindings::find_binding(&self.bindings, keysym, mods) {
            match action {
                Action::CloseWindow => return Ok(false),
                Action::IncreaseFontSize => self.change_font_size(1.1)?,
                Action::DecreaseFontSize => self.change_font_size(1.0 / 1.1)?,
                Action::Paste => self.window.request_paste(),
            }
            return Ok(true);
        }

        let bytes = keymap::encode_key(keysym, mods);
        if !bytes.is_empty() {
            self.write_queue.extend(bytes);
            self.update_pty_interest()?;
        }
        Ok(true)
    }

    /// Enqueue pasted bytes, wrapped in bracketed-paste markers when the
    /// shell opted in via mode 2004.
    fn enqueue_paste(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let bracketed = self.term.grid().modes().contains(PrivateModes::BRACKETED_PASTE);
        if bracketed {
            self.write_queue.extend(*b"\x1b[200~");
        }
        self.write_queue.extend(bytes);
        if bracketed {
            self.write_queue.extend(*b"\x1b[201~");
        }
        self.update_pty_interest()
    }

    /// Push queued bytes to the shell until done or it would block.
    fn flush_writes(&mut self) -> Result<()> {
        while !self.write_queue.is_empty() {
            let (front, _) = self.write_queue.as_slices();
            match self.pty.write(front) {
                Ok(0) => break,
                Ok(n) => {
                    self.write_queue.drain(..n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.update_pty_interest()
    }

    /// Poll for shell writability only while bytes are waiting.
    fn update_pty_interest(&mut self) -> Result<()> {
        let want_writable = !self.write_queue.is_empty();
        if want_writable != self.pty_writable {
            let interest = if want_writable {
                Interest::READABLE | Interest::WRITABLE
            } else {
                Interest::READABLE
            };
            self.poll
                .registry()
                .reregister(&mut SourceFd(&self.pty.fd()), TOKEN_PTY, interest)?;
            self.pty_writable = want_writable;
        }
        Ok(())
    }

    /// Read and interpret everything the shell has. Returns `false` on
    /// hangup.
    fn read_shell(&mut self) -> Result<bool> {
        loop {
            let want = (self.largest_read * 2).clamp(MIN_READ_BUFFER, MAX_READ_BUFFER);
            self.read_buf.resize(want, 0);
            match self.pty.read(&mut self.read_buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.largest_read = self.largest_read.max(n);
                    self.term.advance(&self.read_buf[..n]);
                    if n < want {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                // EIO from the master side means the child is gone.
                Err(e) if e.raw_os_error() == Some(libc::EIO) => return Ok(false),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }

    /// Apply interpreter events (title, bell, replies to the shell).
    fn apply_term_events(&mut self) -> Result<()> {
        loop {
            let event = self.proxy.0.borrow_mut().pop_front();
            let Some(event) = event else { break };
            match event {
                Event::Title(title) => self.window.set_title(&title),
                Event::Bell => debug!("bell"),
                Event::PtyWrite(bytes) => {
                    self.write_queue.extend(bytes);
                    self.update_pty_interest()?;
                }
            }
        }
        Ok(())
    }

    /// Coalesced resize: rebuild the grid at the new cell geometry,
    /// reflow old content into it, and tell the kernel.
    fn apply_resize(&mut self, width: u16, height: u16) -> Result<()> {
        let metrics = self.font.metrics();
        let cols = (usize::from(width) / metrics.cell_width).max(1);
        let rows = (usize::from(height) / metrics.cell_height).max(1);

        if cols != self.term.grid().cols() || rows != self.term.grid().rows() {
            self.term.resize(Size::new(cols, rows, SCROLLBACK_ROWS));
            self.pty.resize(cols as u16, rows as u16, width, height);
        }
        self.renderer.resize(&self.window, cols, rows)?;
        self.dirty = true;
        Ok(())
    }

    /// Font zoom: flush the glyph caches and re-derive the grid from the
    /// unchanged window size.
    fn change_font_size(&mut self, factor: f32) -> Result<()> {
        self.font.set_size(self.font.size() * factor);
        self.renderer.flush_glyphs(&self.window)?;
        let (width, height) = self.window.size();
        self.apply_resize(width, height)
    }

    fn maybe_redraw(&mut self) -> Result<()> {
        if self.term.grid_mut().take_dirty() {
            self.dirty = true;
        }
        if !self.dirty {
            return Ok(());
        }

        let busy = self.fast_waits > FAST_WAIT_THRESHOLD;
        if busy && self.last_redraw.elapsed() < REDRAW_INTERVAL {
            // Deferred; `wait_timeout` wakes the loop when it is due.
            return Ok(());
        }

        self.renderer.draw(
            &self.window,
            self.term.grid(),
            &self.palette,
            &mut self.font,
            self.term.cursor_shape(),
        )?;
        self.last_redraw = Instant::now();
        self.dirty = false;
        Ok(())
    }
}
