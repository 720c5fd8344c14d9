//! Startup wiring: fonts, window, PTY, renderer, then the event loop.

mod error;
mod event_loop;
mod font;
mod keybindings;
mod keymap;
mod pty;
mod render;
mod window;

use log::error;

use ruxterm_core::grid::Size;
use ruxterm_core::Term;

use crate::error::Result;
use crate::event_loop::{EventLoop, EventProxy, SCROLLBACK_ROWS};
use crate::font::FontCache;
use crate::pty::Pty;
use crate::render::Renderer;
use crate::window::X11Window;

const DEFAULT_FONT_SIZE: f32 = 14.0;
const INITIAL_COLS: usize = 80;
const INITIAL_ROWS: usize = 24;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("fatal: {e}");
        eprintln!("ruxterm: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let family = std::env::var("RUXTERM_FONT").unwrap_or_else(|_| "monospace".into());
    let font = FontCache::new(&family, DEFAULT_FONT_SIZE)?;
    let metrics = font.metrics();

    let width = (INITIAL_COLS * metrics.cell_width) as u16;
    let height = (INITIAL_ROWS * metrics.cell_height) as u16;
    let window = X11Window::new(width, height, "ruxterm")?;

    let proxy = EventProxy::default();
    let term = Term::new(
        Size::new(INITIAL_COLS, INITIAL_ROWS, SCROLLBACK_ROWS),
        proxy.clone(),
    );
    let pty = Pty::spawn(INITIAL_COLS as u16, INITIAL_ROWS as u16, width, height)?;
    let renderer = Renderer::new(&window, INITIAL_COLS, INITIAL_ROWS)?;

    EventLoop::new(window, term, proxy, pty, font, renderer)?.run()
}
