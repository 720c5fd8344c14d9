//! Fatal and recoverable error types for the front-end.

use thiserror::Error;

/// Errors that can abort startup or an operation in the platform layer.
///
/// Per-event recoverable conditions (unknown escapes, unmappable
/// codepoints) are logged and absorbed long before they reach this type;
/// anything surfacing here during startup is fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open display: {0}")]
    Connect(#[from] xcb::ConnError),

    #[error("X11 protocol error: {0}")]
    Protocol(#[from] xcb::ProtocolError),

    #[error("X11 error: {0}")]
    X11(#[from] xcb::Error),

    #[error("FreeType error: {0}")]
    FreeType(#[from] freetype::Error),

    #[error("font resolution failed: {0}")]
    Font(String),

    #[error("render: {0}")]
    Render(String),

    #[error("pseudo-terminal error: {0}")]
    Pty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
