//! Core terminal emulation data structures and logic.
//!
//! This crate provides the foundational types for terminal emulation:
//! cell representation, ring-buffered grid storage with scrollback and
//! reflow, the streaming escape-sequence parser, and the interpreter
//! that maps parsed commands to grid mutations. It contains no GUI,
//! rendering, or platform-specific code.

#![deny(unsafe_code)]

pub mod cell;
pub mod color;
pub mod event;
pub mod grid;
pub mod index;
pub mod parser;
pub mod term;

pub use cell::{Cell, CellFlags, Style, StyleFlags};
pub use color::{Color, Palette, Rgb};
pub use event::{Event, EventListener, VoidListener};
pub use grid::{Cursor, CursorShape, Grid, LineInsertPoint, PrivateModes, Size};
pub use index::Line;
pub use parser::{Command, Params};
pub use term::Term;
