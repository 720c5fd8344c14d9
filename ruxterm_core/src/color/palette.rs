//! xterm-256 color palette.
//!
//! Layout: 0–15 ANSI, 16–231 6×6×6 cube, 232–255 grayscale ramp, plus
//! default foreground/background/cursor slots resolved from `Color::Default`.

use super::{Color, Rgb};

/// Number of indexed palette entries.
pub const NUM_INDEXED: usize = 256;

/// Standard xterm ANSI colors (indices 0–15).
const ANSI_COLORS: [Rgb; 16] = [
    Rgb { r: 0x00, g: 0x00, b: 0x00 }, // 0  Black
    Rgb { r: 0xcc, g: 0x00, b: 0x00 }, // 1  Red
    Rgb { r: 0x4e, g: 0x9a, b: 0x06 }, // 2  Green
    Rgb { r: 0xc4, g: 0xa0, b: 0x00 }, // 3  Yellow
    Rgb { r: 0x34, g: 0x65, b: 0xa4 }, // 4  Blue
    Rgb { r: 0x75, g: 0x50, b: 0x7b }, // 5  Magenta
    Rgb { r: 0x06, g: 0x98, b: 0x9a }, // 6  Cyan
    Rgb { r: 0xd3, g: 0xd7, b: 0xcf }, // 7  White
    Rgb { r: 0x55, g: 0x57, b: 0x53 }, // 8  Bright Black
    Rgb { r: 0xef, g: 0x29, b: 0x29 }, // 9  Bright Red
    Rgb { r: 0x8a, g: 0xe2, b: 0x34 }, // 10 Bright Green
    Rgb { r: 0xfc, g: 0xe9, b: 0x4f }, // 11 Bright Yellow
    Rgb { r: 0x72, g: 0x9f, b: 0xcf }, // 12 Bright Blue
    Rgb { r: 0xad, g: 0x7f, b: 0xa8 }, // 13 Bright Magenta
    Rgb { r: 0x34, g: 0xe2, b: 0xe2 }, // 14 Bright Cyan
    Rgb { r: 0xee, g: 0xee, b: 0xec }, // 15 Bright White
];

/// Default foreground (light gray).
const DEFAULT_FG: Rgb = Rgb { r: 0xd3, g: 0xd7, b: 0xcf };
/// Default background (black).
const DEFAULT_BG: Rgb = Rgb { r: 0x00, g: 0x00, b: 0x00 };
/// Default cursor color (white).
const DEFAULT_CURSOR: Rgb = Rgb { r: 0xff, g: 0xff, b: 0xff };

/// 256-entry indexed palette plus default foreground/background/cursor slots.
#[derive(Debug, Clone)]
pub struct Palette {
    indexed: [Rgb; NUM_INDEXED],
    foreground: Rgb,
    background: Rgb,
    cursor: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            indexed: build_indexed(),
            foreground: DEFAULT_FG,
            background: DEFAULT_BG,
            cursor: DEFAULT_CURSOR,
        }
    }
}

impl Palette {
    /// Resolve a foreground color to a concrete `Rgb`.
    pub fn resolve_fg(&self, color: Color) -> Rgb {
        match color {
            Color::Default => self.foreground,
            Color::Indexed(idx) => self.indexed[idx as usize],
            Color::Rgb(rgb) => rgb,
        }
    }

    /// Resolve a background color to a concrete `Rgb`.
    pub fn resolve_bg(&self, color: Color) -> Rgb {
        match color {
            Color::Default => self.background,
            Color::Indexed(idx) => self.indexed[idx as usize],
            Color::Rgb(rgb) => rgb,
        }
    }

    /// Default foreground color.
    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Default background color.
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Cursor color.
    pub fn cursor_color(&self) -> Rgb {
        self.cursor
    }
}

/// Build the indexed section of the xterm-256 palette.
fn build_indexed() -> [Rgb; NUM_INDEXED] {
    let mut colors = [Rgb::default(); NUM_INDEXED];

    // 0–15: ANSI colors.
    colors[..16].copy_from_slice(&ANSI_COLORS);

    // 16–231: 6×6×6 color cube.
    for r in 0..6u8 {
        for g in 0..6u8 {
            for b in 0..6u8 {
                let idx = 16 + (r as usize * 36) + (g as usize * 6) + b as usize;
                colors[idx] = Rgb {
                    r: if r == 0 { 0 } else { 55 + r * 40 },
                    g: if g == 0 { 0 } else { 55 + g * 40 },
                    b: if b == 0 { 0 } else { 55 + b * 40 },
                };
            }
        }
    }

    // 232–255: grayscale ramp.
    for i in 0..24u8 {
        let v = 8 + i * 10;
        colors[232 + i as usize] = Rgb { r: v, g: v, b: v };
    }

    colors
}
