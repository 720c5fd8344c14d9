//! Color types and the xterm-256 palette.

mod palette;

pub use palette::Palette;

/// A direct RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into `0x00RRGGBB` for pixel buffers.
    pub fn as_argb(self) -> u32 {
        0xff00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// A cell color: the terminal default, an xterm-256 palette index, or a
/// direct truecolor value (SGR 38;2 / 48;2).
///
/// `Default` resolves to the palette's default foreground or background
/// depending on which side of the cell it colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(Rgb),
}
