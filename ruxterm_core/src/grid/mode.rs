//! Private mode flags (DECSET/DECRST).

use bitflags::bitflags;

bitflags! {
    /// Numerically coded boolean settings toggled by `CSI ? n h` / `l`.
    ///
    /// Only the modes required to host modern line editors, pagers, and a
    /// full-screen editor are tracked; unknown codes are logged and
    /// dropped by the interpreter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PrivateModes: u8 {
        /// Mode 25 (DECTCEM): cursor visible.
        const CURSOR_VISIBLE  = 1;
        /// Mode 1049: alternate screen buffer.
        const ALT_SCREEN      = 1 << 1;
        /// Mode 2004: bracketed paste.
        const BRACKETED_PASTE = 1 << 2;
    }
}

impl Default for PrivateModes {
    fn default() -> Self {
        Self::CURSOR_VISIBLE
    }
}
