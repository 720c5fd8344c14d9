//! Keysym-to-bytes encoding.
//!
//! Translates the keysym resolved from an X key press into the byte
//! sequence the shell expects: literal bytes for printables, control
//! codes for Ctrl+letter, and xterm-style escape sequences for the
//! editing and function keys.

use bitflags::bitflags;

bitflags! {
    /// Modifier state of a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 1;
        const CONTROL = 1 << 1;
        const ALT     = 1 << 2;
    }
}

// The keysyms this emulator reacts to (X11/keysymdef.h values).
pub const XK_BACKSPACE: u32 = 0xff08;
pub const XK_TAB: u32 = 0xff09;
pub const XK_RETURN: u32 = 0xff0d;
pub const XK_ESCAPE: u32 = 0xff1b;
pub const XK_HOME: u32 = 0xff50;
pub const XK_LEFT: u32 = 0xff51;
pub const XK_UP: u32 = 0xff52;
pub const XK_RIGHT: u32 = 0xff53;
pub const XK_DOWN: u32 = 0xff54;
pub const XK_PAGE_UP: u32 = 0xff55;
pub const XK_PAGE_DOWN: u32 = 0xff56;
pub const XK_END: u32 = 0xff57;
pub const XK_INSERT: u32 = 0xff63;
pub const XK_KP_ENTER: u32 = 0xff8d;
pub const XK_F1: u32 = 0xffbe;
pub const XK_F12: u32 = 0xffc9;
pub const XK_DELETE: u32 = 0xffff;

/// Offset of Unicode keysyms (`0x0100_0000 | codepoint`).
const UNICODE_KEYSYM_BASE: u32 = 0x0100_0000;

/// Encode a key press into the bytes written to the shell. Returns an
/// empty vector for keys that produce no input (bare modifiers, unknown
/// function keys).
pub fn encode_key(keysym: u32, mods: Modifiers) -> Vec<u8> {
    // Ctrl+letter produces the corresponding C0 control code.
    if mods.contains(Modifiers::CONTROL) {
        let lower = match keysym {
            0x41..=0x5a => keysym + 0x20,
            _ => keysym,
        };
        if (0x61..=0x7a).contains(&lower) {
            return vec![(lower - 0x60) as u8];
        }
    }

    match keysym {
        XK_RETURN | XK_KP_ENTER => b"\r".to_vec(),
        XK_BACKSPACE => vec![0x7f],
        XK_TAB => b"\t".to_vec(),
        XK_ESCAPE => vec![0x1b],
        XK_UP => b"\x1b[A".to_vec(),
        XK_DOWN => b"\x1b[B".to_vec(),
        XK_RIGHT => b"\x1b[C".to_vec(),
        XK_LEFT => b"\x1b[D".to_vec(),
        XK_HOME => b"\x1b[H".to_vec(),
        XK_END => b"\x1b[F".to_vec(),
        XK_INSERT => b"\x1b[2~".to_vec(),
        XK_DELETE => b"\x1b[3~".to_vec(),
        XK_PAGE_UP => b"\x1b[5~".to_vec(),
        XK_PAGE_DOWN => b"\x1b[6~".to_vec(),
        XK_F1..=XK_F12 => function_key(keysym),

        // Printable ASCII arrives pre-shifted through the keymap columns.
        0x20..=0x7e => vec![keysym as u8],

        // Latin-1 keysyms map directly to their codepoints.
        0xa0..=0xff => encode_char(keysym),

        // Unicode keysyms carry the codepoint in the low bits.
        UNICODE_KEYSYM_BASE.. => encode_char(keysym - UNICODE_KEYSYM_BASE),

        _ => Vec::new(),
    }
}

fn encode_char(cp: u32) -> Vec<u8> {
    char::from_u32(cp).map_or_else(Vec::new, |ch| {
        let mut buf = [0u8; 4];
        ch.encode_utf8(&mut buf).as_bytes().to_vec()
    })
}

fn function_key(keysym: u32) -> Vec<u8> {
    match keysym - XK_F1 {
        0 => b"\x1bOP".to_vec(),
        1 => b"\x1bOQ".to_vec(),
        2 => b"\x1bOR".to_vec(),
        3 => b"\x1bOS".to_vec(),
        // F5..F12 use the tilde form with xterm's historical gaps.
        4 => b"\x1b[15~".to_vec(),
        5 => b"\x1b[17~".to_vec(),
        6 => b"\x1b[18~".to_vec(),
        7 => b"\x1b[19~".to_vec(),
        8 => b"\x1b[20~".to_vec(),
        9 => b"\x1b[21~".to_vec(),
        10 => b"\x1b[23~".to_vec(),
        11 => b"\x1b[24~".to_vec(),
        _ => Vec::new(),
    }
}
