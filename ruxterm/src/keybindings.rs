//! Fixed keyboard shortcut table.
//!
//! Shortcuts are resolved before key encoding; a matched binding consumes
//! the key press so no bytes reach the shell.

use crate::keymap::{Modifiers, XK_ESCAPE};

/// Action to execute when a keybinding matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Close the window and exit.
    CloseWindow,
    /// Grow the font by a factor of 1.1.
    IncreaseFontSize,
    /// Shrink the font by a factor of 1/1.1.
    DecreaseFontSize,
    /// Request the clipboard contents for pasting.
    Paste,
}

/// A shortcut: keysym (letters stored lowercase) + exact modifier set.
#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub keysym: u32,
    pub mods: Modifiers,
    pub action: Action,
}

/// The built-in shortcut table.
pub fn default_bindings() -> Vec<KeyBinding> {
    let ctrl = Modifiers::CONTROL;
    let shift = Modifiers::SHIFT;

    vec![
        KeyBinding { keysym: XK_ESCAPE, mods: shift, action: Action::CloseWindow },
        KeyBinding { keysym: b'1' as u32, mods: ctrl, action: Action::DecreaseFontSize },
        KeyBinding { keysym: b'2' as u32, mods: ctrl, action: Action::IncreaseFontSize },
        KeyBinding { keysym: b'v' as u32, mods: ctrl | shift, action: Action::Paste },
    ]
}

/// Find the first binding matching the given key and modifiers.
/// Letter keysyms are compared case-insensitively so shifted letters
/// still match their binding.
pub fn find_binding(bindings: &[KeyBinding], keysym: u32, mods: Modifiers) -> Option<Action> {
    let keysym = normalize(keysym);
    bindings
        .iter()
        .find(|b| b.keysym == keysym && b.mods == mods)
        .map(|b| b.action)
}

fn normalize(keysym: u32) -> u32 {
    match keysym {
        0x41..=0x5a => keysym + 0x20,
        _ => keysym,
    }
}
