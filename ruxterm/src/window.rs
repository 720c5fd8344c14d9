//! X11 window plumbing over xcb.
//!
//! Owns the display connection, the single terminal window, atom lookups,
//! the core-protocol keyboard mapping, and clipboard paste requests.
//! Events drain through `poll_event` into a small platform-neutral enum
//! the event loop consumes.

use std::os::unix::io::{AsRawFd, RawFd};

use log::warn;
use xcb::{x, Xid};

use crate::error::{Error, Result};
use crate::keymap::Modifiers;

/// Events the platform reports to the event loop.
#[derive(Debug)]
pub enum WindowEvent {
    /// A key press, resolved to a keysym plus modifier state.
    Key { keysym: u32, mods: Modifiers },
    /// The window took a new size.
    Resize { width: u16, height: u16 },
    /// Clipboard contents arrived after `request_paste` (empty when the
    /// selection owner had nothing to offer).
    Paste(Vec<u8>),
    /// The window became (partially) visible again.
    Exposed,
    /// The window manager asked us to close.
    CloseRequested,
}

struct Atoms {
    wm_protocols: x::Atom,
    wm_delete_window: x::Atom,
    net_wm_name: x::Atom,
    utf8_string: x::Atom,
    clipboard: x::Atom,
    paste_target: x::Atom,
}

impl Atoms {
    fn intern(conn: &xcb::Connection) -> Result<Self> {
        let request = |name: &'static [u8]| {
            conn.send_request(&x::InternAtom { only_if_exists: false, name })
        };
        let wm_protocols = request(b"WM_PROTOCOLS");
        let wm_delete_window = request(b"WM_DELETE_WINDOW");
        let net_wm_name = request(b"_NET_WM_NAME");
        let utf8_string = request(b"UTF8_STRING");
        let clipboard = request(b"CLIPBOARD");
        let paste_target = request(b"RUXTERM_PASTE");

        Ok(Self {
            wm_protocols: conn.wait_for_reply(wm_protocols)?.atom(),
            wm_delete_window: conn.wait_for_reply(wm_delete_window)?.atom(),
            net_wm_name: conn.wait_for_reply(net_wm_name)?.atom(),
            utf8_string: conn.wait_for_reply(utf8_string)?.atom(),
            clipboard: conn.wait_for_reply(clipboard)?.atom(),
            paste_target: conn.wait_for_reply(paste_target)?.atom(),
        })
    }
}

/// The core-protocol keysym table (two columns per keycode consulted:
/// plain and shifted).
struct Keymap {
    first_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn fetch(conn: &xcb::Connection) -> Result<Self> {
        let setup = conn.get_setup();
        let first_keycode = setup.min_keycode();
        let count = setup.max_keycode().saturating_sub(first_keycode).saturating_add(1);

        let cookie = conn.send_request(&x::GetKeyboardMapping { first_keycode, count });
        let reply = conn.wait_for_reply(cookie)?;
        Ok(Self {
            first_keycode,
            keysyms_per_keycode: reply.keysyms_per_keycode(),
            keysyms: reply.keysyms().to_vec(),
        })
    }

    /// Resolve a keycode to a keysym using the two-level shift rule: the
    /// shifted column when non-empty, else the uppercased plain column.
    fn keysym(&self, keycode: u8, shift: bool) -> u32 {
        if keycode < self.first_keycode {
            return 0;
        }
        let base_idx =
            usize::from(keycode - self.first_keycode) * usize::from(self.keysyms_per_keycode);
        let plain = self.keysyms.get(base_idx).copied().unwrap_or(0);
        if !shift {
            return plain;
        }

        let shifted = self.keysyms.get(base_idx + 1).copied().unwrap_or(0);
        if shifted != 0 {
            return shifted;
        }
        if (0x61..=0x7a).contains(&plain) {
            return plain - 0x20;
        }
        plain
    }
}

/// The display connection and terminal window.
pub struct X11Window {
    conn: xcb::Connection,
    window: x::Window,
    gc: x::Gcontext,
    width: u16,
    height: u16,
    atoms: Atoms,
    keymap: Keymap,
    /// Event peeked by `has_queued_event`, delivered on the next poll.
    queued: Option<xcb::Event>,
}

impl X11Window {
    pub fn new(width: u16, height: u16, title: &str) -> Result<Self> {
        let (conn, screen_num) = xcb::Connection::connect(None)?;

        let (root, root_visual, root_depth, black) = {
            let setup = conn.get_setup();
            let screen = setup
                .roots()
                .nth(screen_num as usize)
                .ok_or_else(|| Error::Render("requested screen does not exist".into()))?;
            (screen.root(), screen.root_visual(), screen.root_depth(), screen.black_pixel())
        };
        if root_depth != 24 {
            return Err(Error::Render(format!("unsupported root depth {root_depth}")));
        }

        let window: x::Window = conn.generate_id();
        conn.send_and_check_request(&x::CreateWindow {
            depth: x::COPY_FROM_PARENT as u8,
            wid: window,
            parent: root,
            x: 0,
            y: 0,
            width,
            height,
            border_width: 0,
            class: x::WindowClass::InputOutput,
            visual: root_visual,
            value_list: &[
                x::Cw::BackPixel(black),
                x::Cw::EventMask(
                    x::EventMask::EXPOSURE | x::EventMask::KEY_PRESS | x::EventMask::STRUCTURE_NOTIFY,
                ),
            ],
        })?;

        let gc: x::Gcontext = conn.generate_id();
        conn.send_and_check_request(&x::CreateGc {
            cid: gc,
            drawable: x::Drawable::Window(window),
            value_list: &[],
        })?;

        let atoms = Atoms::intern(&conn)?;
        conn.send_and_check_request(&x::ChangeProperty {
            mode: x::PropMode::Replace,
            window,
            property: atoms.wm_protocols,
            r#type: x::ATOM_ATOM,
            data: &[atoms.wm_delete_window],
        })?;

        let keymap = Keymap::fetch(&conn)?;

        conn.send_and_check_request(&x::MapWindow { window })?;
        conn.flush()?;

        let this = Self { conn, window, gc, width, height, atoms, keymap, queued: None };
        this.set_title(title);
        Ok(this)
    }

    pub fn conn(&self) -> &xcb::Connection {
        &self.conn
    }

    pub fn window(&self) -> x::Window {
        self.window
    }

    pub fn gc(&self) -> x::Gcontext {
        self.gc
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// The connection's file descriptor, for the event loop's poller.
    pub fn fd(&self) -> RawFd {
        self.conn.as_raw_fd()
    }

    /// Whether an event is already sitting in the connection's queue
    /// (in which case the event loop skips its waiter).
    pub fn has_queued_event(&mut self) -> bool {
        if self.queued.is_none() {
            self.queued = self.conn.poll_for_queued_event().ok().flatten();
        }
        self.queued.is_some()
    }

    /// Drain one event, translating it for the event loop. Returns `None`
    /// when the queue is empty.
    pub fn poll_event(&mut self) -> Result<Option<WindowEvent>> {
        loop {
            let event = match self.queued.take() {
                Some(event) => event,
                None => match self.conn.poll_for_event()? {
                    Some(event) => event,
                    None => return Ok(None),
                },
            };

            match event {
                xcb::Event::X(x::Event::KeyPress(ev)) => {
                    let mods = modifiers_from(ev.state());
                    let keysym = self.keymap.keysym(ev.detail(), mods.contains(Modifiers::SHIFT));
                    if keysym != 0 {
                        return Ok(Some(WindowEvent::Key { keysym, mods }));
                    }
                }
                xcb::Event::X(x::Event::ConfigureNotify(ev)) => {
                    if ev.width() != self.width || ev.height() != self.height {
                        self.width = ev.width();
                        self.height = ev.height();
                        return Ok(Some(WindowEvent::Resize {
                            width: self.width,
                            height: self.height,
                        }));
                    }
                }
                xcb::Event::X(x::Event::Expose(ev)) => {
                    if ev.count() == 0 {
                        return Ok(Some(WindowEvent::Exposed));
                    }
                }
                xcb::Event::X(x::Event::ClientMessage(ev)) => {
                    if let x::ClientMessageData::Data32(data) = ev.data() {
                        if data[0] == self.atoms.wm_delete_window.resource_id() {
                            return Ok(Some(WindowEvent::CloseRequested));
                        }
                    }
                }
                xcb::Event::X(x::Event::SelectionNotify(ev)) => {
                    let bytes = if ev.property() == x::ATOM_NONE {
                        Vec::new()
                    } else {
                        self.read_paste_property()?
                    };
                    return Ok(Some(WindowEvent::Paste(bytes)));
                }
                xcb::Event::X(x::Event::MappingNotify(_)) => match Keymap::fetch(&self.conn) {
                    Ok(keymap) => self.keymap = keymap,
                    Err(e) => warn!("keyboard mapping refresh failed: {e}"),
                },
                _ => {}
            }
        }
    }

    /// Set both the legacy and EWMH window titles.
    pub fn set_title(&self, title: &str) {
        self.conn.send_request(&x::ChangeProperty {
            mode: x::PropMode::Replace,
            window: self.window,
            property: x::ATOM_WM_NAME,
            r#type: x::ATOM_STRING,
            data: title.as_bytes(),
        });
        self.conn.send_request(&x::ChangeProperty {
            mode: x::PropMode::Replace,
            window: self.window,
            property: self.atoms.net_wm_name,
            r#type: self.atoms.utf8_string,
            data: title.as_bytes(),
        });
        if let Err(e) = self.conn.flush() {
            warn!("title update failed: {e}");
        }
    }

    /// Ask the clipboard owner for UTF-8 contents; completion arrives
    /// later as `WindowEvent::Paste`.
    pub fn request_paste(&self) {
        self.conn.send_request(&x::ConvertSelection {
            requestor: self.window,
            selection: self.atoms.clipboard,
            target: self.atoms.utf8_string,
            property: self.atoms.paste_target,
            time: x::CURRENT_TIME,
        });
        if let Err(e) = self.conn.flush() {
            warn!("paste request failed: {e}");
        }
    }

    /// One-shot property read of a delivered selection. Transfers larger
    /// than the requested length are truncated (no INCR support).
    fn read_paste_property(&self) -> Result<Vec<u8>> {
        let cookie = self.conn.send_request(&x::GetProperty {
            delete: true,
            window: self.window,
            property: self.atoms.paste_target,
            r#type: self.atoms.utf8_string,
            long_offset: 0,
            long_length: 1 << 20,
        });
        let reply = self.conn.wait_for_reply(cookie)?;
        Ok(reply.value::<u8>().to_vec())
    }
}

fn modifiers_from(state: x::KeyButMask) -> Modifiers {
    let mut mods = Modifiers::empty();
    if state.contains(x::KeyButMask::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if state.contains(x::KeyButMask::CONTROL) {
        mods |= Modifiers::CONTROL;
    }
    if state.contains(x::KeyButMask::MOD1) {
        mods |= Modifiers::ALT;
    }
    mods
}
