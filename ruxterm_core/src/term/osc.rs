//! OSC sequence dispatch.

use log::warn;

use crate::event::{Event, EventListener};

use super::Term;

/// Longest accepted window title, in bytes.
const MAX_TITLE_LEN: usize = 4096;

impl<T: EventListener> Term<T> {
    /// Dispatch an OSC command. The payload is the raw byte range between
    /// the numeric prefix and the terminator.
    pub(super) fn osc_dispatch(&mut self, payload: &[u8]) {
        match self.params.get_or(0, 0) {
            // Set icon name / window title.
            0 | 2 => {
                let bounded = &payload[..payload.len().min(MAX_TITLE_LEN)];
                let title = String::from_utf8_lossy(bounded).into_owned();
                self.title.clone_from(&title);
                self.listener.send_event(Event::Title(title));
            }
            // Hyperlinks: accepted but not tracked.
            8 => {}
            code => warn!("unhandled OSC {code}"),
        }
    }
}
