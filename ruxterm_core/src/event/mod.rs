//! Terminal event types and listener trait.
//!
//! Events flow outward from the interpreter to the platform layer: window
//! title changes, the bell, and reply bytes destined for the shell. The
//! `EventListener` trait decouples `Term<T>` from any windowing code;
//! tests use `VoidListener`, the front-end queues events for its loop.

/// Terminal events produced while interpreting shell output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Window title changed (OSC 0/2).
    Title(String),
    /// BEL received.
    Bell,
    /// Reply bytes to enqueue on the shell's write queue (DA responses).
    PtyWrite(Vec<u8>),
}

/// Receives terminal events from `Term<T>`.
///
/// The default implementation is a no-op so `VoidListener` needs no body.
pub trait EventListener {
    /// Handle a terminal event. Default: no-op.
    fn send_event(&self, _event: Event) {}
}

/// No-op event listener for tests and headless operation.
pub struct VoidListener;

impl EventListener for VoidListener {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{Event, EventListener, VoidListener};

    #[test]
    fn void_listener_swallows_events() {
        VoidListener.send_event(Event::Bell);
    }

    #[test]
    fn collecting_listener_sees_events_in_order() {
        #[derive(Default)]
        struct Collector(RefCell<Vec<Event>>);

        impl EventListener for Collector {
            fn send_event(&self, event: Event) {
                self.0.borrow_mut().push(event);
            }
        }

        let listener = Collector::default();
        listener.send_event(Event::Bell);
        listener.send_event(Event::Title("t".into()));
        assert_eq!(
            *listener.0.borrow(),
            vec![Event::Bell, Event::Title("t".into())]
        );
    }
}
