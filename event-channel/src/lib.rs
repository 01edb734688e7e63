//! Event Channel Library
//!
//! A small multicast event utility: an [`EventChannel`] holds an ordered list of
//! listeners sharing one argument type, and calls all of them when the event is
//! invoked. Objects expose a channel as their "event" field and invoke it when
//! the occurrence happens, without knowing who listens.
//!
//! # Architecture
//!
//! - [`EventChannel<A>`]: the ordered listener list with add/remove/invoke
//! - [`Listener<A>`]: a shared handler value, equal only to its own clones
//! - [`ListenerId`]: the handle returned by every add, for removal by id
//! - [`bind_method!`]: turns a method of an `Rc`-owned object into a listener
//!
//! Events with several arguments use a tuple as `A`; events without arguments
//! use `()`.
//!
//! The library does NOT:
//! - Synchronize access across threads (channels are `!Send` and `!Sync`)
//! - Order listeners by anything other than insertion
//! - Catch panics raised by listeners
//!
//! # Example Usage
//!
//! ```
//! use event_channel::{EventChannel, Listener};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Slider {
//!     value: i32,
//!     on_value_changed: EventChannel<i32>,
//! }
//!
//! impl Slider {
//!     fn set(&mut self, value: i32) {
//!         self.value = value;
//!         self.on_value_changed.invoke(value);
//!     }
//! }
//!
//! let mut slider = Slider { value: 0, on_value_changed: EventChannel::new() };
//! let history = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&history);
//! let listener = Listener::new(move |value: &i32| sink.borrow_mut().push(*value));
//! slider.on_value_changed += listener.clone();
//!
//! slider.set(4);
//! slider.on_value_changed -= &listener;
//! slider.set(5);
//!
//! assert_eq!(*history.borrow(), vec![4]);
//! ```

// Public modules
pub mod channel;
pub mod listener;

// Internal modules (not exposed in public API)
mod bind;

// Re-export main types for convenience
pub use channel::EventChannel;
pub use listener::{Listener, ListenerId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh channel can be invoked with nothing registered
        let channel = EventChannel::<()>::new();
        channel.invoke(());
        assert!(channel.is_empty());
    }
}
