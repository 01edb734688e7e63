//! Listener values and registration handles
//!
//! A `Listener` is the stored form of a handler. It is reference counted so that
//! the channel can take a snapshot of its handlers before invoking them, and so
//! that callers can keep a clone around to remove the handler by value later.

use std::fmt;
use std::rc::Rc;

/// Shared handler type stored by the channel
pub(crate) type Handler<A> = Rc<dyn Fn(&A)>;

/// A handler registered (or registrable) on an `EventChannel<A>`
///
/// Equality is identity: clones of one listener are equal to each other, while
/// two listeners created separately are never equal, even when they wrap the
/// same function.
///
/// # Example
/// ```
/// use event_channel::{EventChannel, Listener};
///
/// let channel = EventChannel::<u32>::new();
/// let listener = Listener::new(|value: &u32| println!("value = {}", value));
///
/// channel.add(listener.clone());
/// assert!(channel.remove(&listener));
/// assert!(channel.is_empty());
/// ```
pub struct Listener<A> {
    handler: Handler<A>,
}

impl<A> Listener<A> {
    /// Wrap a closure or function as a listener
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) + 'static,
    {
        Self {
            handler: Rc::new(f),
        }
    }

    /// Run the handler directly, outside of any channel
    pub fn call(&self, args: &A) {
        (self.handler)(args)
    }

    pub(crate) fn handler(&self) -> &Handler<A> {
        &self.handler
    }
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<A> PartialEq for Listener<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<A> Eq for Listener<A> {}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("handler", &Rc::as_ptr(&self.handler).cast::<()>())
            .finish()
    }
}

/// Opaque handle returned when a listener is added to a channel
///
/// Ids are never reused by the channel that issued them, so removing by id
/// cannot hit a different registration than the one it was returned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
