//! The multicast channel
//!
//! `EventChannel` keeps its listeners behind a `RefCell` so every operation takes
//! `&self`. A listener can therefore add or remove listeners on the very channel
//! that is invoking it. Invocation works on a snapshot of the listener list:
//!
//! - listeners added while `invoke` runs are first called by the next `invoke`
//! - listeners removed while `invoke` runs are still called by the current one
//!
//! No borrow of the list is held while a listener runs.

use crate::listener::{Handler, Listener, ListenerId};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::rc::Rc;

/// One registration: a listener and the id it was registered under
struct Entry<A> {
    id: ListenerId,
    listener: Listener<A>,
}

/// An ordered list of listeners that are all called when the event fires
///
/// `A` is the argument passed to each listener by reference. Use `()` for events
/// without arguments and a tuple for events with several.
///
/// # Example
/// ```
/// use event_channel::EventChannel;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let channel = EventChannel::<(u32, String)>::new();
///
/// let sink = Rc::clone(&seen);
/// let id = channel.add_listener(move |(code, text)| {
///     sink.borrow_mut().push(format!("{}:{}", code, text));
/// });
///
/// channel.invoke((7, "ready".to_string()));
/// assert!(channel.remove_listener(id));
/// channel.invoke((8, "ignored".to_string()));
///
/// assert_eq!(*seen.borrow(), vec!["7:ready".to_string()]);
/// ```
pub struct EventChannel<A = ()> {
    entries: RefCell<Vec<Entry<A>>>,
    next_id: Cell<u64>,
}

impl<A> EventChannel<A> {
    /// Create an empty channel
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a closure or function as a new listener
    ///
    /// The listener created here has no other handle, so it can only be removed
    /// through the returned id. Use [`EventChannel::add`] with a kept
    /// [`Listener`] to remove by value instead.
    pub fn add_listener<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&A) + 'static,
    {
        self.add(Listener::new(f))
    }

    /// Append an existing listener
    ///
    /// Adding the same listener twice registers it twice; it is then called
    /// twice per invocation.
    pub fn add(&self, listener: Listener<A>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut entries = self.entries.borrow_mut();
        entries.push(Entry { id, listener });
        log::debug!("Added listener {} ({} registered)", id, entries.len());
        id
    }

    /// Remove the first registration of `listener`
    ///
    /// Returns `false` and leaves the channel untouched when the listener is
    /// not registered. At most one registration is removed per call.
    pub fn remove(&self, listener: &Listener<A>) -> bool {
        let removed = self.take_first(|entry| entry.listener == *listener);
        match removed {
            Some(entry) => {
                log::debug!("Removed listener {} ({} registered)", entry.id, self.len());
                true
            }
            None => {
                log::trace!("Listener not registered, nothing removed");
                false
            }
        }
    }

    /// Remove the registration identified by `id`
    ///
    /// Returns `false` when the id is unknown or already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.take_first(|entry| entry.id == id);
        match removed {
            Some(_) => {
                log::debug!("Removed listener {} ({} registered)", id, self.len());
                true
            }
            None => {
                log::trace!("Listener {} not registered, nothing removed", id);
                false
            }
        }
    }

    /// Detach the first entry matching `pred`
    ///
    /// The entry is returned so it is dropped by the caller, after the borrow of
    /// the list has ended.
    fn take_first<P>(&self, pred: P) -> Option<Entry<A>>
    where
        P: Fn(&Entry<A>) -> bool,
    {
        let mut entries = self.entries.borrow_mut();
        let index = entries.iter().position(pred)?;
        Some(entries.remove(index))
    }

    /// Call every registered listener, in insertion order, with `args`
    ///
    /// A panic raised by a listener propagates to the caller. Listeners after
    /// the panicking one are not called for this invocation.
    pub fn invoke(&self, args: A) {
        let snapshot: Vec<Handler<A>> = self
            .entries
            .borrow()
            .iter()
            .map(|entry| Rc::clone(entry.listener.handler()))
            .collect();

        log::trace!("Invoking {} listener(s)", snapshot.len());
        for handler in &snapshot {
            handler(&args);
        }
    }

    /// Whether `listener` has at least one registration
    pub fn contains(&self, listener: &Listener<A>) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.listener == *listener)
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the channel has no registrations
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Remove every registration
    pub fn clear(&self) {
        // Drop the listeners after releasing the borrow, their captures may
        // touch this channel when dropped.
        let removed = std::mem::take(&mut *self.entries.borrow_mut());
        log::debug!("Cleared {} listener(s)", removed.len());
    }
}

impl<A> Default for EventChannel<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventChannel<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.len())
            .finish()
    }
}

/// `channel += listener` is [`EventChannel::add`]
impl<A> AddAssign<Listener<A>> for EventChannel<A> {
    fn add_assign(&mut self, listener: Listener<A>) {
        self.add(listener);
    }
}

/// `channel -= &listener` is [`EventChannel::remove`]
impl<A> SubAssign<&Listener<A>> for EventChannel<A> {
    fn sub_assign(&mut self, listener: &Listener<A>) {
        self.remove(listener);
    }
}
