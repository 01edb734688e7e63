//! Binding methods of shared objects as listeners

/// Build a listener closure that calls a method on an `Rc`-owned instance
///
/// The closure only keeps a `Weak` reference to the instance. The channel never
/// extends the lifetime of the objects its listeners point at: once the last
/// `Rc` is dropped, the bound listener does nothing.
///
/// - `bind_method!(obj, Type::method)` calls `method(&self)`, ignoring the
///   event arguments
/// - `bind_method!(obj, Type::method, arg)` calls `method(&self, &A)`
/// - `bind_method!(obj, Type::method, a, b, ...)` destructures a tuple argument
///   and calls `method(&self, &a, &b, ...)`
///
/// # Example
/// ```
/// use event_channel::{bind_method, EventChannel};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Meter {
///     total: Cell<u32>,
/// }
///
/// impl Meter {
///     fn record(&self, amount: &u32, factor: &u32) {
///         self.total.set(self.total.get() + amount * factor);
///     }
/// }
///
/// let meter = Rc::new(Meter { total: Cell::new(0) });
/// let channel = EventChannel::<(u32, u32)>::new();
/// channel.add_listener(bind_method!(meter, Meter::record, amount, factor));
///
/// channel.invoke((3, 2));
/// assert_eq!(meter.total.get(), 6);
/// ```
#[macro_export]
macro_rules! bind_method {
    ($instance:expr, $method:path) => {{
        let weak = ::std::rc::Rc::downgrade(&$instance);
        move |_: &_| {
            if let ::std::option::Option::Some(instance) = weak.upgrade() {
                $method(&*instance);
            }
        }
    }};
    ($instance:expr, $method:path, $arg:ident) => {{
        let weak = ::std::rc::Rc::downgrade(&$instance);
        move |$arg: &_| {
            if let ::std::option::Option::Some(instance) = weak.upgrade() {
                $method(&*instance, $arg);
            }
        }
    }};
    ($instance:expr, $method:path, $($arg:ident),+) => {{
        let weak = ::std::rc::Rc::downgrade(&$instance);
        move |($($arg,)+)| {
            if let ::std::option::Option::Some(instance) = weak.upgrade() {
                $method(&*instance, $($arg),+);
            }
        }
    }};
}
