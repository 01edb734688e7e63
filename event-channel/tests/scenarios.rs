// Listener ordering, removal and re-entrancy through the public API
use event_channel::{EventChannel, Listener, ListenerId};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<&'static str>>>;

fn new_log() -> Log {
    let _ = env_logger::builder().is_test(true).try_init();
    Rc::new(RefCell::new(Vec::new()))
}

fn named(log: &Log, name: &'static str) -> Listener<()> {
    let log = Rc::clone(log);
    Listener::new(move |_| log.borrow_mut().push(name))
}

#[test]
fn invoke_without_listeners_does_nothing() {
    let log = new_log();
    let channel = EventChannel::<()>::new();

    channel.invoke(());

    assert!(log.borrow().is_empty());
    assert!(channel.is_empty());
}

#[test]
fn listeners_run_in_insertion_order() {
    let log = new_log();
    let channel = EventChannel::new();
    channel.add(named(&log, "A"));
    channel.add(named(&log, "B"));
    channel.add(named(&log, "C"));

    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
}

#[test]
fn every_listener_sees_the_same_arguments() {
    let _ = env_logger::builder().is_test(true).try_init();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let channel = EventChannel::<(String, u8)>::new();

    for tag in ["first", "second"] {
        let seen = Rc::clone(&seen);
        channel.add_listener(move |(name, level)| {
            seen.borrow_mut().push(format!("{} {} {}", tag, name, level));
        });
    }

    channel.invoke(("volume".to_string(), 40));

    assert_eq!(
        *seen.borrow(),
        vec!["first volume 40".to_string(), "second volume 40".to_string()]
    );
}

#[test]
fn removing_first_listener_keeps_the_rest() {
    let log = new_log();
    let channel = EventChannel::new();
    let a = named(&log, "A");
    channel.add(a.clone());
    channel.add(named(&log, "B"));

    assert!(channel.remove(&a));
    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["B"]);
}

#[test]
fn duplicate_listener_is_removed_once_per_call() {
    let log = new_log();
    let channel = EventChannel::new();
    let a = named(&log, "A");
    channel.add(a.clone());
    channel.add(a.clone());

    assert!(channel.remove(&a));
    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["A"]);
    assert_eq!(channel.len(), 1);
}

#[test]
fn removing_unknown_listener_changes_nothing() {
    let log = new_log();
    let channel = EventChannel::new();
    channel.add(named(&log, "A"));
    let stranger = named(&log, "X");

    assert!(!channel.remove(&stranger));
    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["A"]);
}

#[test]
fn closures_can_only_be_removed_by_id() {
    let log = new_log();
    let channel = EventChannel::<()>::new();
    let sink = Rc::clone(&log);
    let id = channel.add_listener(move |_| sink.borrow_mut().push("closure"));

    // A look-alike closure is a different listener
    let sink = Rc::clone(&log);
    let look_alike = Listener::new(move |_: &()| sink.borrow_mut().push("closure"));
    assert!(!channel.remove(&look_alike));

    assert!(channel.remove_listener(id));
    assert!(!channel.remove_listener(id));
    channel.invoke(());

    assert!(log.borrow().is_empty());
}

#[test]
fn listener_added_during_invoke_runs_next_time() {
    let log = new_log();
    let channel = Rc::new(EventChannel::<()>::new());
    let late = named(&log, "late");

    let weak = Rc::downgrade(&channel);
    let sink = Rc::clone(&log);
    channel.add_listener(move |_| {
        sink.borrow_mut().push("adder");
        if let Some(channel) = weak.upgrade() {
            if !channel.contains(&late) {
                channel.add(late.clone());
            }
        }
    });

    channel.invoke(());
    assert_eq!(*log.borrow(), vec!["adder"]);

    channel.invoke(());
    assert_eq!(*log.borrow(), vec!["adder", "adder", "late"]);
}

#[test]
fn listener_removed_during_invoke_still_runs_once() {
    let log = new_log();
    let channel = Rc::new(EventChannel::<()>::new());
    let victim = named(&log, "victim");

    let weak = Rc::downgrade(&channel);
    let sink = Rc::clone(&log);
    let target = victim.clone();
    channel.add_listener(move |_| {
        sink.borrow_mut().push("remover");
        if let Some(channel) = weak.upgrade() {
            channel.remove(&target);
        }
    });
    channel.add(victim);

    channel.invoke(());
    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["remover", "victim", "remover"]);
}

#[test]
fn listener_can_remove_itself() {
    let log = new_log();
    let channel = Rc::new(EventChannel::<()>::new());
    let own_id: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

    let weak = Rc::downgrade(&channel);
    let sink = Rc::clone(&log);
    let slot = Rc::clone(&own_id);
    let id = channel.add_listener(move |_| {
        sink.borrow_mut().push("once");
        if let (Some(channel), Some(id)) = (weak.upgrade(), *slot.borrow()) {
            channel.remove_listener(id);
        }
    });
    *own_id.borrow_mut() = Some(id);

    channel.invoke(());
    channel.invoke(());

    assert_eq!(*log.borrow(), vec!["once"]);
    assert!(channel.is_empty());
}

#[test]
fn panicking_listener_propagates_and_channel_stays_usable() {
    let log = new_log();
    let channel = EventChannel::new();
    channel.add(named(&log, "before"));
    let bomb = Listener::new(|_: &()| panic!("listener failed"));
    channel.add(bomb.clone());
    channel.add(named(&log, "after"));

    let result = panic::catch_unwind(AssertUnwindSafe(|| channel.invoke(())));
    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec!["before"]);

    assert!(channel.remove(&bomb));
    channel.invoke(());
    assert_eq!(*log.borrow(), vec!["before", "before", "after"]);
}
