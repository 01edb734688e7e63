//! Scenario execution
//!
//! Builds one `EventChannel<String>` per scenario, wires the named listeners to
//! an invocation log and replays the steps against it.

use crate::config::{Reaction, ScenarioConfig, StepConfig};
use crate::error::{Result, ScenarioError};
use event_channel::{EventChannel, Listener, ListenerId};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// A single listener call recorded during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// 1-based number of the `invoke` step that caused the call
    pub round: usize,
    pub listener: String,
    pub payload: String,
}

/// Everything observed while running a scenario
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub channel: String,
    pub rounds: usize,
    pub invocations: Vec<Invocation>,
    pub remaining_listeners: usize,
}

impl Outcome {
    /// Calls made during one round, in call order
    pub fn round(&self, round: usize) -> Vec<&Invocation> {
        self.invocations
            .iter()
            .filter(|call| call.round == round)
            .collect()
    }
}

/// State shared between the runner and the listeners it creates
///
/// Listeners only hold a `Weak` to this, so the listener map does not form a
/// cycle with the channel that stores the listeners.
struct Session {
    channel: EventChannel<String>,
    listeners: RefCell<HashMap<String, Listener<String>>>,
    log: RefCell<Vec<Invocation>>,
    round: Cell<usize>,
}

impl Session {
    fn listener(&self, name: &str) -> Option<Listener<String>> {
        self.listeners.borrow().get(name).cloned()
    }

    fn react(&self, source: &str, reaction: &Reaction) {
        let Some(target) = self.listener(reaction.listener()) else {
            log::warn!("'{}' reacts on unknown listener '{}'", source, reaction.listener());
            return;
        };

        match reaction {
            Reaction::Add { listener } => {
                let id = self.channel.add(target);
                log::debug!("'{}' added '{}' as {}", source, listener, id);
            }
            Reaction::Remove { listener } => {
                let removed = self.channel.remove(&target);
                log::debug!("'{}' removed '{}': {}", source, listener, removed);
            }
        }
    }
}

/// Create the recording listener for `name`
fn recording_listener(session: Weak<Session>, name: String, on_fire: Vec<Reaction>) -> Listener<String> {
    Listener::new(move |payload: &String| {
        let Some(session) = session.upgrade() else {
            return;
        };

        session.log.borrow_mut().push(Invocation {
            round: session.round.get(),
            listener: name.clone(),
            payload: payload.clone(),
        });

        for reaction in &on_fire {
            session.react(&name, reaction);
        }
    })
}

/// Run a scenario and collect the invocation log
///
/// The scenario is validated first, so a run never stops half way because of a
/// misspelled listener name. The only runtime failure is a `remove_id` step for
/// an `add` that has not happened yet.
pub fn run(config: &ScenarioConfig) -> Result<Outcome> {
    config.validate()?;

    let session = Rc::new(Session {
        channel: EventChannel::new(),
        listeners: RefCell::new(HashMap::new()),
        log: RefCell::new(Vec::new()),
        round: Cell::new(0),
    });

    for listener in &config.listeners {
        let recorder = recording_listener(
            Rc::downgrade(&session),
            listener.name.clone(),
            listener.on_fire.clone(),
        );
        session
            .listeners
            .borrow_mut()
            .insert(listener.name.clone(), recorder);
    }

    // Ids of every `add` step, per listener, in step order
    let mut added: HashMap<&str, Vec<ListenerId>> = HashMap::new();

    for (index, step) in config.steps.iter().enumerate() {
        let step_no = index + 1;
        log::trace!("Step {}: {:?}", step_no, step);

        match step {
            StepConfig::Add { listener } => {
                let target = lookup(&session, listener, step_no)?;
                let id = session.channel.add(target);
                added.entry(listener.as_str()).or_default().push(id);
            }
            StepConfig::Remove { listener } => {
                let target = lookup(&session, listener, step_no)?;
                if !session.channel.remove(&target) {
                    log::info!("Step {}: '{}' was not registered", step_no, listener);
                }
            }
            StepConfig::RemoveId {
                listener,
                occurrence,
            } => {
                let id = occurrence
                    .checked_sub(1)
                    .and_then(|n| added.get(listener.as_str())?.get(n).copied())
                    .ok_or_else(|| ScenarioError::MissingRegistration {
                        listener: listener.clone(),
                        occurrence: *occurrence,
                        step: step_no,
                    })?;
                if !session.channel.remove_listener(id) {
                    log::info!("Step {}: registration {} of '{}' already gone", step_no, id, listener);
                }
            }
            StepConfig::Invoke { payload } => {
                session.round.set(session.round.get() + 1);
                log::debug!(
                    "Round {}: invoking '{}' with {} listener(s)",
                    session.round.get(),
                    config.channel.name,
                    session.channel.len()
                );
                session.channel.invoke(payload.clone());
            }
            StepConfig::Clear => session.channel.clear(),
        }
    }

    let invocations = session.log.borrow().clone();
    let outcome = Outcome {
        channel: config.channel.name.clone(),
        rounds: session.round.get(),
        invocations,
        remaining_listeners: session.channel.len(),
    };

    log::info!(
        "Scenario '{}' finished: {} round(s), {} call(s)",
        outcome.channel,
        outcome.rounds,
        outcome.invocations.len()
    );
    Ok(outcome)
}

fn lookup(session: &Session, name: &str, step: usize) -> Result<Listener<String>> {
    session
        .listener(name)
        .ok_or_else(|| ScenarioError::UnknownListener {
            name: name.to_string(),
            context: format!("step {}", step),
        })
}
