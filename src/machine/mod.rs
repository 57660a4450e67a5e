//! Machines: a state cell plus the states its transitions may reach.
//!
//! A [`Machine`] owns one [`StateCell`] seeded at construction and the set of
//! known states. Applying a transition checks the pair out of the cell, runs
//! the transition, validates the destination and commits the result. Only
//! one call is in flight per machine at any time; other callers wait in
//! arrival order.

mod bound;
mod registry;

pub use bound::BoundTransition;
pub use registry::KnownStates;

use crate::core::{State, StateCell, StateChange, StateHistory, StatePair};
use crate::transition::{Transition, TransitionError};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Default buffer size for state change subscribers.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Largest subscriber buffer a builder accepts.
pub const MAX_EVENT_CAPACITY: usize = 1 << 16;

/// Default number of retained history records.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Tunables for a machine, set through [`MachineBuilder`].
///
/// [`MachineBuilder`]: crate::builder::MachineBuilder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Label attached to log records
    pub name: Option<String>,
    /// Maximum number of retained history records; `None` keeps all.
    /// Defaults to [`DEFAULT_HISTORY_LIMIT`].
    pub history_limit: Option<usize>,
    /// Changes buffered per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: None,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// A finite state machine whose transitions run one at a time.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::machine::Machine;
/// use mailbox_fsm::transition::Transition;
/// use mailbox_fsm::{state_enum, transition_map};
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let machine = Machine::new(|| Door::Closed, || 0u32);
/// let open: Transition<Door, u32> = Transition::new("open", transition_map! { Door::Closed => Door::Open });
///
/// let pair = machine.apply(&open, &[]).await.unwrap();
/// assert_eq!(pair.state, Door::Open);
///
/// // No transition out of Open: the machine keeps its pair.
/// assert!(machine.apply(&open, &[]).await.is_err());
/// assert_eq!(machine.query().await.state, Door::Open);
/// # }
/// ```
pub struct Machine<S: State, C> {
    id: Uuid,
    config: MachineConfig,
    cell: StateCell<S, C>,
    known_states: KnownStates<S>,
    history: Mutex<StateHistory<S>>,
    events: broadcast::Sender<StateChange<S>>,
}

impl<S: State, C> Machine<S, C> {
    /// Create a machine, invoking each factory once.
    pub fn new<FS, FC>(initial_state: FS, initial_context: FC) -> Self
    where
        FS: FnOnce() -> S,
        FC: FnOnce() -> C,
    {
        let pair = StatePair::new(initial_state(), initial_context());
        Self::with_config(pair, MachineConfig::default())
    }

    pub(crate) fn with_config(initial: StatePair<S, C>, config: MachineConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let machine = Self {
            id: Uuid::new_v4(),
            config,
            cell: StateCell::new(initial),
            known_states: KnownStates::new(),
            history: Mutex::new(history),
            events,
        };
        debug!(machine = %machine.id, name = machine.label(), "machine created");
        machine
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register states as valid destinations.
    pub fn add_states<I>(&self, states: I)
    where
        I: IntoIterator<Item = S>,
    {
        let added = self.known_states.extend(states);
        if added > 0 {
            trace!(machine = %self.id, added, "known states extended");
        }
    }

    /// Register every state mentioned by `transition`. Safe to repeat.
    pub fn attach<A>(&self, transition: &Transition<S, C, A>) {
        self.add_states(transition.known_states());
    }

    pub fn is_known(&self, state: &S) -> bool {
        self.known_states.contains(state)
    }

    pub fn known_states(&self) -> HashSet<S> {
        self.known_states.snapshot()
    }

    /// Copy of the recorded state changes.
    pub fn history(&self) -> StateHistory<S> {
        self.history.lock().clone()
    }

    /// Receive every state change committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange<S>> {
        self.events.subscribe()
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("-")
    }
}

impl<S: State, C: Clone> Machine<S, C> {
    /// Apply `transition` with positional `args`.
    ///
    /// Waits for exclusive access, runs the transition, checks that the
    /// resulting state is known and stores the new pair. On any error the
    /// previous pair is kept.
    pub async fn apply<A>(
        &self,
        transition: &Transition<S, C, A>,
        args: &[A],
    ) -> Result<StatePair<S, C>, TransitionError> {
        self.attach(transition);

        let checkout = self.cell.checkout().await;
        let StatePair { state, context } = checkout.pair().clone();
        let from = state.clone();

        let resolved = match transition.resolve(state, context, args) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(
                    machine = %self.id,
                    name = self.label(),
                    transition = transition.name(),
                    from = from.name(),
                    error = %err,
                    "transition aborted, state kept"
                );
                return Err(err);
            }
        };
        let next = resolved.pair;

        if !self.is_known(&next.state) {
            let err = TransitionError::InvalidState {
                transition: transition.name().to_string(),
                state: next.state.name().to_string(),
            };
            warn!(
                machine = %self.id,
                name = self.label(),
                transition = transition.name(),
                from = from.name(),
                error = %err,
                "transition aborted, state kept"
            );
            return Err(err);
        }

        let change = self.record(transition.name(), from, next.state.clone(), resolved.advanced);
        debug!(
            machine = %self.id,
            name = self.label(),
            transition = %change.transition,
            from = change.from.name(),
            to = change.to.name(),
            advanced = change.advanced,
            sequence = change.sequence,
            "state committed"
        );
        // No receivers is not an error.
        let _ = self.events.send(change);

        checkout.commit(next.clone());
        Ok(next)
    }

    /// Current pair.
    ///
    /// Queues behind in-flight transitions like any other caller.
    pub async fn query(&self) -> StatePair<S, C> {
        let checkout = self.cell.checkout().await;
        checkout.pair().clone()
    }
}

impl<S: State, C> Machine<S, C> {
    fn record(&self, transition: &str, from: S, to: S, advanced: bool) -> StateChange<S> {
        let mut history = self.history.lock();
        let change = StateChange {
            transition: transition.to_string(),
            from,
            to,
            advanced,
            sequence: history.next_sequence(),
            timestamp: Utc::now(),
        };
        *history = std::mem::take(&mut *history).record(change.clone());
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{Decision, FnHooks, TransitionMap};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Passed,
        Failed,
        Unregistered,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Passed => "Passed",
                Self::Failed => "Failed",
                Self::Unregistered => "Unregistered",
            }
        }
    }

    fn map(entries: &[(TestState, TestState)]) -> TransitionMap<TestState> {
        entries.iter().copied().collect()
    }

    #[test]
    fn factories_seed_the_cell() {
        let machine = Machine::new(|| TestState::Passed, || "ctx".to_string());

        assert!(machine.cell.is_occupied());
        assert!(machine.known_states().is_empty());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn attach_is_idempotent() {
        let machine: Machine<TestState, ()> = Machine::new(|| TestState::Passed, || ());
        let t: Transition<TestState, ()> =
            Transition::new("check", map(&[(TestState::Passed, TestState::Failed)]));

        machine.attach(&t);
        let once = machine.known_states();
        machine.attach(&t);
        machine.attach(&t);

        assert_eq!(machine.known_states(), once);
        assert_eq!(once.len(), 2);
    }

    #[tokio::test]
    async fn apply_commits_new_pair() {
        let machine = Machine::new(|| TestState::Passed, || 1u32);
        let t: Transition<TestState, u32> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        )
        .with_hooks(FnHooks::new().with_post(|_, _, context: u32, _| Ok(context + 1)));

        let next = machine.apply(&t, &[]).await.unwrap();

        assert_eq!(next, StatePair::new(TestState::Failed, 2));
        assert_eq!(machine.query().await, next);
    }

    #[tokio::test]
    async fn map_miss_keeps_stored_pair() {
        let machine = Machine::new(|| TestState::Failed, || 5u32);
        let t: Transition<TestState, u32> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        )
        .with_hooks(FnHooks::new().with_pre(|_, context: u32, _| Ok(Decision::Advance(context * 10))));

        let err = machine.apply(&t, &[]).await.unwrap_err();

        assert!(matches!(err, TransitionError::NoTransition { .. }));
        assert_eq!(machine.query().await, StatePair::new(TestState::Failed, 5));
        assert!(machine.history().is_empty());
    }

    #[tokio::test]
    async fn unknown_destination_is_invalid_state() {
        let machine = Machine::new(|| TestState::Passed, || 0u32);
        let t: Transition<TestState, u32> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        );
        machine.attach(&t);

        // A hook that smuggles in a state nobody registered.
        let rogue: Transition<TestState, u32> = Transition::new(
            "rogue",
            HashMap::new(),
        )
        .with_hooks(FnHooks::new().with_pre(|_, context: u32, _| Ok(Decision::Hold(context + 1))));

        let holder = Machine::new(|| TestState::Unregistered, || 0u32);
        let err = holder.apply(&rogue, &[]).await.unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidState {
                transition: "rogue".to_string(),
                state: "Unregistered".to_string(),
            }
        );
        assert_eq!(holder.query().await, StatePair::new(TestState::Unregistered, 0));

        // Registered destinations pass validation.
        assert!(machine.apply(&t, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn hook_error_keeps_stored_pair() {
        let machine = Machine::new(|| TestState::Passed, || "ctx".to_string());
        let t: Transition<TestState, String, &'static str> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        )
        .with_args(["present"])
        .with_hooks(FnHooks::new().with_pre(|_, context: String, args| {
            args.get("missing")?;
            Ok(Decision::Advance(context))
        }));

        let err = machine.apply(&t, &["x"]).await.unwrap_err();

        assert!(matches!(err, TransitionError::Argument(_)));
        assert_eq!(
            machine.query().await,
            StatePair::new(TestState::Passed, "ctx".to_string())
        );
    }

    #[tokio::test]
    async fn held_call_is_recorded_and_broadcast() {
        let machine = Machine::new(|| TestState::Passed, || 0u32);
        let mut events = machine.subscribe();
        let t: Transition<TestState, u32> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        )
        .with_hooks(FnHooks::new().with_pre(|_, context: u32, _| Ok(Decision::Hold(context + 1))));

        let next = machine.apply(&t, &[]).await.unwrap();
        assert_eq!(next, StatePair::new(TestState::Passed, 1));

        let change = events.recv().await.unwrap();
        assert_eq!(change.from, TestState::Passed);
        assert_eq!(change.to, TestState::Passed);
        assert!(!change.advanced);
        assert_eq!(change.sequence, 0);
        assert_eq!(machine.history().last(), Some(&change));
    }

    #[tokio::test]
    async fn default_history_is_bounded() {
        let machine = Machine::new(|| TestState::Passed, || 0u32);
        let t: Transition<TestState, u32> = Transition::new(
            "check",
            map(&[(TestState::Passed, TestState::Failed)]),
        )
        .with_hooks(FnHooks::new().with_pre(|_, context: u32, _| Ok(Decision::Hold(context))));

        let calls = DEFAULT_HISTORY_LIMIT + 16;
        for _ in 0..calls {
            machine.apply(&t, &[]).await.unwrap();
        }

        let history = machine.history();
        assert_eq!(machine.config().history_limit, Some(DEFAULT_HISTORY_LIMIT));
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.total_recorded(), calls as u64);
        assert_eq!(history.changes().next().map(|c| c.sequence), Some(16));
    }

    #[tokio::test]
    async fn panicking_hook_restores_pair() {
        let machine = Arc::new(Machine::new(|| TestState::Passed, || 7u32));
        let t: Arc<Transition<TestState, u32>> = Arc::new(
            Transition::new("check", map(&[(TestState::Passed, TestState::Failed)]))
                .with_hooks(FnHooks::new().with_post(|_, _, _: u32, _| -> Result<u32, TransitionError> {
                    panic!("hook blew up")
                })),
        );

        let task = {
            let machine = Arc::clone(&machine);
            let t = Arc::clone(&t);
            tokio::spawn(async move { machine.apply(&*t, &[]).await })
        };
        assert!(task.await.unwrap_err().is_panic());

        assert_eq!(machine.query().await, StatePair::new(TestState::Passed, 7));
    }
}
