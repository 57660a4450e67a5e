//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{State, StatePair};
use crate::machine::{Machine, MachineConfig, MAX_EVENT_CAPACITY};
use crate::transition::Transition;

type Factory<T> = Box<dyn FnOnce() -> T>;

/// Builder for constructing machines with a fluent API.
///
/// Factories are invoked once, inside [`build`](MachineBuilder::build).
pub struct MachineBuilder<S: State, C> {
    initial_state: Option<Factory<S>>,
    initial_context: Option<Factory<C>>,
    states: Vec<S>,
    config: MachineConfig,
}

impl<S: State, C: 'static> MachineBuilder<S, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial_state: None,
            initial_context: None,
            states: Vec::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(self, state: S) -> Self {
        self.initial_with(move || state)
    }

    /// Set a factory producing the initial state.
    pub fn initial_with<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> S + 'static,
    {
        self.initial_state = Some(Box::new(factory));
        self
    }

    /// Set the initial context (required).
    pub fn context(self, context: C) -> Self {
        self.context_with(move || context)
    }

    /// Set a factory producing the initial context.
    pub fn context_with<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> C + 'static,
    {
        self.initial_context = Some(Box::new(factory));
        self
    }

    /// Label used in log records.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Keep at most `limit` history records.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Keep every history record for the life of the machine.
    pub fn unbounded_history(mut self) -> Self {
        self.config.history_limit = None;
        self
    }

    /// Buffer size for each state change subscriber. Zero is treated as one;
    /// anything above [`MAX_EVENT_CAPACITY`] fails the build.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Register a transition's states up front.
    pub fn attach<A>(mut self, transition: &Transition<S, C, A>) -> Self {
        self.states.extend(transition.known_states());
        self
    }

    /// Register extra states as valid destinations.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.states.extend(states);
        self
    }

    /// Build the machine.
    /// Returns an error if the initial state or context is missing, or if
    /// the event capacity is out of range.
    pub fn build(self) -> Result<Machine<S, C>, BuildError> {
        let initial_state = self.initial_state.ok_or(BuildError::MissingInitialState)?;
        let initial_context = self
            .initial_context
            .ok_or(BuildError::MissingInitialContext)?;
        if self.config.event_capacity > MAX_EVENT_CAPACITY {
            return Err(BuildError::InvalidEventCapacity {
                capacity: self.config.event_capacity,
                max: MAX_EVENT_CAPACITY,
            });
        }

        let initial = StatePair::new(initial_state(), initial_context());
        let machine = Machine::with_config(initial, self.config);
        machine.add_states(self.states);
        Ok(machine)
    }
}

impl<S: State, C: 'static> Default for MachineBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, C> Machine<S, C> {
    /// Start building a machine.
    pub fn builder() -> MachineBuilder<S, C>
    where
        C: 'static,
    {
        MachineBuilder::new()
    }
}
