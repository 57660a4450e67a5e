//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, State};
use crate::transition::{
    CallArgs, Decision, FnHooks, Hooks, Transition, TransitionError, TransitionMap,
};
use std::collections::HashMap;

/// Builder for constructing transitions with a fluent API.
///
/// ```rust
/// use mailbox_fsm::builder::TransitionBuilder;
/// use mailbox_fsm::transition::Transition;
/// use mailbox_fsm::state_enum;
///
/// state_enum! {
///     enum Pump {
///         Idle,
///         Running,
///     }
/// }
///
/// let start: Transition<Pump, u32> = TransitionBuilder::<Pump, u32>::new()
///     .name("start")
///     .map(Pump::Idle, Pump::Running)
///     .post(|_, _, runs, _| Ok(runs + 1))
///     .build()
///     .unwrap();
///
/// assert_eq!(start.call(Pump::Idle, 0, &[]).unwrap().context, 1);
/// ```
pub struct TransitionBuilder<S: State, C, A = ()> {
    name: Option<String>,
    entries: Vec<(S, S)>,
    args: Option<Vec<String>>,
    hooks: FnHooks<S, C, A>,
    custom: Option<Box<dyn Hooks<S, C, A>>>,
}

impl<S: State, C: 'static, A: 'static> TransitionBuilder<S, C, A> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            name: None,
            entries: Vec::new(),
            args: None,
            hooks: FnHooks::new(),
            custom: None,
        }
    }

    /// Set the transition name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Map a source state to a destination state (at least one required).
    pub fn map(mut self, from: S, to: S) -> Self {
        self.entries.push((from, to));
        self
    }

    /// Add several mappings.
    pub fn maps<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
    {
        self.entries.extend(entries);
        self
    }

    /// Declare positional argument names (optional).
    pub fn args<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.args = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.hooks = self.hooks.with_guard(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Set the `pre` hook (optional).
    pub fn pre<F>(mut self, pre: F) -> Self
    where
        F: Fn(&S, C, &CallArgs<'_, A>) -> Result<Decision<C>, TransitionError>
            + Send
            + Sync
            + 'static,
    {
        self.hooks = self.hooks.with_pre(pre);
        self
    }

    /// Set the `post` hook (optional).
    pub fn post<F>(mut self, post: F) -> Self
    where
        F: Fn(&S, &S, C, &CallArgs<'_, A>) -> Result<C, TransitionError> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_post(post);
        self
    }

    /// Use a [`Hooks`] implementation instead of closures.
    ///
    /// Takes precedence over anything set with `guard`, `when`, `pre` or
    /// `post`.
    pub fn hooks<H>(mut self, hooks: H) -> Self
    where
        H: Hooks<S, C, A> + 'static,
    {
        self.custom = Some(Box::new(hooks));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, C, A>, BuildError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or(BuildError::MissingName)?;

        if self.entries.is_empty() {
            return Err(BuildError::EmptyTransitionMap);
        }

        let mut map: TransitionMap<S> = HashMap::with_capacity(self.entries.len());
        for (from, to) in self.entries {
            if map.contains_key(&from) {
                return Err(BuildError::DuplicateSource {
                    state: from.name().to_string(),
                });
            }
            map.insert(from, to);
        }

        let mut transition = Transition::new(name, map);
        if let Some(args) = self.args {
            transition = transition.with_args(args);
        }
        if let Some(custom) = self.custom {
            transition = transition.with_boxed_hooks(custom);
        } else if !self.hooks.is_noop() {
            transition = transition.with_hooks(self.hooks);
        }
        Ok(transition)
    }
}

impl<S: State, C: 'static, A: 'static> Default for TransitionBuilder<S, C, A> {
    fn default() -> Self {
        Self::new()
    }
}
