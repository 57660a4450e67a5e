//! Named, reusable transitions.
//!
//! A [`Transition`] maps source states to destination states and carries
//! [`Hooks`] that guard the move and post-process the context. It holds no
//! per-call state, so one transition can be shared by any number of
//! machines; it is tied to a machine only at the call site, through
//! [`Machine::apply`] or [`Transition::bind`].
//!
//! # Invocation
//!
//! `call` runs the hook protocol on a pair:
//!
//! 1. `pre` decides whether to advance. [`Decision::Hold`] returns the
//!    current state with the context from `pre`; nothing else runs.
//! 2. The current state is looked up in the map. A miss is
//!    [`TransitionError::NoTransition`].
//! 3. `post` rewrites the context for the new state.
//!
//! [`Machine::apply`]: crate::machine::Machine::apply

mod args;
mod error;
mod hooks;

pub use args::CallArgs;
pub use error::{ArgError, TransitionError};
pub use hooks::{Decision, FnHooks, Hooks, NoHooks, PostHook, PreHook};

use crate::core::{State, StatePair};
use crate::machine::{BoundTransition, Machine};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Source state to destination state.
pub type TransitionMap<S> = HashMap<S, S>;

/// A named state-change operation.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::transition::Transition;
/// use mailbox_fsm::{state_enum, transition_map};
///
/// state_enum! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// let toggle: Transition<Light, ()> = Transition::new(
///     "toggle",
///     transition_map! { Light::Off => Light::On, Light::On => Light::Off },
/// );
///
/// let next = toggle.call(Light::Off, (), &[]).unwrap();
/// assert_eq!(next.state, Light::On);
/// ```
pub struct Transition<S: State, C, A = ()> {
    name: String,
    map: TransitionMap<S>,
    args: Option<Vec<String>>,
    hooks: Box<dyn Hooks<S, C, A>>,
}

impl<S: State, C, A> Transition<S, C, A> {
    /// Create a transition with default hooks and no declared arguments.
    pub fn new(name: impl Into<String>, map: TransitionMap<S>) -> Self {
        Self {
            name: name.into(),
            map,
            args: None,
            hooks: Box::new(NoHooks),
        }
    }

    /// Declare the names of the positional arguments, in order.
    pub fn with_args<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.args = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the hooks.
    pub fn with_hooks<H>(mut self, hooks: H) -> Self
    where
        H: Hooks<S, C, A> + 'static,
    {
        self.hooks = Box::new(hooks);
        self
    }

    pub(crate) fn with_boxed_hooks(mut self, hooks: Box<dyn Hooks<S, C, A>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions_map(&self) -> &TransitionMap<S> {
        &self.map
    }

    pub fn arg_names(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// Every state named by the map, as a source or a destination.
    pub fn known_states(&self) -> HashSet<S> {
        self.map
            .iter()
            .flat_map(|(from, to)| [from.clone(), to.clone()])
            .collect()
    }

    /// Look up the positional value bound to `name`.
    pub fn get_arg<'a>(&self, call_args: &'a [A], name: &str) -> Result<&'a A, ArgError> {
        args::lookup(self.arg_names(), call_args, name)
    }

    /// Run the `pre` hook.
    pub fn pre(
        &self,
        current: &S,
        context: C,
        call_args: &[A],
    ) -> Result<Decision<C>, TransitionError> {
        self.hooks.pre(current, context, &self.call_args(call_args))
    }

    /// Run the `post` hook.
    pub fn post(&self, prev: &S, next: &S, context: C, call_args: &[A]) -> Result<C, TransitionError> {
        self.hooks.post(prev, next, context, &self.call_args(call_args))
    }

    /// Compute the pair that follows `(current, context)`.
    pub fn call(
        &self,
        current: S,
        context: C,
        call_args: &[A],
    ) -> Result<StatePair<S, C>, TransitionError> {
        self.resolve(current, context, call_args)
            .map(|resolved| resolved.pair)
    }

    pub(crate) fn resolve(
        &self,
        current: S,
        context: C,
        call_args: &[A],
    ) -> Result<Resolved<S, C>, TransitionError> {
        let args = self.call_args(call_args);

        let context = match self.hooks.pre(&current, context, &args)? {
            Decision::Hold(context) => {
                return Ok(Resolved {
                    pair: StatePair::new(current, context),
                    advanced: false,
                })
            }
            Decision::Advance(context) => context,
        };

        let Some(next) = self.map.get(&current).cloned() else {
            return Err(TransitionError::NoTransition {
                transition: self.name.clone(),
                from: current.name().to_string(),
            });
        };

        let context = self.hooks.post(&current, &next, context, &args)?;
        Ok(Resolved {
            pair: StatePair::new(next, context),
            advanced: true,
        })
    }

    /// Tie this transition to `machine`, registering its states there.
    pub fn bind<'m>(&'m self, machine: &'m Machine<S, C>) -> BoundTransition<'m, S, C, A> {
        BoundTransition::new(machine, self)
    }

    fn call_args<'a>(&'a self, values: &'a [A]) -> CallArgs<'a, A> {
        CallArgs::new(self.arg_names(), values)
    }
}

/// A computed pair plus whether `pre` let the call advance.
pub(crate) struct Resolved<S, C> {
    pub(crate) pair: StatePair<S, C>,
    pub(crate) advanced: bool,
}

impl<S: State, C, A> fmt::Debug for Transition<S, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("map", &self.map)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
