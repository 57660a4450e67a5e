//! Pre/post hooks customizing a transition.
//!
//! A transition's behaviour beyond its map lives behind the [`Hooks`]
//! trait. Both methods have default implementations that let every call
//! advance and leave the context untouched; [`NoHooks`] is that default.
//! [`FnHooks`] assembles hooks from closures and is what
//! [`TransitionBuilder`] produces.
//!
//! Hooks run while the caller exclusively owns the machine. They must not
//! invoke transitions on the same machine; doing so waits for a pair that
//! will never be returned.
//!
//! [`TransitionBuilder`]: crate::builder::TransitionBuilder

use super::args::CallArgs;
use super::error::TransitionError;
use crate::core::{Guard, State};
use std::sync::Arc;

/// Outcome of a `pre` hook.
///
/// Both variants carry the context to continue with. A held call stores that
/// context even though the state does not change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision<C> {
    /// Look up the next state and run `post`
    Advance(C),
    /// Keep the current state; skip the lookup and `post`
    Hold(C),
}

impl<C> Decision<C> {
    pub fn from_parts(should_advance: bool, context: C) -> Self {
        if should_advance {
            Self::Advance(context)
        } else {
            Self::Hold(context)
        }
    }

    pub fn should_advance(&self) -> bool {
        matches!(self, Self::Advance(_))
    }

    pub fn into_parts(self) -> (bool, C) {
        match self {
            Self::Advance(context) => (true, context),
            Self::Hold(context) => (false, context),
        }
    }

    pub fn into_context(self) -> C {
        self.into_parts().1
    }
}

/// Guard and post-processing behaviour of a transition.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::transition::{CallArgs, Decision, Hooks, TransitionError};
/// use mailbox_fsm::state_enum;
///
/// state_enum! {
///     enum Kettle {
///         Cold,
///         Boiling,
///     }
/// }
///
/// struct NeedsWater;
///
/// impl Hooks<Kettle, u32> for NeedsWater {
///     fn pre(
///         &self,
///         _current: &Kettle,
///         litres: u32,
///         _args: &CallArgs<'_, ()>,
///     ) -> Result<Decision<u32>, TransitionError> {
///         Ok(Decision::from_parts(litres > 0, litres))
///     }
/// }
/// ```
pub trait Hooks<S, C, A = ()>: Send + Sync {
    /// Decide whether the call advances, optionally rewriting the context.
    fn pre(
        &self,
        _current: &S,
        context: C,
        _args: &CallArgs<'_, A>,
    ) -> Result<Decision<C>, TransitionError> {
        Ok(Decision::Advance(context))
    }

    /// Post-process the context once the next state is known.
    fn post(
        &self,
        _prev: &S,
        _next: &S,
        context: C,
        _args: &CallArgs<'_, A>,
    ) -> Result<C, TransitionError> {
        Ok(context)
    }
}

/// Hooks that always advance and never touch the context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoHooks;

impl<S, C, A> Hooks<S, C, A> for NoHooks {}

/// Closure form of `pre`.
pub type PreHook<S, C, A> = Arc<
    dyn Fn(&S, C, &CallArgs<'_, A>) -> Result<Decision<C>, TransitionError> + Send + Sync,
>;

/// Closure form of `post`.
pub type PostHook<S, C, A> =
    Arc<dyn Fn(&S, &S, C, &CallArgs<'_, A>) -> Result<C, TransitionError> + Send + Sync>;

/// Hooks assembled from an optional state guard and optional closures.
///
/// `pre` first consults the guard; a rejected state holds the call without
/// running the `pre` closure.
pub struct FnHooks<S: State, C, A = ()> {
    guard: Option<Guard<S>>,
    pre: Option<PreHook<S, C, A>>,
    post: Option<PostHook<S, C, A>>,
}

impl<S: State, C, A> FnHooks<S, C, A> {
    pub fn new() -> Self {
        Self {
            guard: None,
            pre: None,
            post: None,
        }
    }

    /// Hold the call whenever `guard` rejects the current state.
    pub fn with_guard(mut self, guard: Guard<S>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_pre<F>(mut self, pre: F) -> Self
    where
        F: Fn(&S, C, &CallArgs<'_, A>) -> Result<Decision<C>, TransitionError>
            + Send
            + Sync
            + 'static,
    {
        self.pre = Some(Arc::new(pre));
        self
    }

    pub fn with_post<F>(mut self, post: F) -> Self
    where
        F: Fn(&S, &S, C, &CallArgs<'_, A>) -> Result<C, TransitionError> + Send + Sync + 'static,
    {
        self.post = Some(Arc::new(post));
        self
    }

    pub fn is_noop(&self) -> bool {
        self.guard.is_none() && self.pre.is_none() && self.post.is_none()
    }
}

impl<S: State, C, A> Default for FnHooks<S, C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, C, A> Clone for FnHooks<S, C, A> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            pre: self.pre.clone(),
            post: self.post.clone(),
        }
    }
}

impl<S: State, C, A> Hooks<S, C, A> for FnHooks<S, C, A> {
    fn pre(
        &self,
        current: &S,
        context: C,
        args: &CallArgs<'_, A>,
    ) -> Result<Decision<C>, TransitionError> {
        if let Some(guard) = &self.guard {
            if !guard.check(current) {
                return Ok(Decision::Hold(context));
            }
        }
        match &self.pre {
            Some(pre) => pre(current, context, args),
            None => Ok(Decision::Advance(context)),
        }
    }

    fn post(
        &self,
        prev: &S,
        next: &S,
        context: C,
        args: &CallArgs<'_, A>,
    ) -> Result<C, TransitionError> {
        match &self.post {
            Some(post) => post(prev, next, context, args),
            None => Ok(context),
        }
    }
}
