//! Guard predicates over the current state.
//!
//! A guard is the simplest form of pre-condition: a pure boolean function of
//! the current state. Transitions built with [`TransitionBuilder::when`]
//! hold in place whenever their guard rejects the current state.
//!
//! [`TransitionBuilder::when`]: crate::builder::TransitionBuilder::when

use super::state::State;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a transition may advance.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::core::{Guard, State};
/// use mailbox_fsm::state_enum;
///
/// state_enum! {
///     enum Task {
///         Pending,
///         Running,
///         Done,
///     }
///     final: [Done]
/// }
///
/// let can_advance = Guard::new(|state: &Task| !state.is_final());
///
/// assert!(can_advance.check(&Task::Pending));
/// assert!(can_advance.check(&Task::Running));
/// assert!(!can_advance.check(&Task::Done));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows advancing from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
