//! A transition paired with the machine it acts on.

use super::Machine;
use crate::core::{State, StatePair};
use crate::transition::{Transition, TransitionError};

/// A transition tied to one machine.
///
/// Binding registers the transition's states with the machine, after which
/// [`invoke`](BoundTransition::invoke) applies it like a method on that
/// machine.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::machine::Machine;
/// use mailbox_fsm::transition::Transition;
/// use mailbox_fsm::{state_enum, transition_map};
///
/// state_enum! {
///     enum Job {
///         Queued,
///         Running,
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let machine = Machine::new(|| Job::Queued, || ());
/// let start: Transition<Job, ()> = Transition::new("start", transition_map! { Job::Queued => Job::Running });
///
/// let start = start.bind(&machine);
/// assert!(machine.is_known(&Job::Running));
///
/// assert_eq!(start.invoke(&[]).await.unwrap().state, Job::Running);
/// # }
/// ```
pub struct BoundTransition<'m, S: State, C, A = ()> {
    machine: &'m Machine<S, C>,
    transition: &'m Transition<S, C, A>,
}

impl<'m, S: State, C, A> BoundTransition<'m, S, C, A> {
    pub(crate) fn new(machine: &'m Machine<S, C>, transition: &'m Transition<S, C, A>) -> Self {
        machine.attach(transition);
        Self {
            machine,
            transition,
        }
    }

    pub fn machine(&self) -> &'m Machine<S, C> {
        self.machine
    }

    pub fn transition(&self) -> &'m Transition<S, C, A> {
        self.transition
    }
}

impl<S: State, C: Clone, A> BoundTransition<'_, S, C, A> {
    /// Apply the transition to the bound machine.
    pub async fn invoke(&self, args: &[A]) -> Result<StatePair<S, C>, TransitionError> {
        self.machine.apply(self.transition, args).await
    }
}

impl<S: State, C, A> Clone for BoundTransition<'_, S, C, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State, C, A> Copy for BoundTransition<'_, S, C, A> {}
