//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating machines and
//! transitions with minimal boilerplate while keeping configuration errors
//! out of the hot path: everything is validated in `build()`.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::transition::Transition;

/// Create a single-edge transition with default hooks.
///
/// # Example
///
/// ```
/// use mailbox_fsm::builder::simple_transition;
/// use mailbox_fsm::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
///     final: [End]
/// }
///
/// let finish = simple_transition::<MyState, ()>("finish", MyState::Start, MyState::End);
/// assert_eq!(finish.call(MyState::Start, (), &[]).unwrap().state, MyState::End);
/// ```
pub fn simple_transition<S, C>(name: impl Into<String>, from: S, to: S) -> Transition<S, C>
where
    S: State,
    C: 'static,
{
    TransitionBuilder::new()
        .name(name)
        .map(from, to)
        .build()
        .expect("Simple transition should always build")
}

/// Create a single-edge transition that only advances when `guard` accepts
/// the current state.
///
/// # Example
///
/// ```
/// use mailbox_fsm::builder::guarded_transition;
/// use mailbox_fsm::core::State;
/// use mailbox_fsm::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         Middle,
///         End,
///     }
///     final: [End]
/// }
///
/// let step = guarded_transition::<MyState, (), _>(
///     "step",
///     MyState::Start,
///     MyState::Middle,
///     |s| !s.is_final(),
/// );
/// assert_eq!(step.call(MyState::Start, (), &[]).unwrap().state, MyState::Middle);
/// ```
pub fn guarded_transition<S, C, F>(name: impl Into<String>, from: S, to: S, guard: F) -> Transition<S, C>
where
    S: State,
    C: 'static,
    F: Fn(&S) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new()
        .name(name)
        .map(from, to)
        .when(guard)
        .build()
        .expect("Guarded transition should always build")
}
