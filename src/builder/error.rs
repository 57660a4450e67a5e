//! Build errors for machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial context not specified. Call .context(value) before .build()")]
    MissingInitialContext,

    #[error("Transition name not specified. Call .name(name)")]
    MissingName,

    #[error("No mappings defined. Add at least one with .map(from, to)")]
    EmptyTransitionMap,

    #[error("State '{state}' is mapped more than once")]
    DuplicateSource { state: String },

    #[error("Event capacity {capacity} exceeds the maximum of {max}")]
    InvalidEventCapacity { capacity: usize, max: usize },
}
