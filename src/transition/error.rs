//! Errors raised while invoking a transition.

use thiserror::Error;

/// Argument lookup errors.
///
/// Both variants point at a mistake in the application: a hook asked for a
/// name the transition never declared, or the call site passed too few
/// positional values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("no args specified")]
    NoArgsSpecified,

    #[error("invalid argument '{name}'")]
    InvalidArgument { name: String },
}

/// Errors that can occur while applying a transition to a machine.
///
/// None of these leave the machine modified: the pair that was stored before
/// the call is put back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Argument(#[from] ArgError),

    #[error("there is no transition from '{from}' in '{transition}'")]
    NoTransition { transition: String, from: String },

    #[error("invalid state '{state}' produced by '{transition}'")]
    InvalidState { transition: String, state: String },

    #[error("transition hook failed: {reason}")]
    Hook { reason: String },
}

impl TransitionError {
    /// Failure raised from inside a `pre` or `post` hook.
    pub fn hook(reason: impl Into<String>) -> Self {
        Self::Hook {
            reason: reason.into(),
        }
    }
}
