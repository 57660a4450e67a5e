//! State trait for machine states.
//!
//! The runtime never looks inside a state. It only compares, hashes and
//! clones them, and asks for a name when logging or reporting errors.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// States are small identity values, typically fieldless enums. Equality
/// and hashing decide transition-map lookups and known-state membership.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and returned to callers
/// - `Eq` + `Hash`: states key the transition map and the known-state set
/// - `Debug`: for diagnostics
/// - `Serialize` + `Deserialize`: history can be dumped for inspection
/// - `Send` + `Sync`: machines are shared between tasks
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Broken,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// assert!(Door::Broken.is_error());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Informational for callers; the runtime never consults it.
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Informational for callers; the runtime never consults it.
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Passed,
        Failed,
        Crashed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Passed => "Passed",
                Self::Failed => "Failed",
                Self::Crashed => "Crashed",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Crashed)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Failed | Self::Crashed)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Passed.name(), "Passed");
        assert_eq!(TestState::Failed.name(), "Failed");
        assert_eq!(TestState::Crashed.name(), "Crashed");
    }

    #[test]
    fn default_flags_can_be_overridden() {
        assert!(!TestState::Passed.is_final());
        assert!(!TestState::Failed.is_final());
        assert!(TestState::Crashed.is_final());

        assert!(!TestState::Passed.is_error());
        assert!(TestState::Failed.is_error());
    }

    #[test]
    fn identity_decides_set_membership() {
        let states: HashSet<TestState> = [TestState::Passed, TestState::Passed, TestState::Failed]
            .into_iter()
            .collect();

        assert_eq!(states.len(), 2);
        assert!(states.contains(&TestState::Passed));
        assert!(!states.contains(&TestState::Crashed));
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Failed;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
