//! Set of states a machine accepts as transition destinations.

use crate::core::State;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Monotonic set of states mentioned by a machine's transitions.
///
/// States are only ever added. Registering the same states again is a
/// no-op, so transitions may re-register on every call.
#[derive(Debug)]
pub struct KnownStates<S: State> {
    states: RwLock<HashSet<S>>,
}

impl<S: State> KnownStates<S> {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashSet::new()),
        }
    }

    /// Add states, returning how many were not already known.
    pub fn extend<I>(&self, states: I) -> usize
    where
        I: IntoIterator<Item = S>,
    {
        let mut known = self.states.write();
        states
            .into_iter()
            .filter(|state| known.insert(state.clone()))
            .count()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.read().contains(state)
    }

    /// Copy of the current membership.
    pub fn snapshot(&self) -> HashSet<S> {
        self.states.read().clone()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl<S: State> Default for KnownStates<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Empty,
        Ready,
        On,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Empty => "Empty",
                Self::Ready => "Ready",
                Self::On => "On",
            }
        }
    }

    #[test]
    fn extend_reports_new_members() {
        let known = KnownStates::new();
        assert!(known.is_empty());

        assert_eq!(known.extend([TestState::Empty, TestState::Ready]), 2);
        assert_eq!(known.extend([TestState::Ready, TestState::On]), 1);
        assert_eq!(known.len(), 3);
    }

    #[test]
    fn repeated_registration_is_idempotent() {
        let known = KnownStates::new();
        known.extend([TestState::Empty, TestState::Ready]);
        let before = known.snapshot();

        assert_eq!(known.extend([TestState::Empty, TestState::Ready]), 0);
        assert_eq!(known.snapshot(), before);
    }

    #[test]
    fn contains_checks_membership() {
        let known = KnownStates::new();
        known.extend([TestState::Empty]);

        assert!(known.contains(&TestState::Empty));
        assert!(!known.contains(&TestState::On));
    }
}
