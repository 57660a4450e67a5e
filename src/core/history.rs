//! State change history.
//!
//! Every successful transition call on a machine is recorded as a
//! [`StateChange`], including calls whose guard held the machine in place.
//! Records are appended while the machine is still exclusively owned by the
//! caller, so sequence numbers follow the order in which calls took effect.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single successful transition call.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::core::StateChange;
/// use mailbox_fsm::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// let change = StateChange {
///     transition: "toggle".to_string(),
///     from: Light::Off,
///     to: Light::On,
///     advanced: true,
///     sequence: 0,
///     timestamp: Utc::now(),
/// };
/// assert!(!change.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateChange<S: State> {
    /// Name of the transition that produced this change
    pub transition: String,
    /// The state the machine was in when the call started
    pub from: S,
    /// The state the machine holds after the call
    pub to: S,
    /// Whether the pre-hook let the transition advance
    pub advanced: bool,
    /// Position of this change in the machine's linear order
    pub sequence: u64,
    /// When the change was committed
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateChange<S> {
    /// `true` when the call left the state as it was, either because the
    /// guard held or because the map points a state at itself.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of state changes, optionally bounded.
///
/// When a limit is set the oldest records are dropped first. Sequence
/// numbers keep counting across dropped records.
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::core::{StateChange, StateHistory};
/// use mailbox_fsm::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Work {
///         Start,
///         Middle,
///         End,
///     }
/// }
///
/// let history = StateHistory::new();
/// let first = history.next_sequence();
/// let history = history.record(StateChange {
///     transition: "step".to_string(),
///     from: Work::Start,
///     to: Work::Middle,
///     advanced: true,
///     sequence: first,
///     timestamp: Utc::now(),
/// });
/// let second = history.next_sequence();
/// let history = history.record(StateChange {
///     transition: "step".to_string(),
///     from: Work::Middle,
///     to: Work::End,
///     advanced: true,
///     sequence: second,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&Work::Start, &Work::Middle, &Work::End]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    changes: VecDeque<StateChange<S>>,
    limit: Option<usize>,
    recorded: u64,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        StateHistory {
            changes: VecDeque::new(),
            limit: None,
            recorded: 0,
        }
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        StateHistory {
            changes: VecDeque::new(),
            limit: Some(limit),
            recorded: 0,
        }
    }

    /// Sequence number the next recorded change should carry.
    pub fn next_sequence(&self) -> u64 {
        self.recorded
    }

    /// Append a change, dropping the oldest record if over the limit.
    pub fn record(mut self, change: StateChange<S>) -> Self {
        self.changes.push_back(change);
        self.recorded += 1;
        if let Some(limit) = self.limit {
            while self.changes.len() > limit {
                self.changes.pop_front();
            }
        }
        self
    }

    /// Sequence of states visited by the retained records.
    ///
    /// Starts at the `from` state of the oldest record, followed by the `to`
    /// state of every record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(first) = self.changes.front() {
            path.push(&first.from);
        }
        for change in &self.changes {
            path.push(&change.to);
        }
        path
    }

    /// Time elapsed between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.changes.front(), self.changes.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// Retained records, oldest first.
    pub fn changes(&self) -> impl Iterator<Item = &StateChange<S>> {
        self.changes.iter()
    }

    pub fn last(&self) -> Option<&StateChange<S>> {
        self.changes.back()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total number of changes ever recorded, including dropped ones.
    pub fn total_recorded(&self) -> u64 {
        self.recorded
    }
}
