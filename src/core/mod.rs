//! Core types: states, the state cell, guards and history.
//!
//! - [`State`] describes the values a machine moves between
//! - [`StateCell`] is the single-slot mailbox that serializes access to the
//!   current [`StatePair`]
//! - [`Guard`] is a pure predicate over states
//! - [`StateHistory`] records every committed [`StateChange`]

mod cell;
mod guard;
mod history;
mod state;

pub use cell::{Checkout, StateCell, StatePair};
pub use guard::Guard;
pub use history::{StateChange, StateHistory};
pub use state::State;
