//! Mailbox FSM: finite state machines with single-flight transitions
//!
//! A machine keeps its current state and context in a one-slot mailbox. A
//! transition takes the pair out, computes the next pair through pure hooks
//! and puts the result back, so concurrent callers are served one at a time,
//! in arrival order, and never observe a half-applied change.
//!
//! # Core Concepts
//!
//! - **State**: Type-safe state representation via the `State` trait
//! - **StateCell**: The capacity-one mailbox holding the current pair
//! - **Transition**: A named map of source to destination states with
//!   `pre`/`post` hooks
//! - **Machine**: A cell plus the set of states its transitions may reach
//! - **History**: Ordered record of every committed change
//!
//! # Example
//!
//! ```rust
//! use mailbox_fsm::builder::TransitionBuilder;
//! use mailbox_fsm::machine::Machine;
//! use mailbox_fsm::transition::{Decision, TransitionError};
//! use mailbox_fsm::state_enum;
//!
//! state_enum! {
//!     enum Check {
//!         Passed,
//!         Failed,
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let machine = Machine::new(|| Check::Passed, || String::from("ctx"));
//!
//! let check = TransitionBuilder::<Check, String, &str>::new()
//!     .name("check")
//!     .map(Check::Passed, Check::Failed)
//!     .args(["verdict"])
//!     .pre(|_, context, args| {
//!         let verdict = args.get("verdict")?;
//!         Ok(Decision::from_parts(*verdict == "fail!", context))
//!     })
//!     .post(|_, _, context, _| Ok(format!("{context}:failed!")))
//!     .build()
//!     .unwrap();
//! let check = check.bind(&machine);
//!
//! assert_eq!(check.invoke(&["ok"]).await.unwrap().state, Check::Passed);
//!
//! let failed = check.invoke(&["fail!"]).await.unwrap();
//! assert_eq!(failed.state, Check::Failed);
//! assert_eq!(failed.context, "ctx:failed!");
//!
//! // No edge out of Failed: the call errors and the pair is kept.
//! assert!(matches!(
//!     check.invoke(&["fail!"]).await,
//!     Err(TransitionError::NoTransition { .. })
//! ));
//! assert_eq!(machine.query().await, failed);
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod transition;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use core::{Guard, State, StateCell, StateChange, StateHistory, StatePair};
pub use machine::{BoundTransition, Machine, MachineConfig};
pub use transition::{
    ArgError, CallArgs, Decision, FnHooks, Hooks, NoHooks, Transition, TransitionError,
    TransitionMap,
};
