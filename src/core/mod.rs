//! Core building blocks of a behavior state machine.
//!
//! This module contains the pieces the machine is assembled from:
//! - Behavior states via the `BehaviorState` trait
//! - Guard predicates over the owning entity
//! - The `Context` handle states receive on every call
//! - Error types shared by the whole crate

mod context;
mod error;
mod guard;
mod state;

pub use context::Context;
pub use error::{FsmError, GuardError};
pub use guard::Guard;
pub use state::{BehaviorState, Passive};
