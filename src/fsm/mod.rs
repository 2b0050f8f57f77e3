//! The cycle-driven state machine.
//!
//! # Key Concepts
//!
//! - **Transitions**: ordinary edges gated by a guard and a dwell time
//! - **Any-state transitions**: interrupts that apply from every state and
//!   outrank ordinary edges
//! - **State Machine**: owns the states and edges and drives them through the
//!   update, physics and late phases of each simulation cycle

mod machine;
mod status;
mod transition;

pub use machine::StateMachine;
pub use status::MachineStatus;
pub use transition::{AnyStateTransition, Transition};
