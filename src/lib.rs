//! Tickstate: a cycle-driven behavior state machine for game entities
//!
//! Each entity owns one [`StateMachine`] and drives it once per simulation
//! cycle through three ordered phases: update, fixed (physics) update and late
//! update. Transitions are resolved only during the update phase, at most one
//! per cycle, with any-state transitions outranking the current state's own
//! edges.
//!
//! # Core Concepts
//!
//! - **Behavior states**: named modes with `enter`/`update`/`fixed_update`/
//!   `late_update`/`exit` hooks via the [`BehaviorState`] trait
//! - **Guards**: predicates over the owning entity that gate transitions
//! - **Dwell times**: minimum time in a state before an edge may fire
//! - **Forced changes**: immediate switches that bypass guards
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tickstate::builder::MachineBuilder;
//! use tickstate::core::{BehaviorState, Context};
//!
//! #[derive(Default)]
//! struct Runner {
//!     input: f32,
//!     speed: f32,
//! }
//!
//! struct Idle;
//! struct Run;
//!
//! impl BehaviorState<Runner> for Idle {
//!     fn enter(&mut self, ctx: &mut Context<'_, Runner>) {
//!         ctx.speed = 0.0;
//!     }
//! }
//!
//! impl BehaviorState<Runner> for Run {
//!     fn fixed_update(&mut self, ctx: &mut Context<'_, Runner>) {
//!         let push = ctx.input * ctx.dt().as_secs_f32();
//!         ctx.speed += push;
//!     }
//! }
//!
//! let mut runner = Runner::default();
//! let mut fsm = MachineBuilder::new()
//!     .initial("Idle")
//!     .state("Idle", Idle)
//!     .state("Run", Run)
//!     .transition("Idle", "Run", |r: &Runner| r.input.abs() > 0.1)
//!     .timed_transition("Run", "Idle", Duration::from_millis(200), |r: &Runner| r.input == 0.0)
//!     .start(&mut runner)
//!     .unwrap();
//!
//! runner.input = 1.0;
//! let dt = Duration::from_millis(50);
//! fsm.update(&mut runner, dt).unwrap();
//! fsm.fixed_update(&mut runner, dt).unwrap();
//! fsm.late_update(&mut runner, dt).unwrap();
//!
//! assert!(fsm.is_in("Run"));
//! assert_eq!(fsm.previous_state_name(), Some("Idle"));
//! ```

pub mod builder;
pub mod core;
pub mod entities;
pub mod fsm;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{BehaviorState, Context, FsmError, Guard, GuardError, Passive};
pub use fsm::{AnyStateTransition, MachineStatus, StateMachine, Transition};
