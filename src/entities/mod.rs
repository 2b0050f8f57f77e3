//! Ready-made entity controllers built on the state machine.
//!
//! - `player`: ground, air, wall, rope, dash and grab movement
//! - `trooper`: an enemy that aims, shoots and can be grabbed
//!
//! Both receive their physics, animation and projectile collaborators
//! through the traits in `collab` and read their constants from `tuning`.

pub mod collab;
pub mod player;
pub mod trooper;
pub mod tuning;

pub use collab::{Animator, Body, ClipRecorder, KinematicBody, ProjectilePool, Shot, ShotRecorder};
pub use player::{Player, PlayerController, PlayerSensors};
pub use trooper::{Trooper, TrooperController};
pub use tuning::{PlayerTuning, TrooperTuning, TuningError};
