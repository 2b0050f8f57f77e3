//! Tunable constants for the built-in entities.
//!
//! Durations are configured in seconds so the values read naturally in data
//! files. Missing fields fall back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Failed to parse tuning data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tuning value '{field}' must be finite and non-negative (got {value})")]
    Invalid { field: &'static str, value: f32 },
}

// Rounded to whole microseconds so 0.2 means exactly 200ms.
fn seconds(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_micros((f64::from(value) * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

fn check(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid { field, value })
    }
}

/// Movement and reaction constants for the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Input magnitude above which the player counts as moving
    pub move_threshold: f32,
    /// Vertical speed above which the player counts as rising or falling
    pub jump_threshold: f32,
    /// Seconds spent braking before settling back to idle
    pub run_stop_dwell: f32,
    pub move_power: f32,
    /// Vertical speed added by a grounded jump
    pub jump_power: f32,
    pub fly_move_power: f32,
    pub rope_move_power: f32,
    pub max_move_speed: f32,
    /// Horizontal deceleration while braking, units per second squared
    pub brake_power: f32,
    /// Fastest descent while sliding down a wall
    pub wall_slide_speed: f32,
    pub dash_time: f32,
    pub dash_power: f32,
    /// Seconds the player stays stunned after a hit
    pub damage_recovery: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_threshold: 0.1,
            jump_threshold: 0.05,
            run_stop_dwell: 0.2,
            move_power: 40.0,
            jump_power: 8.0,
            fly_move_power: 15.0,
            rope_move_power: 10.0,
            max_move_speed: 6.0,
            brake_power: 30.0,
            wall_slide_speed: 2.0,
            dash_time: 0.15,
            dash_power: 18.0,
            damage_recovery: 0.5,
        }
    }
}

impl PlayerTuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check("move_threshold", self.move_threshold)?;
        check("jump_threshold", self.jump_threshold)?;
        check("run_stop_dwell", self.run_stop_dwell)?;
        check("move_power", self.move_power)?;
        check("jump_power", self.jump_power)?;
        check("fly_move_power", self.fly_move_power)?;
        check("rope_move_power", self.rope_move_power)?;
        check("max_move_speed", self.max_move_speed)?;
        check("brake_power", self.brake_power)?;
        check("wall_slide_speed", self.wall_slide_speed)?;
        check("dash_time", self.dash_time)?;
        check("dash_power", self.dash_power)?;
        check("damage_recovery", self.damage_recovery)
    }

    pub fn run_stop_dwell(&self) -> Duration {
        seconds(self.run_stop_dwell)
    }

    pub fn dash_time(&self) -> Duration {
        seconds(self.dash_time)
    }

    pub fn damage_recovery(&self) -> Duration {
        seconds(self.damage_recovery)
    }
}

/// Combat constants for the trooper enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrooperTuning {
    /// Seconds spent aiming before each shot
    pub aim_time: f32,
    /// Seconds between a shot and the next aim
    pub reload_time: f32,
    pub bullet_power: f32,
    /// Height at which a grabbing hook holds the trooper
    pub grab_hold_y: f32,
    pub max_hp: u32,
    /// Muzzle position relative to the trooper when facing right
    pub muzzle_offset: Vec2,
}

impl Default for TrooperTuning {
    fn default() -> Self {
        Self {
            aim_time: 1.0,
            reload_time: 0.6,
            bullet_power: 12.0,
            grab_hold_y: 1.2,
            max_hp: 1,
            muzzle_offset: Vec2::new(0.4, 0.6),
        }
    }
}

impl TrooperTuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check("aim_time", self.aim_time)?;
        check("reload_time", self.reload_time)?;
        check("bullet_power", self.bullet_power)?;
        check("grab_hold_y", self.grab_hold_y)
    }

    pub fn aim_time(&self) -> Duration {
        seconds(self.aim_time)
    }

    pub fn reload_time(&self) -> Duration {
        seconds(self.reload_time)
    }
}
