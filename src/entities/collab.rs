//! Collaborators injected into entities at construction.
//!
//! Physics, animation and projectile pooling live outside the state machine.
//! Entities receive handles implementing these traits instead of reaching for
//! process-wide managers, so states can be exercised without an engine.

use glam::Vec2;

/// Rigid body the entity moves through.
pub trait Body {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Animation playback.
pub trait Animator {
    fn play(&mut self, clip: &str);
}

/// Source of pooled projectiles.
pub trait ProjectilePool {
    fn spawn(&mut self, origin: Vec2, direction: Vec2, power: f32);
}

/// Point-mass body with optional gravity, for demos and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity: f32,
}

impl KinematicBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Advance the body by `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity.y -= self.gravity * dt;
        self.position += self.velocity * dt;
    }
}

impl Body for KinematicBody {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }
}

/// Animator that remembers every clip it was asked to play.
#[derive(Clone, Debug, Default)]
pub struct ClipRecorder {
    pub clips: Vec<String>,
}

impl ClipRecorder {
    pub fn last(&self) -> Option<&str> {
        self.clips.last().map(String::as_str)
    }

    pub fn count(&self, clip: &str) -> usize {
        self.clips.iter().filter(|c| *c == clip).count()
    }
}

impl Animator for ClipRecorder {
    fn play(&mut self, clip: &str) {
        log::trace!("play '{}'", clip);
        self.clips.push(clip.to_string());
    }
}

/// A projectile handed out by [`ShotRecorder`].
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    pub direction: Vec2,
    pub power: f32,
}

/// Projectile pool that records spawns instead of simulating them.
#[derive(Clone, Debug, Default)]
pub struct ShotRecorder {
    pub shots: Vec<Shot>,
}

impl ProjectilePool for ShotRecorder {
    fn spawn(&mut self, origin: Vec2, direction: Vec2, power: f32) {
        self.shots.push(Shot {
            origin,
            direction,
            power,
        });
    }
}
