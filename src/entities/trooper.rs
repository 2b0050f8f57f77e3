//! Trooper enemy: aims at a target, shoots, reloads, and can be grabbed.

use crate::builder::{BuildError, MachineBuilder};
use crate::core::{BehaviorState, Context, FsmError};
use crate::entities::collab::{Animator, ProjectilePool};
use crate::entities::tuning::TrooperTuning;
use crate::fsm::StateMachine;
use glam::Vec2;
use std::time::Duration;

pub const DETECT: &str = "Detect";
pub const GRABBED: &str = "Grabbed";
pub const DIE: &str = "Die";

pub struct Trooper<A, P> {
    pub position: Vec2,
    pub target: Vec2,
    pub hp: u32,
    pub is_grabbed: bool,
    pub dead: bool,
    /// Raised on death, lowered once the owner has observed it
    pub death_event: bool,
    pub facing_left: bool,
    /// Unit vector from the muzzle toward the target
    pub aim: Vec2,
    pub tuning: TrooperTuning,
    pub animator: A,
    pub projectiles: P,
}

impl<A: Animator, P: ProjectilePool> Trooper<A, P> {
    pub fn new(position: Vec2, animator: A, projectiles: P, tuning: TrooperTuning) -> Self {
        Self {
            position,
            target: position,
            hp: tuning.max_hp,
            is_grabbed: false,
            dead: false,
            death_event: false,
            facing_left: false,
            aim: Vec2::X,
            tuning,
            animator,
            projectiles,
        }
    }

    /// Muzzle position, mirrored with the facing direction.
    pub fn muzzle(&self) -> Vec2 {
        let mut offset = self.tuning.muzzle_offset;
        if self.facing_left {
            offset.x = -offset.x;
        }
        self.position + offset
    }

    fn track_target(&mut self) {
        self.facing_left = self.position.x > self.target.x;
        let direction = (self.target - self.muzzle()).normalize_or_zero();
        if direction != Vec2::ZERO {
            self.aim = direction;
        }
    }

    fn shoot(&mut self) {
        self.animator.play("Attack");
        let origin = self.muzzle();
        let power = self.tuning.bullet_power;
        self.projectiles.spawn(origin, self.aim, power);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Aiming,
    Reloading,
}

/// Aim for `aim_time`, fire once, reload for `reload_time`, repeat.
struct Detect {
    phase: Phase,
    timer: Duration,
}

impl Detect {
    fn new() -> Self {
        Self {
            phase: Phase::Aiming,
            timer: Duration::ZERO,
        }
    }

    fn start_aiming<A: Animator, P>(&mut self, trooper: &mut Trooper<A, P>) {
        self.phase = Phase::Aiming;
        self.timer = trooper.tuning.aim_time();
        trooper.animator.play("DetectAim");
    }
}

impl<A: Animator, P: ProjectilePool> BehaviorState<Trooper<A, P>> for Detect {
    fn enter(&mut self, ctx: &mut Context<'_, Trooper<A, P>>) {
        ctx.track_target();
        self.start_aiming(ctx.owner_mut());
    }

    fn update(&mut self, ctx: &mut Context<'_, Trooper<A, P>>) {
        if self.phase == Phase::Aiming {
            ctx.track_target();
        }

        self.timer = self.timer.saturating_sub(ctx.dt());
        if !self.timer.is_zero() {
            return;
        }

        match self.phase {
            Phase::Aiming => {
                ctx.shoot();
                self.phase = Phase::Reloading;
                self.timer = ctx.tuning.reload_time();
            }
            Phase::Reloading => self.start_aiming(ctx.owner_mut()),
        }
    }
}

struct Grabbed;

impl<A: Animator, P> BehaviorState<Trooper<A, P>> for Grabbed {
    fn enter(&mut self, ctx: &mut Context<'_, Trooper<A, P>>) {
        ctx.animator.play(GRABBED);
    }
}

struct Die;

impl<A: Animator, P> BehaviorState<Trooper<A, P>> for Die {
    fn enter(&mut self, ctx: &mut Context<'_, Trooper<A, P>>) {
        ctx.is_grabbed = false;
        ctx.dead = true;
        ctx.death_event = true;
        ctx.animator.play(DIE);
    }
}

pub struct TrooperController<A, P> {
    trooper: Trooper<A, P>,
    machine: StateMachine<Trooper<A, P>>,
}

impl<A, P> TrooperController<A, P>
where
    A: Animator + 'static,
    P: ProjectilePool + 'static,
{
    pub fn new(
        position: Vec2,
        animator: A,
        projectiles: P,
        tuning: TrooperTuning,
    ) -> Result<Self, BuildError> {
        let mut trooper = Trooper::new(position, animator, projectiles, tuning);
        let machine = MachineBuilder::new()
            .label("trooper")
            .initial(DETECT)
            .state(DETECT, Detect::new())
            .state(GRABBED, Grabbed)
            .state(DIE, Die)
            .any_state(DIE, |t: &Trooper<A, P>| t.hp == 0)
            .transition(GRABBED, DETECT, |t: &Trooper<A, P>| !t.is_grabbed)
            .start(&mut trooper)?;

        Ok(Self { trooper, machine })
    }

    pub fn tick(&mut self, dt: Duration) -> Result<(), FsmError> {
        self.machine.update(&mut self.trooper, dt)?;
        self.machine.fixed_update(&mut self.trooper, dt)?;
        self.machine.late_update(&mut self.trooper, dt)
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.trooper.target = target;
    }

    /// Hook the trooper. Returns the height at which the hook holds it.
    /// A dead trooper stays dead.
    pub fn grabbed(&mut self) -> Result<f32, FsmError> {
        let hold = self.trooper.tuning.grab_hold_y;
        if self.trooper.dead {
            return Ok(hold);
        }

        self.trooper.is_grabbed = true;
        self.machine.change_state(GRABBED, &mut self.trooper)?;
        Ok(hold)
    }

    pub fn release(&mut self) {
        self.trooper.is_grabbed = false;
    }

    pub fn take_hit(&mut self, damage: u32) {
        self.trooper.hp = self.trooper.hp.saturating_sub(damage);
    }

    /// Restore a pooled trooper: full health, back to Detect.
    pub fn reset(&mut self) -> Result<(), FsmError> {
        self.trooper.hp = self.trooper.tuning.max_hp;
        self.trooper.is_grabbed = false;
        self.trooper.dead = false;
        self.trooper.death_event = false;
        self.machine.reset(&mut self.trooper)
    }

    pub fn is_dead(&self) -> bool {
        self.trooper.dead
    }

    /// Report a death once, so a spawner can count it and recycle the trooper.
    pub fn take_death(&mut self) -> bool {
        std::mem::take(&mut self.trooper.death_event)
    }

    pub fn state(&self) -> &str {
        self.machine.current_state_name().unwrap_or(DETECT)
    }

    pub fn trooper(&self) -> &Trooper<A, P> {
        &self.trooper
    }

    pub fn machine(&self) -> &StateMachine<Trooper<A, P>> {
        &self.machine
    }
}
