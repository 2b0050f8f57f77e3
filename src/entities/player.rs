//! Player movement graph.
//!
//! Cross-cutting interrupts (damage, wall contact, becoming airborne, hanging
//! from a rope) are any-state transitions in that priority order. Ground
//! movement is the Idle -> Run -> RunStop loop, where RunStop only settles
//! back to Idle after braking for `run_stop_dwell`.

use crate::builder::{BuildError, MachineBuilder};
use crate::core::{BehaviorState, Context, FsmError};
use crate::entities::collab::{Animator, Body};
use crate::entities::tuning::PlayerTuning;
use crate::fsm::StateMachine;
use glam::Vec2;
use std::time::Duration;

pub const IDLE: &str = "Idle";
pub const RUN: &str = "Run";
pub const RUN_STOP: &str = "RunStop";
pub const JUMP: &str = "Jump";
pub const FALL: &str = "Fall";
pub const WALL_SLIDE: &str = "WallSlide";
pub const DAMAGED: &str = "Damaged";
pub const ROPING: &str = "Roping";
pub const DASH: &str = "Dash";
pub const GRAB: &str = "Grab";

/// Contact, input and status flags the player graph reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerSensors {
    pub is_ground: bool,
    pub is_in_wall: bool,
    pub is_jointed: bool,
    pub is_dash: bool,
    pub is_grab: bool,
    pub be_damaged: bool,
    /// Horizontal input axis, -1..=1
    pub move_hzt: f32,
    /// Vertical input axis, -1..=1
    pub move_vtc: f32,
}

/// The player entity as seen by its states and guards.
pub struct Player<B, A> {
    pub sensors: PlayerSensors,
    pub tuning: PlayerTuning,
    pub body: B,
    pub animator: A,
    /// 1.0 when facing right, -1.0 when facing left
    pub facing: f32,
}

impl<B: Body, A: Animator> Player<B, A> {
    pub fn new(body: B, animator: A, tuning: PlayerTuning) -> Self {
        Self {
            sensors: PlayerSensors::default(),
            tuning,
            body,
            animator,
            facing: 1.0,
        }
    }

    fn wants_to_move(&self) -> bool {
        self.sensors.move_hzt.abs() > self.tuning.move_threshold
    }

    fn free_airborne(&self) -> bool {
        let s = &self.sensors;
        !s.be_damaged && !s.is_in_wall && !s.is_ground && !s.is_jointed
    }

    fn vertical_speed(&self) -> f32 {
        self.body.velocity().y
    }

    fn steer(&mut self, power: f32, dt: f32) {
        let push = self.sensors.move_hzt * power * dt;
        self.body.apply_impulse(Vec2::new(push, 0.0));

        let max = self.tuning.max_move_speed;
        let mut velocity = self.body.velocity();
        velocity.x = velocity.x.clamp(-max, max);
        self.body.set_velocity(velocity);
    }

    fn brake(&mut self, dt: f32) {
        let mut velocity = self.body.velocity();
        let step = self.tuning.brake_power * dt;
        velocity.x = if velocity.x.abs() <= step {
            0.0
        } else {
            velocity.x - step * velocity.x.signum()
        };
        self.body.set_velocity(velocity);
    }
}

type Ctx<'a, B, A> = Context<'a, Player<B, A>>;

struct Idle;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Idle {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(IDLE);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let dt = ctx.dt().as_secs_f32();
        ctx.brake(dt);
    }
}

struct Run;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Run {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(RUN);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let dt = ctx.dt().as_secs_f32();
        let power = ctx.tuning.move_power;
        ctx.steer(power, dt);
    }

    fn late_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let hzt = ctx.sensors.move_hzt;
        if hzt != 0.0 {
            ctx.facing = hzt.signum();
        }
    }
}

struct RunStop;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for RunStop {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(RUN_STOP);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let dt = ctx.dt().as_secs_f32();
        ctx.brake(dt);
    }
}

/// Shared by Jump and Fall: the clip differs, air control does not.
struct Airborne(&'static str);

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Airborne {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(self.0);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let dt = ctx.dt().as_secs_f32();
        let power = ctx.tuning.fly_move_power;
        ctx.steer(power, dt);
    }
}

struct WallSlide;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for WallSlide {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(WALL_SLIDE);
        ctx.body.set_velocity(Vec2::ZERO);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let limit = ctx.tuning.wall_slide_speed;
        let mut velocity = ctx.body.velocity();
        velocity.y = velocity.y.max(-limit);
        ctx.body.set_velocity(velocity);
    }
}

/// Stunned for `damage_recovery`, then clears the damage flag so the
/// Damaged -> Idle edge can fire.
#[derive(Default)]
struct Damaged {
    remaining: Duration,
}

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Damaged {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        self.remaining = ctx.tuning.damage_recovery();
        ctx.animator.play(DAMAGED);
        let mut velocity = ctx.body.velocity();
        velocity.x = 0.0;
        ctx.body.set_velocity(velocity);
    }

    fn update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        self.remaining = self.remaining.saturating_sub(ctx.dt());
        if self.remaining.is_zero() {
            ctx.sensors.be_damaged = false;
        }
    }
}

struct Roping;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Roping {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(ROPING);
    }

    fn fixed_update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        let dt = ctx.dt().as_secs_f32();
        let push = ctx.sensors.move_hzt * ctx.tuning.rope_move_power * dt;
        ctx.body.apply_impulse(Vec2::new(push, 0.0));
    }
}

#[derive(Default)]
struct Dash {
    remaining: Duration,
}

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Dash {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        self.remaining = ctx.tuning.dash_time();
        ctx.animator.play(DASH);
        let speed = ctx.facing * ctx.tuning.dash_power;
        ctx.body.set_velocity(Vec2::new(speed, 0.0));
    }

    fn update(&mut self, ctx: &mut Ctx<'_, B, A>) {
        self.remaining = self.remaining.saturating_sub(ctx.dt());
        if self.remaining.is_zero() {
            ctx.sensors.is_dash = false;
        }
    }

    fn exit(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.sensors.is_dash = false;
    }
}

struct Grab;

impl<B: Body, A: Animator> BehaviorState<Player<B, A>> for Grab {
    fn enter(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.animator.play(GRAB);
    }

    fn exit(&mut self, ctx: &mut Ctx<'_, B, A>) {
        ctx.sensors.is_grab = false;
    }
}

/// Declare the player graph. The returned builder starts in Idle.
///
/// Dwell times are read from `tuning` once, at declaration.
pub fn player_graph<B, A>(tuning: &PlayerTuning) -> MachineBuilder<Player<B, A>>
where
    B: Body + 'static,
    A: Animator + 'static,
{
    MachineBuilder::new()
        .label("player")
        .initial(IDLE)
        .state(IDLE, Idle)
        .state(DAMAGED, Damaged::default())
        .state(RUN, Run)
        .state(RUN_STOP, RunStop)
        .state(FALL, Airborne(FALL))
        .state(JUMP, Airborne(JUMP))
        .state(ROPING, Roping)
        .state(DASH, Dash::default())
        .state(GRAB, Grab)
        .state(WALL_SLIDE, WallSlide)
        .any_state(DAMAGED, |p: &Player<B, A>| p.sensors.be_damaged)
        .transition(DAMAGED, IDLE, |p: &Player<B, A>| !p.sensors.be_damaged)
        .any_state(WALL_SLIDE, |p: &Player<B, A>| p.sensors.is_in_wall)
        .any_state(JUMP, |p: &Player<B, A>| {
            p.free_airborne() && p.vertical_speed() > p.tuning.jump_threshold
        })
        .transition(JUMP, FALL, |p: &Player<B, A>| {
            p.vertical_speed() < -p.tuning.jump_threshold
        })
        .any_state(FALL, |p: &Player<B, A>| {
            p.free_airborne() && p.vertical_speed() < -p.tuning.jump_threshold
        })
        .any_state(ROPING, |p: &Player<B, A>| {
            p.sensors.is_jointed && !p.sensors.be_damaged
        })
        .transition(WALL_SLIDE, IDLE, |p: &Player<B, A>| {
            p.sensors.is_ground || !p.sensors.is_in_wall
        })
        .transition(FALL, IDLE, |p: &Player<B, A>| p.sensors.is_ground)
        .transition(IDLE, RUN, |p: &Player<B, A>| p.wants_to_move())
        .transition(RUN, RUN_STOP, |p: &Player<B, A>| p.sensors.move_hzt == 0.0)
        .transition(RUN_STOP, RUN, |p: &Player<B, A>| p.wants_to_move())
        .timed_transition(RUN_STOP, IDLE, tuning.run_stop_dwell(), |p: &Player<B, A>| {
            !p.wants_to_move()
        })
        .transition(ROPING, IDLE, |p: &Player<B, A>| !p.sensors.is_jointed)
        .transition(DASH, IDLE, |p: &Player<B, A>| !p.sensors.is_dash)
        .transition(GRAB, IDLE, |p: &Player<B, A>| !p.sensors.is_grab)
}

/// Owns the player and its machine, and translates collision and input
/// events into sensor updates and forced changes.
pub struct PlayerController<B, A> {
    player: Player<B, A>,
    machine: StateMachine<Player<B, A>>,
}

impl<B, A> PlayerController<B, A>
where
    B: Body + 'static,
    A: Animator + 'static,
{
    pub fn new(body: B, animator: A, tuning: PlayerTuning) -> Result<Self, BuildError> {
        let graph = player_graph(&tuning);
        let mut player = Player::new(body, animator, tuning);
        let machine = graph.start(&mut player)?;

        Ok(Self { player, machine })
    }

    /// Drive one simulation cycle: update, physics and late phases.
    pub fn tick(&mut self, dt: Duration) -> Result<(), FsmError> {
        self.machine.update(&mut self.player, dt)?;
        self.machine.fixed_update(&mut self.player, dt)?;
        self.machine.late_update(&mut self.player, dt)
    }

    pub fn set_input(&mut self, hzt: f32, vtc: f32) {
        self.player.sensors.move_hzt = hzt;
        self.player.sensors.move_vtc = vtc;
    }

    pub fn on_ground_contact(&mut self, touching: bool) {
        let sensors = &mut self.player.sensors;
        if touching {
            sensors.is_in_wall = false;
            sensors.is_ground = true;
        } else {
            sensors.is_ground = false;
        }
    }

    /// Touching a wall while airborne drops straight into WallSlide.
    pub fn on_wall_contact(&mut self, touching: bool) -> Result<(), FsmError> {
        if !touching {
            self.player.sensors.is_in_wall = false;
            return Ok(());
        }
        if self.player.sensors.is_ground {
            return Ok(());
        }

        self.player.sensors.is_in_wall = true;
        self.machine.change_state(WALL_SLIDE, &mut self.player)
    }

    /// Jump off the ground with `jump_power`. Hanging from a rope, let go
    /// instead and carry the swing on. Does nothing in mid-air.
    pub fn jump(&mut self) {
        let player = &mut self.player;
        if player.sensors.is_ground {
            player.sensors.is_ground = false;
            let power = player.tuning.jump_power;
            player.body.apply_impulse(Vec2::new(0.0, power));
        } else if player.sensors.is_jointed {
            player.sensors.is_jointed = false;
            player.animator.play("RopeJump");
            let swing = player.body.velocity();
            player.body.apply_impulse(swing);
        }
    }

    /// A hit stuns the player and cuts any rope it hangs from.
    pub fn take_damage(&mut self) {
        self.player.sensors.be_damaged = true;
        self.player.sensors.is_jointed = false;
    }

    pub fn attach_rope(&mut self) {
        self.player.sensors.is_jointed = true;
    }

    pub fn detach_rope(&mut self) {
        self.player.sensors.is_jointed = false;
    }

    pub fn dash(&mut self) -> Result<(), FsmError> {
        if self.player.sensors.is_dash || self.player.sensors.be_damaged {
            return Ok(());
        }
        self.player.sensors.is_dash = true;
        self.machine.change_state(DASH, &mut self.player)
    }

    pub fn grab(&mut self) -> Result<(), FsmError> {
        self.player.sensors.is_grab = true;
        self.machine.change_state(GRAB, &mut self.player)
    }

    pub fn release(&mut self) {
        self.player.sensors.is_grab = false;
    }

    pub fn state(&self) -> &str {
        self.machine.current_state_name().unwrap_or(IDLE)
    }

    pub fn player(&self) -> &Player<B, A> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player<B, A> {
        &mut self.player
    }

    pub fn machine(&self) -> &StateMachine<Player<B, A>> {
        &self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::collab::{ClipRecorder, KinematicBody};

    const TICK: Duration = Duration::from_millis(50);

    fn grounded() -> PlayerController<KinematicBody, ClipRecorder> {
        let mut pc = PlayerController::new(
            KinematicBody::default(),
            ClipRecorder::default(),
            PlayerTuning::default(),
        )
        .unwrap();
        pc.on_ground_contact(true);
        pc
    }

    #[test]
    fn starts_idle() {
        let pc = grounded();

        assert_eq!(pc.state(), IDLE);
        assert_eq!(pc.player().animator.clips, vec![IDLE]);
        assert_eq!(pc.machine().time_in_current_state(), Duration::ZERO);
    }

    #[test]
    fn run_stop_settles_after_dwell() {
        let mut pc = grounded();

        pc.set_input(0.5, 0.0);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), RUN);

        pc.set_input(0.0, 0.0);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), RUN_STOP);

        for _ in 0..3 {
            pc.tick(TICK).unwrap();
            assert_eq!(pc.state(), RUN_STOP);
        }

        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
    }

    #[test]
    fn run_stop_returns_to_run_on_input() {
        let mut pc = grounded();
        pc.set_input(1.0, 0.0);
        pc.tick(TICK).unwrap();
        pc.set_input(0.0, 0.0);
        pc.tick(TICK).unwrap();

        pc.set_input(-1.0, 0.0);
        pc.tick(TICK).unwrap();

        assert_eq!(pc.state(), RUN);
        assert_eq!(pc.player().facing, -1.0);
    }

    #[test]
    fn running_accelerates_up_to_max_speed() {
        let mut pc = grounded();
        pc.set_input(1.0, 0.0);

        for _ in 0..40 {
            pc.tick(TICK).unwrap();
        }

        let max = pc.player().tuning.max_move_speed;
        assert_eq!(pc.player().body.velocity.x, max);
    }

    #[test]
    fn damage_interrupts_run_and_recovers() {
        let mut pc = grounded();
        pc.set_input(1.0, 0.0);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), RUN);

        pc.take_damage();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), DAMAGED);
        assert_eq!(pc.machine().previous_state_name(), Some(RUN));
        assert_eq!(pc.player().animator.count(DAMAGED), 1);

        // 0.5s recovery at 50ms per cycle, counted from the first update in
        // Damaged, then one more cycle for the edge back to Idle.
        for _ in 0..9 {
            pc.tick(TICK).unwrap();
            assert_eq!(pc.state(), DAMAGED);
        }
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
        assert_eq!(pc.player().animator.count(DAMAGED), 1);
    }

    #[test]
    fn jump_leaves_the_ground() {
        let mut pc = grounded();

        pc.jump();
        pc.tick(TICK).unwrap();

        assert_eq!(pc.state(), JUMP);
        assert!(!pc.player().sensors.is_ground);
        assert_eq!(pc.player().body.velocity.y, pc.player().tuning.jump_power);
    }

    #[test]
    fn jump_in_mid_air_does_nothing() {
        let mut pc = grounded();
        pc.on_ground_contact(false);

        pc.jump();

        assert_eq!(pc.player().body.velocity, Vec2::ZERO);
        assert_eq!(pc.state(), IDLE);
    }

    #[test]
    fn rope_jump_lets_go_and_keeps_the_swing() {
        let mut pc = grounded();
        pc.on_ground_contact(false);
        pc.attach_rope();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), ROPING);

        pc.player_mut().body.velocity = Vec2::new(2.0, 1.0);
        pc.jump();
        pc.tick(TICK).unwrap();

        assert_eq!(pc.state(), JUMP);
        assert!(!pc.player().sensors.is_jointed);
        assert_eq!(pc.player().body.velocity, Vec2::new(4.0, 2.0));
        assert_eq!(pc.player().animator.last(), Some(JUMP));
        assert_eq!(pc.player().animator.count("RopeJump"), 1);
    }

    #[test]
    fn graph_alone_settles_run_stop() {
        let tuning = PlayerTuning::default();
        let mut player = Player::new(KinematicBody::default(), ClipRecorder::default(), tuning.clone());
        player.sensors.is_ground = true;
        let mut fsm = player_graph(&tuning).start(&mut player).unwrap();
        fsm.change_state(RUN_STOP, &mut player).unwrap();

        for _ in 0..3 {
            fsm.update(&mut player, TICK).unwrap();
        }
        assert!(fsm.is_in(RUN_STOP));

        fsm.update(&mut player, TICK).unwrap();
        assert!(fsm.is_in(IDLE));
    }

    #[test]
    fn leaving_ground_upwards_is_a_jump_then_fall() {
        let mut pc = grounded();
        pc.on_ground_contact(false);
        pc.player_mut().body.velocity = Vec2::new(0.0, 5.0);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), JUMP);

        pc.player_mut().body.velocity = Vec2::new(0.0, -5.0);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), FALL);

        pc.on_ground_contact(true);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
    }

    #[test]
    fn wall_contact_in_air_forces_wall_slide() {
        let mut pc = grounded();
        pc.on_ground_contact(false);
        pc.player_mut().body.velocity = Vec2::new(0.0, -8.0);

        pc.on_wall_contact(true).unwrap();
        assert_eq!(pc.state(), WALL_SLIDE);

        pc.tick(TICK).unwrap();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), WALL_SLIDE);
        assert_eq!(pc.player().animator.count(WALL_SLIDE), 1);
        assert!(pc.player().body.velocity.y >= -pc.player().tuning.wall_slide_speed);

        pc.on_ground_contact(true);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
    }

    #[test]
    fn wall_contact_on_ground_is_ignored() {
        let mut pc = grounded();

        pc.on_wall_contact(true).unwrap();

        assert_eq!(pc.state(), IDLE);
        assert!(!pc.player().sensors.is_in_wall);
    }

    #[test]
    fn dash_runs_for_dash_time() {
        let mut pc = grounded();

        pc.dash().unwrap();
        assert_eq!(pc.state(), DASH);
        assert_eq!(
            pc.player().body.velocity.x,
            pc.player().tuning.dash_power
        );

        // 150ms dash: flag clears on the third update, edge fires on the fourth.
        for _ in 0..3 {
            pc.tick(TICK).unwrap();
            assert_eq!(pc.state(), DASH);
        }
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
        assert!(!pc.player().sensors.is_dash);
    }

    #[test]
    fn rope_swings_until_detached() {
        let mut pc = grounded();
        pc.on_ground_contact(false);

        pc.attach_rope();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), ROPING);

        pc.set_input(1.0, 0.0);
        pc.tick(TICK).unwrap();
        assert!(pc.player().body.velocity.x > 0.0);

        pc.detach_rope();
        pc.on_ground_contact(true);
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
    }

    #[test]
    fn grab_holds_until_released() {
        let mut pc = grounded();

        pc.grab().unwrap();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), GRAB);

        pc.release();
        pc.tick(TICK).unwrap();
        assert_eq!(pc.state(), IDLE);
    }
}
