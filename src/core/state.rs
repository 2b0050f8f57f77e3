//! Lifecycle contract for behavior states.
//!
//! A behavior state is one named mode of an entity's logic. The machine calls
//! its hooks in a fixed order: `enter` once on activation, then `update`,
//! `fixed_update` and `late_update` every cycle while active, then `exit` once
//! before the next state's `enter`.

use super::context::Context;

/// Trait for behavior states driven by a [`StateMachine`](crate::fsm::StateMachine).
///
/// `C` is the owning entity. States never hold the entity; it arrives through
/// the [`Context`] on every call. All hooks default to doing nothing.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{BehaviorState, Context};
///
/// struct Runner {
///     speed: f32,
///     clip: &'static str,
/// }
///
/// struct Run;
///
/// impl BehaviorState<Runner> for Run {
///     fn enter(&mut self, ctx: &mut Context<'_, Runner>) {
///         ctx.clip = "Run";
///     }
///
///     fn fixed_update(&mut self, ctx: &mut Context<'_, Runner>) {
///         let dt = ctx.dt().as_secs_f32();
///         ctx.speed += 4.0 * dt;
///     }
/// }
/// ```
pub trait BehaviorState<C> {
    /// Called once when the state becomes active.
    fn enter(&mut self, _ctx: &mut Context<'_, C>) {}

    /// Called every update phase while active, after transitions are resolved.
    fn update(&mut self, _ctx: &mut Context<'_, C>) {}

    /// Called every physics phase while active.
    fn fixed_update(&mut self, _ctx: &mut Context<'_, C>) {}

    /// Called every late phase while active.
    fn late_update(&mut self, _ctx: &mut Context<'_, C>) {}

    /// Called once when the state is left, before the next state's `enter`.
    fn exit(&mut self, _ctx: &mut Context<'_, C>) {}
}

/// State with no behavior of its own. Handy for pure routing states.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passive;

impl<C> BehaviorState<C> for Passive {}
