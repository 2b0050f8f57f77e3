//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder for wiring an entity's states and
//! transitions with closures as guards, validating the graph in one place.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;

use crate::core::Guard;

/// Guard that holds when every guard in `guards` holds.
///
/// Guards are checked in order and evaluation stops at the first that fails
/// or does not hold.
///
/// # Example
///
/// ```
/// use tickstate::builder::all_of;
/// use tickstate::core::Guard;
///
/// struct Body {
///     grounded: bool,
///     vy: f32,
/// }
///
/// let rising = all_of(vec![
///     Guard::new(|b: &Body| !b.grounded),
///     Guard::new(|b: &Body| b.vy > 0.05),
/// ]);
///
/// assert!(rising.check(&Body { grounded: false, vy: 1.0 }).unwrap());
/// assert!(!rising.check(&Body { grounded: true, vy: 1.0 }).unwrap());
/// ```
pub fn all_of<C: 'static>(guards: Vec<Guard<C>>) -> Guard<C> {
    Guard::fallible(move |ctx| {
        for guard in &guards {
            if !guard.check(ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    })
}

/// Guard that holds when any guard in `guards` holds.
///
/// # Example
///
/// ```
/// use tickstate::builder::any_of;
/// use tickstate::core::Guard;
///
/// struct Contacts {
///     ground: bool,
///     wall: bool,
/// }
///
/// let touching = any_of(vec![
///     Guard::new(|c: &Contacts| c.ground),
///     Guard::new(|c: &Contacts| c.wall),
/// ]);
///
/// assert!(touching.check(&Contacts { ground: false, wall: true }).unwrap());
/// ```
pub fn any_of<C: 'static>(guards: Vec<Guard<C>>) -> Guard<C> {
    Guard::fallible(move |ctx| {
        for guard in &guards {
            if guard.check(ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    })
}
