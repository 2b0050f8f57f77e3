//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions of the owning entity. They are
//! re-evaluated every update cycle and decide whether a transition fires.

use super::error::GuardError;

type Predicate<C> = Box<dyn Fn(&C) -> Result<bool, GuardError> + Send + Sync>;

/// Predicate over the owning entity that gates a transition.
///
/// A guard only sees the entity through a shared reference, so evaluating it
/// cannot change the entity it is asked about. Given the same entity snapshot
/// a guard always answers the same way, which keeps replays deterministic.
///
/// # Example
///
/// ```rust
/// use tickstate::core::Guard;
///
/// struct Sensors {
///     grounded: bool,
/// }
///
/// let on_ground = Guard::new(|s: &Sensors| s.grounded);
///
/// assert!(on_ground.check(&Sensors { grounded: true }).unwrap());
/// assert!(!on_ground.check(&Sensors { grounded: false }).unwrap());
/// ```
pub struct Guard<C> {
    predicate: Predicate<C>,
}

impl<C> Guard<C> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(move |ctx| Ok(predicate(ctx))),
        }
    }

    /// Create a guard whose predicate may fail, e.g. when it reads a sensor
    /// that has gone away.
    ///
    /// ```rust
    /// use tickstate::core::{Guard, GuardError};
    ///
    /// struct Target {
    ///     distance: Option<f32>,
    /// }
    ///
    /// let in_range = Guard::fallible(|t: &Target| {
    ///     t.distance
    ///         .map(|d| d < 5.0)
    ///         .ok_or_else(|| GuardError::new("target lost"))
    /// });
    ///
    /// assert!(in_range.check(&Target { distance: Some(1.0) }).unwrap());
    /// assert!(in_range.check(&Target { distance: None }).is_err());
    /// ```
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> Result<bool, GuardError> + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that always passes. Useful for pure dwell-time transitions.
    pub fn always() -> Self {
        Guard::new(|_| true)
    }

    /// Evaluate the guard against the entity.
    pub fn check(&self, ctx: &C) -> Result<bool, GuardError> {
        (self.predicate)(ctx)
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard")
    }
}
