//! Transition edges of the state graph.

use crate::core::{Guard, GuardError};
use std::time::Duration;

/// Edge from one named state to another, gated by a guard and a minimum
/// dwell time in the source state.
#[derive(Debug)]
pub struct Transition<C> {
    pub from: String,
    pub to: String,
    pub min_dwell: Duration,
    pub guard: Guard<C>,
}

impl<C> Transition<C> {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        min_dwell: Duration,
        guard: Guard<C>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            min_dwell,
            guard,
        }
    }

    /// Check if this transition fires after `elapsed` in the source state.
    ///
    /// The guard is not consulted until the dwell time has been met.
    pub fn can_fire(&self, elapsed: Duration, owner: &C) -> Result<bool, GuardError> {
        if elapsed < self.min_dwell {
            return Ok(false);
        }
        self.guard.check(owner)
    }
}

/// Transition that applies from every state and outranks ordinary ones.
#[derive(Debug)]
pub struct AnyStateTransition<C> {
    pub to: String,
    pub guard: Guard<C>,
}

impl<C> AnyStateTransition<C> {
    pub fn new(to: impl Into<String>, guard: Guard<C>) -> Self {
        Self {
            to: to.into(),
            guard,
        }
    }

    pub fn can_fire(&self, owner: &C) -> Result<bool, GuardError> {
        self.guard.check(owner)
    }
}
