//! Handle passed to behavior states during lifecycle calls.

use super::error::FsmError;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// View of the owning entity and its machine, handed to every lifecycle hook.
///
/// Derefs to the entity, so states read and write entity fields directly
/// (`ctx.velocity`, `ctx.animator.play(..)`). Change requests made through
/// [`request_change`](Context::request_change) are deferred to the next
/// update cycle.
pub struct Context<'a, C> {
    owner: &'a mut C,
    label: &'a str,
    state: &'a str,
    elapsed: Duration,
    dt: Duration,
    registry: &'a HashMap<String, usize>,
    pending: &'a mut Option<usize>,
}

impl<'a, C> Context<'a, C> {
    pub(crate) fn new(
        owner: &'a mut C,
        label: &'a str,
        state: &'a str,
        elapsed: Duration,
        dt: Duration,
        registry: &'a HashMap<String, usize>,
        pending: &'a mut Option<usize>,
    ) -> Self {
        Self {
            owner,
            label,
            state,
            elapsed,
            dt,
            registry,
            pending,
        }
    }

    /// The owning entity.
    pub fn owner(&self) -> &C {
        self.owner
    }

    /// The owning entity, mutably.
    pub fn owner_mut(&mut self) -> &mut C {
        self.owner
    }

    /// Name of the state receiving this call.
    pub fn state_name(&self) -> &str {
        self.state
    }

    /// Time spent in the current state, including this cycle.
    pub fn time_in_state(&self) -> Duration {
        self.elapsed
    }

    /// Time step of the phase being driven. Zero for forced changes.
    pub fn dt(&self) -> Duration {
        self.dt
    }

    /// Ask the machine to switch to `name` at the start of the next update.
    ///
    /// Only one request can be pending. Returns `Ok(false)` when another
    /// request already holds the slot; the new one is dropped.
    pub fn request_change(&mut self, name: &str) -> Result<bool, FsmError> {
        let target = *self
            .registry
            .get(name)
            .ok_or_else(|| FsmError::unknown(name))?;

        if self.pending.is_some() {
            log::warn!(
                "{}: change to '{}' requested from '{}' ignored, another change is pending",
                self.label,
                name,
                self.state
            );
            return Ok(false);
        }

        *self.pending = Some(target);
        Ok(true)
    }

    /// Whether a deferred change is waiting for the next update.
    pub fn has_pending_change(&self) -> bool {
        self.pending.is_some()
    }
}

impl<C> Deref for Context<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.owner
    }
}

impl<C> DerefMut for Context<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.owner
    }
}
