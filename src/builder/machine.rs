//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{BehaviorState, FsmError, Guard};
use crate::fsm::{AnyStateTransition, StateMachine, Transition};
use std::time::Duration;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike the machine itself, the builder accepts declarations in any order;
/// states are registered first and edges are validated in [`build`].
///
/// [`build`]: MachineBuilder::build
pub struct MachineBuilder<C> {
    label: Option<String>,
    initial: Option<String>,
    states: Vec<(String, Box<dyn BehaviorState<C>>)>,
    transitions: Vec<Transition<C>>,
    any_state: Vec<AnyStateTransition<C>>,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            label: None,
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            any_state: Vec::new(),
        }
    }

    /// Tag the machine's log lines with `label`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the initial state (required for `start`).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a behavior state.
    pub fn state<S>(mut self, name: impl Into<String>, state: S) -> Self
    where
        S: BehaviorState<C> + 'static,
    {
        self.states.push((name.into(), Box::new(state)));
        self
    }

    /// Add a transition that fires as soon as `predicate` holds.
    pub fn transition<F>(self, from: &str, to: &str, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.timed_transition(from, to, Duration::ZERO, predicate)
    }

    /// Add a transition that also requires `min_dwell` in the source state.
    pub fn timed_transition<F>(self, from: &str, to: &str, min_dwell: Duration, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guarded_transition(from, to, min_dwell, Guard::new(predicate))
    }

    /// Add a transition with a prebuilt (possibly fallible) guard.
    pub fn guarded_transition(
        mut self,
        from: &str,
        to: &str,
        min_dwell: Duration,
        guard: Guard<C>,
    ) -> Self {
        self.transitions
            .push(Transition::new(from, to, min_dwell, guard));
        self
    }

    /// Add an any-state transition.
    pub fn any_state<F>(self, to: &str, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guarded_any_state(to, Guard::new(predicate))
    }

    /// Add an any-state transition with a prebuilt guard.
    pub fn guarded_any_state(mut self, to: &str, guard: Guard<C>) -> Self {
        self.any_state.push(AnyStateTransition::new(to, guard));
        self
    }

    /// Build an uninitialized machine.
    /// Returns an error if a name is duplicated or an edge names an
    /// unknown state.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = match self.label {
            Some(label) => StateMachine::with_label(label),
            None => StateMachine::new(),
        };
        for (name, state) in self.states {
            machine.add_boxed_state(name, state)?;
        }
        for transition in self.transitions {
            machine.insert_transition(transition)?;
        }
        for transition in self.any_state {
            machine.insert_any_state(transition)?;
        }
        if let Some(initial) = &self.initial {
            if !machine.contains_state(initial) {
                return Err(FsmError::UnknownState {
                    name: initial.clone(),
                }
                .into());
            }
        }

        Ok(machine)
    }

    /// Build the machine and initialize it in the initial state.
    pub fn start(self, owner: &mut C) -> Result<StateMachine<C>, BuildError> {
        let initial = self.initial.clone().ok_or(BuildError::MissingInitialState)?;
        let mut machine = self.build()?;
        machine.init(&initial, owner)?;
        Ok(machine)
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
