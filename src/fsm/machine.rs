//! State machine that drives behavior states once per simulation cycle.

use crate::core::{BehaviorState, Context, FsmError, Guard, GuardError};
use crate::fsm::status::MachineStatus;
use crate::fsm::transition::{AnyStateTransition, Transition};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone, Copy)]
enum Hook {
    Enter,
    Update,
    FixedUpdate,
    LateUpdate,
    Exit,
}

/// Behavior state machine owned by a single entity.
///
/// The entity registers states and transitions once, calls [`init`], then
/// drives the machine every cycle with [`update`], [`fixed_update`] and
/// [`late_update`], in that order. Only `update` evaluates transitions, and it
/// applies at most one per call:
///
/// 1. time in the current state advances by `dt`
/// 2. a change requested by a state during the previous cycle is applied
/// 3. otherwise any-state transitions are checked in insertion order
/// 4. otherwise the current state's own transitions are checked in order
/// 5. the (possibly new) current state receives `update`
///
/// [`init`]: StateMachine::init
/// [`update`]: StateMachine::update
/// [`fixed_update`]: StateMachine::fixed_update
/// [`late_update`]: StateMachine::late_update
pub struct StateMachine<C> {
    label: String,
    names: Vec<String>,
    states: Vec<Box<dyn BehaviorState<C>>>,
    index: HashMap<String, usize>,
    outgoing: Vec<Vec<(usize, Transition<C>)>>,
    any_state: Vec<(usize, AnyStateTransition<C>)>,
    current: Option<usize>,
    previous: Option<usize>,
    initial: Option<usize>,
    elapsed: Duration,
    pending: Option<usize>,
}

impl<C> StateMachine<C> {
    /// Create an empty, uninitialized machine
    pub fn new() -> Self {
        Self::with_label("fsm")
    }

    /// Create an empty machine whose log lines are tagged with `label`
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            names: Vec::new(),
            states: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            any_state: Vec::new(),
            current: None,
            previous: None,
            initial: None,
            elapsed: Duration::ZERO,
            pending: None,
        }
    }

    /// Register a state under a unique name
    pub fn add_state<S>(&mut self, name: impl Into<String>, state: S) -> Result<(), FsmError>
    where
        S: BehaviorState<C> + 'static,
    {
        self.add_boxed_state(name, Box::new(state))
    }

    /// Register an already boxed state
    pub fn add_boxed_state(
        &mut self,
        name: impl Into<String>,
        state: Box<dyn BehaviorState<C>>,
    ) -> Result<(), FsmError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(FsmError::DuplicateState { name });
        }

        self.index.insert(name.clone(), self.states.len());
        self.names.push(name);
        self.states.push(state);
        self.outgoing.push(Vec::new());
        Ok(())
    }

    /// Add an ordinary transition. Both states must already be registered.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        min_dwell: Duration,
        guard: Guard<C>,
    ) -> Result<(), FsmError> {
        self.insert_transition(Transition::new(from, to, min_dwell, guard))
    }

    /// Add a prebuilt ordinary transition
    pub fn insert_transition(&mut self, transition: Transition<C>) -> Result<(), FsmError> {
        let from = self.lookup(&transition.from)?;
        let to = self.lookup(&transition.to)?;
        self.outgoing[from].push((to, transition));
        Ok(())
    }

    /// Add a transition that applies from every state. The target must
    /// already be registered.
    pub fn add_any_state(&mut self, to: &str, guard: Guard<C>) -> Result<(), FsmError> {
        self.insert_any_state(AnyStateTransition::new(to, guard))
    }

    /// Add a prebuilt any-state transition
    pub fn insert_any_state(&mut self, transition: AnyStateTransition<C>) -> Result<(), FsmError> {
        let to = self.lookup(&transition.to)?;
        self.any_state.push((to, transition));
        Ok(())
    }

    /// Activate the start state and call its `enter`. Must run exactly once,
    /// after registration and before any drive call.
    pub fn init(&mut self, start: &str, owner: &mut C) -> Result<(), FsmError> {
        if self.current.is_some() {
            return Err(FsmError::AlreadyInitialized);
        }
        let start = self.lookup(start)?;

        self.initial = Some(start);
        self.current = Some(start);
        self.previous = None;
        self.elapsed = Duration::ZERO;
        log::info!("{}: starting in '{}'", self.label, self.names[start]);
        self.call(start, owner, Duration::ZERO, Hook::Enter);
        Ok(())
    }

    /// Drive the update phase: resolve at most one transition, then call
    /// `update` on the active state.
    ///
    /// A guard that fails aborts the evaluation: the active state is kept and
    /// does not receive `update` this cycle.
    pub fn update(&mut self, owner: &mut C, dt: Duration) -> Result<(), FsmError> {
        let current = self.current.ok_or(FsmError::NotInitialized)?;
        self.elapsed += dt;
        log::trace!("{}: update '{}'", self.label, self.names[current]);

        let change = match self.pending.take() {
            Some(target) if target != current => Some((target, "request")),
            _ => self.evaluate(current, owner)?,
        };

        let active = match change {
            Some((target, cause)) => {
                self.switch(target, owner, dt, cause);
                target
            }
            None => current,
        };
        self.call(active, owner, dt, Hook::Update);
        Ok(())
    }

    /// Drive the physics phase. Never changes the active state.
    pub fn fixed_update(&mut self, owner: &mut C, dt: Duration) -> Result<(), FsmError> {
        let current = self.current.ok_or(FsmError::NotInitialized)?;
        self.call(current, owner, dt, Hook::FixedUpdate);
        Ok(())
    }

    /// Drive the late phase. Never changes the active state.
    pub fn late_update(&mut self, owner: &mut C, dt: Duration) -> Result<(), FsmError> {
        let current = self.current.ok_or(FsmError::NotInitialized)?;
        self.call(current, owner, dt, Hook::LateUpdate);
        Ok(())
    }

    /// Force a change to `name` right away, bypassing guards and dwell times.
    ///
    /// Changing to the active state is a no-op. Any change a state requested
    /// for the next cycle is discarded, including one filed by the outgoing
    /// state's `exit`.
    pub fn change_state(&mut self, name: &str, owner: &mut C) -> Result<(), FsmError> {
        let current = self.current.ok_or(FsmError::NotInitialized)?;
        let target = self.lookup(name)?;

        self.pending = None;
        if target != current {
            self.switch(target, owner, Duration::ZERO, "forced");
        }
        Ok(())
    }

    /// Return to the state the machine was initialized with, for entities
    /// that are pooled and reused. Always fires `exit` and `enter`, and
    /// forgets the previous state.
    pub fn reset(&mut self, owner: &mut C) -> Result<(), FsmError> {
        let current = self.current.ok_or(FsmError::NotInitialized)?;
        let initial = self.initial.ok_or(FsmError::NotInitialized)?;

        self.call(current, owner, Duration::ZERO, Hook::Exit);
        self.pending = None;
        self.current = Some(initial);
        self.previous = None;
        self.elapsed = Duration::ZERO;
        log::debug!("{}: reset to '{}'", self.label, self.names[initial]);
        self.call(initial, owner, Duration::ZERO, Hook::Enter);
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the active state, `None` before initialization
    pub fn current_state_name(&self) -> Option<&str> {
        self.current.map(|i| self.names[i].as_str())
    }

    /// Name of the state active before the last change
    pub fn previous_state_name(&self) -> Option<&str> {
        self.previous.map(|i| self.names[i].as_str())
    }

    /// Time accumulated since the active state was entered
    pub fn time_in_current_state(&self) -> Duration {
        self.elapsed
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Check if `name` is the active state
    pub fn is_in(&self, name: &str) -> bool {
        self.current_state_name() == Some(name)
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered state names, in registration order
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of ordinary transitions across all states
    pub fn transition_count(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }

    pub fn any_state_count(&self) -> usize {
        self.any_state.len()
    }

    pub fn has_pending_change(&self) -> bool {
        self.pending.is_some()
    }

    /// Serializable snapshot of where the machine is
    pub fn status(&self) -> MachineStatus {
        MachineStatus {
            label: self.label.clone(),
            current: self.current_state_name().map(str::to_string),
            previous: self.previous_state_name().map(str::to_string),
            time_in_state: self.elapsed,
            pending: self.pending.map(|i| self.names[i].clone()),
        }
    }

    fn lookup(&self, name: &str) -> Result<usize, FsmError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FsmError::unknown(name))
    }

    fn evaluate(
        &self,
        current: usize,
        owner: &C,
    ) -> Result<Option<(usize, &'static str)>, FsmError> {
        for (target, transition) in &self.any_state {
            let fires = transition
                .can_fire(owner)
                .map_err(|source| self.guard_failed(current, *target, source))?;
            if fires {
                // Staying put must not retrigger enter side effects.
                return Ok((*target != current).then_some((*target, "any-state")));
            }
        }

        for (target, transition) in &self.outgoing[current] {
            let fires = transition
                .can_fire(self.elapsed, owner)
                .map_err(|source| self.guard_failed(current, *target, source))?;
            if fires {
                return Ok(Some((*target, "transition")));
            }
        }

        Ok(None)
    }

    fn guard_failed(&self, from: usize, to: usize, source: GuardError) -> FsmError {
        log::warn!(
            "{}: guard '{}' -> '{}' failed: {}",
            self.label,
            self.names[from],
            self.names[to],
            source
        );
        FsmError::GuardFailed {
            from: self.names[from].clone(),
            to: self.names[to].clone(),
            source,
        }
    }

    fn switch(&mut self, target: usize, owner: &mut C, dt: Duration, cause: &str) {
        let outgoing = self.current;
        if let Some(from) = outgoing {
            self.call(from, owner, dt, Hook::Exit);
            // Requests filed on the way out refer to a state we just left.
            self.pending = None;
            log::debug!(
                "{}: {} -> {} ({})",
                self.label,
                self.names[from],
                self.names[target],
                cause
            );
        }

        self.previous = outgoing;
        self.current = Some(target);
        self.elapsed = Duration::ZERO;
        self.call(target, owner, dt, Hook::Enter);
    }

    fn call(&mut self, state: usize, owner: &mut C, dt: Duration, hook: Hook) {
        let mut ctx = Context::new(
            owner,
            &self.label,
            &self.names[state],
            self.elapsed,
            dt,
            &self.index,
            &mut self.pending,
        );
        let behavior = &mut self.states[state];
        match hook {
            Hook::Enter => behavior.enter(&mut ctx),
            Hook::Update => behavior.update(&mut ctx),
            Hook::FixedUpdate => behavior.fixed_update(&mut ctx),
            Hook::LateUpdate => behavior.late_update(&mut ctx),
            Hook::Exit => behavior.exit(&mut ctx),
        }
    }
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}
