//! Error types for state machine wiring and evaluation.

use thiserror::Error;

/// Failure raised by a fallible guard predicate.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct GuardError {
    message: String,
}

impl GuardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`StateMachine`](crate::fsm::StateMachine) operations.
///
/// All variants except `GuardFailed` are wiring bugs: they surface during
/// setup or on first misuse and leave the machine exactly as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("State '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("State '{name}' is not registered")]
    UnknownState { name: String },

    #[error("State machine has not been initialized. Call .init(start, owner) first")]
    NotInitialized,

    #[error("State machine is already initialized")]
    AlreadyInitialized,

    #[error("Guard for transition '{from}' -> '{to}' failed: {source}")]
    GuardFailed {
        from: String,
        to: String,
        #[source]
        source: GuardError,
    },
}

impl FsmError {
    pub(crate) fn unknown(name: &str) -> Self {
        FsmError::UnknownState {
            name: name.to_string(),
        }
    }
}
