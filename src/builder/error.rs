//! Build errors for the machine builder.

use crate::core::FsmError;
use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .start(owner)")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error(transparent)]
    Machine(#[from] FsmError),
}
