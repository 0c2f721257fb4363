//! Error types for IR lowering.
//!
//! Lowering runs after every user-facing check has already passed, so none of
//! these errors describe a problem in the source program. Each one is a broken
//! contract between compiler phases: the driver reports it as an internal
//! compiler error and abandons the compilation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LoweringError
//! ├── UnknownFunction / UnknownContainer - dangling arena reference
//! ├── IneligibleFunction                 - stub requested for a non-dispatcher
//! ├── ForeignDispatcher                  - call to a dispatcher of another container
//! ├── MalformedStub                      - stub factory broke its contract
//! ├── BodyAlreadyMoved                   - body transfer into an occupied slot
//! └── MissingPrerequisite                - phase scheduled out of order
//! ```

use thiserror::Error;

use crate::{ContainerId, FunctionId};

/// Convenience alias used throughout the lowering crates.
pub type Result<T, E = LoweringError> = std::result::Result<T, E>;

/// Internal errors raised while lowering IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
    /// A call, return or declaration names a function that is not in the arena.
    #[error("internal error: unknown function {id}")]
    UnknownFunction { id: FunctionId },

    /// A declaration or function parent names a container that is not in the arena.
    #[error("internal error: unknown container {id}")]
    UnknownContainer { id: ContainerId },

    /// A static stub was requested for a function that is not a
    /// default-argument dispatcher with a dispatch receiver.
    #[error("internal error: '{name}' ({id}) is not a default-argument dispatcher with a receiver")]
    IneligibleFunction { id: FunctionId, name: String },

    /// A call in the lowered container targets a dispatcher declared outside
    /// it. Its stub belongs to the other container's lowering.
    #[error("internal error: call to dispatcher {callee} declared outside {container}")]
    ForeignDispatcher {
        callee: FunctionId,
        container: ContainerId,
    },

    /// The stub factory returned a function that does not match the original.
    #[error("internal error: malformed static stub {stub} for {original}: {reason}")]
    MalformedStub {
        original: FunctionId,
        stub: FunctionId,
        reason: String,
    },

    /// A body was moved into a function that already owns one.
    #[error("internal error: cannot move body of {from} into {to}: target already has a body")]
    BodyAlreadyMoved { from: FunctionId, to: FunctionId },

    /// A phase was run before one of the phases it depends on.
    #[error("internal error: phase '{phase}' requires '{prerequisite}' to run first")]
    MissingPrerequisite {
        phase: &'static str,
        prerequisite: &'static str,
    },
}

impl LoweringError {
    /// The function this error is about, if any.
    pub fn function(&self) -> Option<FunctionId> {
        match self {
            LoweringError::UnknownFunction { id } => Some(*id),
            LoweringError::IneligibleFunction { id, .. } => Some(*id),
            LoweringError::ForeignDispatcher { callee, .. } => Some(*callee),
            LoweringError::MalformedStub { original, .. } => Some(*original),
            LoweringError::BodyAlreadyMoved { from, .. } => Some(*from),
            LoweringError::UnknownContainer { .. } | LoweringError::MissingPrerequisite { .. } => {
                None
            }
        }
    }
}
