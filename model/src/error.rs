//! Model container errors.

use tether_core::{ConstraintId, VarId};
use thiserror::Error;

/// Errors that can occur when mutating a Modelcule.
///
/// A rejected mutation leaves the container unchanged.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A field with this name already exists.
    #[error("cannot redefine field \"{0}\"")]
    DuplicateName(String),

    /// A constraint with this id was already added.
    #[error("constraint already added: {0}")]
    DuplicateConstraint(ConstraintId),

    /// A constraint referenced a variable the container does not hold.
    #[error("unknown variable in constraint: {0}")]
    UnknownVariable(VarId),
}

/// Result type for model mutations.
pub type ModelResult<T> = Result<T, ModelError>;
