//! Structured diagnostics for recoverable construction failures.

use tether_eqn::ParseError;
use tether_model::ModelError;
use thiserror::Error;

/// A construction failure.
///
/// Every variant is recoverable: the offending construct is skipped and the
/// builder session stays usable. The session records diagnostics in order so
/// callers and tests can assert on them precisely.
#[derive(Debug, Clone, Error)]
pub enum Diagnostic {
    /// The name does not match the field-name syntax.
    #[error("invalid field name: \"{0}\"")]
    InvalidName(String),

    /// A field with this name already exists on the target.
    #[error("cannot redefine field \"{0}\"")]
    NameInUse(String),

    /// The name does not resolve to any field on the target.
    #[error("unknown field \"{0}\"")]
    UnknownName(String),

    /// The name resolves to a field that is not a variable.
    #[error("field is not a variable: \"{0}\"")]
    NotAVariable(String),

    /// A method signature is missing the arrow separator or has too many.
    #[error("invalid method signature: \"{0}\"")]
    MalformedSignature(String),

    /// A method was declared with no constraint open.
    #[error("no open constraint for method \"{0}\"")]
    NoOpenConstraint(String),

    /// A method input is not a member of the open constraint.
    #[error("input does not belong to constraint in method \"{0}\"")]
    InputOutsideConstraint(String),

    /// A method output is not a member of the open constraint.
    #[error("output does not belong to constraint in method \"{0}\"")]
    OutputOutsideConstraint(String),

    /// The equation text does not parse.
    #[error("cannot parse equation \"{text}\": {source}")]
    EquationParse {
        text: String,
        #[source]
        source: ParseError,
    },

    /// The equation references the same name more than once.
    #[error("duplicate variables in equation \"{0}\"")]
    DuplicateEquationName(String),

    /// The equation cannot be rearranged for one of its variables.
    #[error("cannot rearrange equation \"{0}\"")]
    Unsolvable(String),

    /// The target container rejected a committed constraint.
    #[error("constraint rejected: {0}")]
    ConstraintRejected(String),
}

impl From<ModelError> for Diagnostic {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DuplicateName(name) => Diagnostic::NameInUse(name),
            ModelError::UnknownVariable(id) => Diagnostic::UnknownName(id.to_string()),
            ModelError::DuplicateConstraint(id) => Diagnostic::ConstraintRejected(id.to_string()),
        }
    }
}
