//! Evaluation errors shared by method activation and equation evaluation.

use thiserror::Error;

/// Errors that can occur when a method or equation body is evaluated.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// A referenced name had no binding in the evaluation environment.
    #[error("unbound name in evaluation: {0}")]
    UnboundName(String),

    /// A value bound into a numeric evaluation was not a number.
    #[error("expected a number, got {actual}")]
    NotANumber { actual: &'static str },

    /// A method body produced the wrong number of outputs.
    #[error("method produced {actual} outputs, expected {expected}")]
    OutputArity { expected: usize, actual: usize },

    /// An asynchronous method was driven synchronously.
    #[error("asynchronous method delivers its own outputs and cannot be called directly")]
    AsyncActivation,
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
