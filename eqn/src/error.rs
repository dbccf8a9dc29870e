//! Parser error types.

use std::fmt;
use thiserror::Error;

/// A byte-offset range in the equation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A parse error with location information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(format!("expected {}, found {}", expected, found), span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at offset {}: {}",
            self.span.start, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors from algebraic rearrangement.
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    /// The target name does not occur in the equation.
    #[error("name not present in equation: {0}")]
    MissingName(String),

    /// The target name occurs more than once; the inversion path would be
    /// ambiguous.
    #[error("name appears more than once in equation: {0}")]
    DuplicateName(String),
}
