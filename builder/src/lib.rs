//! Tether Model Builder
//!
//! This crate provides the fluent, single-pass session that assembles a
//! Modelcule:
//! - Variable, constant, and command declaration with name validation
//! - Constraint and method declaration with membership validation
//! - Equation compilation: one constraint with one method per solvable
//!   variable
//! - Structured diagnostics: recoverable failures skip only the offending
//!   construct and leave the session usable
//!
//! The builder performs all structural validation; the entity constructors
//! in `tether-model` assume validated input.

mod builder;
mod diag;

pub use builder::{ModelBuilder, VariableSpec};
pub use diag::Diagnostic;
