//! Tether Core Types
//!
//! This crate provides the foundational types used throughout the Tether
//! system:
//! - Identity types (VarId, MethodId, ConstraintId) and the session-scoped
//!   IdGenerator that mints them
//! - Value types (the Value enum covering every semantic type a variable can
//!   hold or a pipeline stage can produce, plus Point)
//! - Evaluation errors shared by method activation and equation evaluation

mod error;
mod id;
mod value;

pub use error::*;
pub use id::*;
pub use value::*;
