//! Tether Pipelines
//!
//! This crate provides value-transformation pipelines:
//! - The Stage capability trait: one transformation unit with an optional
//!   timing window and an error-recovery hook
//! - Chain and the segment combinator that flattens heterogeneous segment
//!   lists into one ordered, validated sequence
//! - Named factories for the standard stage kinds (delay, stabilization,
//!   formatting, presence, defaults, type conversion)
//!
//! Stages are passive descriptors: the external propagation engine drives
//! them on value change; timer behavior is configured here but executed
//! there.

mod chain;
mod convert;
mod stage;
mod stages;

pub use chain::*;
pub use convert::*;
pub use stage::*;
pub use stages::*;
