//! The stage capability contract.

use std::fmt;
use std::time::Duration;
use tether_core::Value;
use thiserror::Error;

/// Errors produced while a value moves through a pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// A required value was absent.
    #[error("value is required")]
    Required,

    /// A conversion could not be performed on the given value.
    #[error("cannot convert {from} to {to}")]
    Conversion {
        from: &'static str,
        to: &'static str,
    },

    /// A replacement or stage-specific message.
    #[error("{0}")]
    Message(String),
}

/// Result of applying one stage.
pub type StageResult = Result<Value, StageError>;

/// Timing window for scheduler-driven stages.
///
/// A descriptor only: the propagation engine owns the timers.
#[derive(Debug, Clone, PartialEq)]
pub enum Timing {
    /// Forward each value after a fixed delay.
    Delay(Duration),
    /// Forward only the last value seen within a quiet window, optionally
    /// flushing a fixed value when the window opens.
    Stabilize {
        window: Duration,
        flush: Option<Value>,
    },
}

/// One composable value-transformation unit.
///
/// Implementing this trait is what makes a value admissible to the
/// combinator; there is no runtime shape check.
pub trait Stage: fmt::Debug {
    /// Stage kind name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Transform one value.
    fn apply(&self, input: Value) -> StageResult;

    /// Intercept an upstream error. The default passes it through; stages
    /// like error replacement and defaulting override this.
    fn recover(&self, error: StageError) -> StageResult {
        Err(error)
    }

    /// Timing window for scheduler-driven stages.
    fn timing(&self) -> Option<Timing> {
        None
    }
}

/// A stage behind a box, the unit the combinator works with.
pub type BoxedStage = Box<dyn Stage>;
