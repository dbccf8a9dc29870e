//! Integration test support for Tether.
//!
//! The scenario files under `tests/` drive the builder, the equation
//! compiler, and the pipeline combinator together; this crate holds the
//! fixtures they share.

use tether_builder::ModelBuilder;
use tether_core::Value;

pub mod prelude {
    pub use tether_builder::{Diagnostic, ModelBuilder, VariableSpec};
    pub use tether_core::{Point, Value};
    pub use tether_model::{Field, Modelcule};
    pub use tether_pipe::{chain, Composed, Segment, Stage, StageError, Timing};

    pub use crate::{converter_builder, names_of, nums};
}

/// Positional number arguments for driving methods and commands.
pub fn nums(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::Number).collect()
}

/// Participating variable names of a constraint, in membership order.
pub fn names_of(model: &tether_model::Modelcule, constraint_index: usize) -> Vec<String> {
    model.constraints()[constraint_index]
        .variables()
        .iter()
        .map(|id| {
            model
                .variable_by_id(id)
                .map(|v| v.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect()
}

/// A temperature-converter session: celsius and fahrenheit variables tied
/// through named constants by one equation.
pub fn converter_builder() -> ModelBuilder {
    let mut builder = ModelBuilder::new("temps");
    builder
        .variable("celsius", 0.0)
        .variable("fahrenheit", Value::Null)
        .constant("ratio", 1.8)
        .constant("offset", 32.0)
        .output("fahrenheit")
        .equation("fahrenheit = celsius * ratio + offset");
    builder
}
