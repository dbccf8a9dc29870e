//! Commands: callables bound to variables, outside the constraint graph.

use crate::RawFn;
use std::fmt;
use tether_core::{EvalResult, Value, VarId};

/// A named imperative entry point on a model.
///
/// A command is bound to a fixed ordered variable list and invoked directly
/// by the caller; it never participates in constraint-driven derivation.
pub struct Command {
    vars: Vec<VarId>,
    f: RawFn,
}

impl Command {
    /// Bind a callable to an ordered variable list.
    pub fn new(vars: Vec<VarId>, f: RawFn) -> Self {
        Self { vars, f }
    }

    /// The bound variables, in declaration order.
    pub fn variables(&self) -> &[VarId] {
        &self.vars
    }

    /// Invoke with the bound variables' current values.
    pub fn invoke(&self, args: &[Value]) -> EvalResult<Vec<Value>> {
        (self.f)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("vars", &self.vars).finish()
    }
}
