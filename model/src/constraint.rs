//! Constraints: a fixed variable set plus its candidate methods.

use crate::Method;
use tether_core::{ConstraintId, VarId};

/// A relation over a fixed set of variables.
///
/// Each method computes some of the variables from the others; at runtime
/// exactly one method may be active at a time. Method selection is the
/// planner's job; this type only records the structural contract.
#[derive(Debug)]
pub struct Constraint {
    /// Unique identifier.
    pub id: ConstraintId,
    /// The comma-joined variable list this constraint was declared with.
    pub signature: String,
    variables: Vec<VarId>,
    methods: Vec<Method>,
}

impl Constraint {
    /// Create a constraint over a fixed, ordered variable set.
    pub fn new(id: ConstraintId, signature: impl Into<String>, variables: Vec<VarId>) -> Self {
        Self {
            id,
            signature: signature.into(),
            variables,
            methods: Vec::new(),
        }
    }

    /// The participating variables, in declaration order. Fixed at
    /// construction; never altered.
    pub fn variables(&self) -> &[VarId] {
        &self.variables
    }

    /// True if `id` participates in this constraint.
    pub fn contains(&self, id: &VarId) -> bool {
        self.variables.contains(id)
    }

    /// Append a candidate method.
    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    /// The candidate methods, in declaration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}
