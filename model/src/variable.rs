//! Variables: named value holders with a role flag.

use std::fmt;
use std::rc::Rc;
use tether_core::{Value, VarId};

/// Custom equality predicate for a variable.
///
/// Returns true when two values are "equal enough" that replacing one with
/// the other should not propagate. This is not necessarily structural
/// equality: a tolerance comparison on numbers is a typical use.
pub type EqualityFn = Rc<dyn Fn(&Value, &Value) -> bool>;

/// A value-holding node in the constraint graph.
///
/// The `output` flag distinguishes output variables (primary, externally
/// significant results) from interface variables (intermediate or
/// input-facing). Selection of which method writes a variable is the
/// planner's job; the variable itself is passive.
pub struct Variable {
    /// Unique identifier.
    pub id: VarId,
    /// Declared name.
    pub name: String,
    /// Current value.
    pub value: Value,
    /// Role flag: true for output variables.
    pub output: bool,
    eq: Option<EqualityFn>,
}

impl Variable {
    /// Create a new variable with an initial value, no custom equality, and
    /// the interface role.
    pub fn new(id: VarId, name: impl Into<String>, init: Value) -> Self {
        Self {
            id,
            name: name.into(),
            value: init,
            output: false,
            eq: None,
        }
    }

    /// Attach a custom equality predicate.
    pub fn with_equality(mut self, eq: EqualityFn) -> Self {
        self.eq = Some(eq);
        self
    }

    /// Set the role flag.
    pub fn set_output(&mut self, output: bool) {
        self.output = output;
    }

    /// Replace the current value.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// True when `candidate` should replace the current value: the equality
    /// predicate (or structural equality when none is set) says they differ.
    pub fn accepts(&self, candidate: &Value) -> bool {
        match &self.eq {
            Some(eq) => !eq(&self.value, candidate),
            None => self.value != *candidate,
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("value", &self.value)
            .field("output", &self.output)
            .field("custom_eq", &self.eq.is_some())
            .finish()
    }
}
