//! The Modelcule: a named container of variables, constraints, and commands.

use crate::{Command, Constraint, ModelError, ModelResult, Variable};
use std::collections::HashMap;
use tether_core::{Value, VarId};

/// A tagged reference stored under a field name.
///
/// Fields share one name namespace; the tag says what kind of entity a name
/// resolves to, replacing any by-shape inspection at lookup sites.
#[derive(Debug)]
pub enum Field {
    /// A variable. `indirect` records the leading-marker declaration
    /// convention: the variable is addressed indirectly rather than by bare
    /// field. Consumed by the downstream binder; irrelevant to validation.
    Var { id: VarId, indirect: bool },
    /// A named constant.
    Const(Value),
    /// A named command.
    Command(Command),
}

impl Field {
    /// Get the variable id if this field names a variable.
    pub fn as_var(&self) -> Option<&VarId> {
        match self {
            Field::Var { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Get the constant value if this field names a constant.
    pub fn as_const(&self) -> Option<&Value> {
        match self {
            Field::Const(value) => Some(value),
            _ => None,
        }
    }
}

/// The assembled constraint graph: an insertion-ordered mapping from
/// declared name to tagged field, a variable store, and an ordered
/// constraint list.
///
/// Mutations are all-or-nothing: a rejected add leaves the container
/// otherwise unchanged.
#[derive(Debug, Default)]
pub struct Modelcule {
    /// Declaration order of field names.
    order: Vec<String>,
    /// Name to tagged field.
    fields: HashMap<String, Field>,
    /// Variable store.
    vars: HashMap<VarId, Variable>,
    /// Committed constraints, in commit order.
    constraints: Vec<Constraint>,
}

impl Modelcule {
    /// Create an empty modelcule.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.fields
            .get(name)
            .and_then(Field::as_var)
            .and_then(|id| self.vars.get(id))
    }

    /// Look up a variable by name, mutably.
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let id = self.fields.get(name).and_then(Field::as_var)?.clone();
        self.vars.get_mut(&id)
    }

    /// Look up a variable by id.
    pub fn variable_by_id(&self, id: &VarId) -> Option<&Variable> {
        self.vars.get(id)
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.order.iter().filter_map(|name| self.variable(name))
    }

    /// The committed constraints, in commit order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up a command by name.
    pub fn command(&self, name: &str) -> Option<&Command> {
        match self.fields.get(name) {
            Some(Field::Command(cmd)) => Some(cmd),
            _ => None,
        }
    }

    /// Commands in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.order
            .iter()
            .filter_map(|name| self.command(name).map(|cmd| (name.as_str(), cmd)))
    }

    /// Add a variable under a declared name.
    pub fn add_variable(&mut self, name: &str, variable: Variable, indirect: bool) -> ModelResult<()> {
        if self.contains(name) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        let id = variable.id.clone();
        self.order.push(name.to_string());
        self.fields
            .insert(name.to_string(), Field::Var { id: id.clone(), indirect });
        self.vars.insert(id, variable);
        Ok(())
    }

    /// Add a named constant.
    pub fn add_constant(&mut self, name: &str, value: Value) -> ModelResult<()> {
        if self.contains(name) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        self.order.push(name.to_string());
        self.fields.insert(name.to_string(), Field::Const(value));
        Ok(())
    }

    /// Add a named command.
    pub fn add_command(&mut self, name: &str, command: Command) -> ModelResult<()> {
        if self.contains(name) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        self.order.push(name.to_string());
        self.fields.insert(name.to_string(), Field::Command(command));
        Ok(())
    }

    /// Commit a constraint. Every participating variable must already be in
    /// the store.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ModelResult<()> {
        if self.constraints.iter().any(|c| c.id == constraint.id) {
            return Err(ModelError::DuplicateConstraint(constraint.id));
        }
        for id in constraint.variables() {
            if !self.vars.contains_key(id) {
                return Err(ModelError::UnknownVariable(id.clone()));
            }
        }
        self.constraints.push(constraint);
        Ok(())
    }
}
