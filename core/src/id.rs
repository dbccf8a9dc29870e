//! Identity types for model entities.
//!
//! Ids are generated strings of the form `namespace.label#n`:
//! - Unique within a builder session, even when the same label is minted twice
//! - Immutable once assigned
//! - Readable in diagnostics, so a method id still shows its signature

use std::fmt;

/// Unique identifier for a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(String);

impl VarId {
    /// Create a VarId from generated id text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Get the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(String);

impl MethodId {
    /// Create a MethodId from generated id text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Get the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(String);

impl ConstraintId {
    /// Create a ConstraintId from generated id text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Get the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates unique, human-traceable identifiers scoped to a namespace.
///
/// The counter makes repeated labels distinct: two methods with the same
/// signature in different constraints still receive different ids.
#[derive(Debug)]
pub struct IdGenerator {
    namespace: String,
    next: u64,
}

impl IdGenerator {
    /// Create a generator for the given namespace (may be empty).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            next: 0,
        }
    }

    /// Mint a variable id from its declared name.
    pub fn var_id(&mut self, name: &str) -> VarId {
        VarId(self.make(name))
    }

    /// Mint a method id from its signature string.
    pub fn method_id(&mut self, signature: &str) -> MethodId {
        MethodId(self.make(signature))
    }

    /// Mint a constraint id from its signature string.
    pub fn constraint_id(&mut self, signature: &str) -> ConstraintId {
        ConstraintId(self.make(signature))
    }

    fn make(&mut self, label: &str) -> String {
        let n = self.next;
        self.next += 1;
        if self.namespace.is_empty() {
            format!("{}#{}", label, n)
        } else {
            format!("{}.{}#{}", self.namespace, label, n)
        }
    }
}
