//! Methods: one computation direction inside a constraint.

use std::fmt;
use std::rc::Rc;
use tether_core::{EvalError, EvalResult, MethodId, Value, VarId};

/// A raw method body: positional values in, output values out.
pub type RawFn = Rc<dyn Fn(&[Value]) -> EvalResult<Vec<Value>>>;

/// A positional entry in a method's binding list.
///
/// The binding list records every name the signature referenced, in order,
/// including names that resolve to constants rather than variables.
#[derive(Debug, Clone)]
pub enum MethodRef {
    /// A variable reference.
    Var(VarId),
    /// A named constant, captured at construction time.
    Const(Value),
}

impl MethodRef {
    /// Get the variable id if this entry references a variable.
    pub fn as_var(&self) -> Option<&VarId> {
        match self {
            MethodRef::Var(id) => Some(id),
            MethodRef::Const(_) => None,
        }
    }
}

/// A synchronous body wrapped in the uniform N-ary calling convention.
///
/// The optional mask skips positions the raw callable does not consume; the
/// declared output count is enforced after every call.
pub struct LiftedFn {
    f: RawFn,
    mask: Option<Vec<bool>>,
    outputs: usize,
}

impl LiftedFn {
    /// Lift a raw callable to the uniform convention.
    pub fn new(f: RawFn, outputs: usize) -> Self {
        Self {
            f,
            mask: None,
            outputs,
        }
    }

    /// Lift with a positional mask; `true` entries are skipped.
    pub fn with_mask(f: RawFn, outputs: usize, mask: Vec<bool>) -> Self {
        Self {
            f,
            mask: Some(mask),
            outputs,
        }
    }

    /// Invoke with positional arguments matching the binding list.
    pub fn call(&self, args: &[Value]) -> EvalResult<Vec<Value>> {
        let produced = match &self.mask {
            Some(mask) => {
                let kept: Vec<Value> = args
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !mask.get(*i).copied().unwrap_or(false))
                    .map(|(_, v)| v.clone())
                    .collect();
                (self.f)(&kept)?
            }
            None => (self.f)(args)?,
        };
        if produced.len() != self.outputs {
            return Err(EvalError::OutputArity {
                expected: self.outputs,
                actual: produced.len(),
            });
        }
        Ok(produced)
    }
}

impl fmt::Debug for LiftedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiftedFn")
            .field("mask", &self.mask)
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// How a method's body runs.
pub enum Activation {
    /// Synchronous callable, lifted to the uniform convention.
    Sync(LiftedFn),
    /// Asynchronous callable, used unmodified; it delivers its own outputs
    /// through whatever channel the scheduler arranges.
    Async(RawFn),
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Sync(lifted) => f.debug_tuple("Sync").field(lifted).finish(),
            Activation::Async(_) => f.debug_tuple("Async").finish(),
        }
    }
}

/// One computation direction inside a constraint.
///
/// The input set is derived, not declared: it is the owning constraint's
/// variable set minus this method's outputs, so an output can never also be
/// consumed as an input of the same method.
#[derive(Debug)]
pub struct Method {
    /// Unique identifier.
    pub id: MethodId,
    /// The signature this method was declared with.
    pub signature: String,
    inputs: Vec<VarId>,
    outputs: Vec<VarId>,
    refs: Vec<MethodRef>,
    activation: Activation,
}

impl Method {
    /// Create a method for a constraint over `constraint_vars`.
    ///
    /// `outputs` must already be validated as genuine variables of that
    /// constraint; the input set is computed here as the set difference.
    pub fn new(
        id: MethodId,
        signature: impl Into<String>,
        constraint_vars: &[VarId],
        outputs: Vec<VarId>,
        refs: Vec<MethodRef>,
        activation: Activation,
    ) -> Self {
        let inputs = constraint_vars
            .iter()
            .filter(|v| !outputs.contains(v))
            .cloned()
            .collect();
        Self {
            id,
            signature: signature.into(),
            inputs,
            outputs,
            refs,
            activation,
        }
    }

    /// The computed input set (constraint variables minus outputs).
    pub fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    /// The output variables this method writes.
    pub fn outputs(&self) -> &[VarId] {
        &self.outputs
    }

    /// The full ordered binding list, constants included.
    pub fn refs(&self) -> &[MethodRef] {
        &self.refs
    }

    /// The activation wrapper around the body.
    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// True for asynchronous methods.
    pub fn is_async(&self) -> bool {
        matches!(self.activation, Activation::Async(_))
    }

    /// Drive a synchronous method with arguments matching the binding list.
    pub fn call(&self, args: &[Value]) -> EvalResult<Vec<Value>> {
        match &self.activation {
            Activation::Sync(lifted) => lifted.call(args),
            Activation::Async(_) => Err(EvalError::AsyncActivation),
        }
    }
}
