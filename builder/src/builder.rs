//! The ModelBuilder session.
//!
//! The builder spends most of its effort validating parameters and massaging
//! them into the shape the entity constructors expect; the constructors
//! themselves assume validated input. A failed construct is reported and
//! skipped — the session keeps accepting declarations.

use crate::diag::Diagnostic;
use regex_lite::Regex;
use std::collections::HashMap;
use std::rc::Rc;
use tether_core::{EvalError, EvalResult, IdGenerator, Value};
use tether_eqn::{eval, parse, solve_for};
use tether_model::{
    Activation, Command, Constraint, Field, LiftedFn, Method, MethodRef, Modelcule, RawFn,
    Variable,
};
use tracing::warn;

/// Field-name syntax: a letter or sigil head, then letters, digits, or
/// sigils.
const NAME_SYNTAX: &str = r"^[a-zA-Z$][a-zA-Z0-9_$]*$";

/// Declaration details for a single variable.
#[derive(Default)]
pub struct VariableSpec {
    init: Option<Value>,
    existing: Option<Variable>,
    eq: Option<Rc<dyn Fn(&Value, &Value) -> bool>>,
    output: bool,
}

impl VariableSpec {
    /// An empty spec: null initial value, structural equality, interface
    /// role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial value.
    pub fn init(mut self, value: impl Into<Value>) -> Self {
        self.init = Some(value.into());
        self
    }

    /// Wrap a pre-existing variable instead of constructing a fresh one.
    /// The declaration contributes no initial value on this path.
    pub fn existing(mut self, variable: Variable) -> Self {
        self.existing = Some(variable);
        self
    }

    /// Set a custom equality predicate.
    pub fn equality(mut self, eq: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.eq = Some(Rc::new(eq));
        self
    }

    /// Set the role flag.
    pub fn output(mut self, output: bool) -> Self {
        self.output = output;
        self
    }
}

/// A fluent, single-pass session that assembles one Modelcule.
///
/// At most one constraint is pending at a time; any constraint-like call and
/// `end` commit it first. Construction is append-only: a committed
/// constraint cannot be reopened.
pub struct ModelBuilder {
    /// The modelcule being built.
    target: Modelcule,
    /// Mints entity ids.
    ids: IdGenerator,
    /// The open, not-yet-committed constraint.
    pending: Option<Constraint>,
    /// Recoverable failures, in occurrence order.
    diagnostics: Vec<Diagnostic>,
    name_syntax: Regex,
}

impl ModelBuilder {
    /// Start a session over a fresh modelcule.
    pub fn new(namespace: &str) -> Self {
        Self::extend(namespace, Modelcule::new())
    }

    /// Start a session that expands an existing modelcule.
    pub fn extend(namespace: &str, target: Modelcule) -> Self {
        Self {
            target,
            ids: IdGenerator::new(namespace),
            pending: None,
            diagnostics: Vec::new(),
            name_syntax: Regex::new(NAME_SYNTAX).expect("field-name syntax is a valid pattern"),
        }
    }

    /// Declare a variable with an initial value.
    pub fn variable(&mut self, name: &str, init: impl Into<Value>) -> &mut Self {
        self.variable_with(name, VariableSpec::new().init(init))
    }

    /// Declare a variable with full declaration details.
    pub fn variable_with(&mut self, name: &str, spec: VariableSpec) -> &mut Self {
        self.end_constraint();
        if let Err(diagnostic) = self.try_variable(name, spec) {
            self.report(diagnostic);
        }
        self
    }

    /// Declare several variables: `order` gives declaration order,
    /// `defaults` supplies initial values by name. The output flag is shared
    /// across the batch.
    pub fn variables(&mut self, order: &[&str], defaults: &[(&str, Value)], output: bool) -> &mut Self {
        self.end_constraint();
        for name in order {
            let mut spec = VariableSpec::new().output(output);
            if let Some((_, init)) = defaults.iter().find(|(n, _)| n == name) {
                spec = spec.init(init.clone());
            }
            self.variable_with(name, spec);
        }
        self
    }

    /// Declare several variables from an ordered name/value list alone.
    /// The output flag is shared across the batch.
    pub fn variables_from(&mut self, defs: &[(&str, Value)], output: bool) -> &mut Self {
        self.end_constraint();
        for (name, init) in defs {
            self.variable_with(name, VariableSpec::new().init(init.clone()).output(output));
        }
        self
    }

    /// Mark an existing variable as output, or declare a fresh one with the
    /// output role.
    pub fn output(&mut self, name: &str) -> &mut Self {
        self.end_constraint();
        if let Some(variable) = self.target.variable_mut(name) {
            variable.set_output(true);
            return self;
        }
        self.variable_with(name, VariableSpec::new().output(true))
    }

    /// Mark an existing variable as interface, or declare a fresh one with
    /// the interface role.
    pub fn interface(&mut self, name: &str) -> &mut Self {
        self.end_constraint();
        if let Some(variable) = self.target.variable_mut(name) {
            variable.set_output(false);
            return self;
        }
        self.variable_with(name, VariableSpec::new())
    }

    /// Mark or declare a batch of output variables.
    pub fn outputs(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.output(name);
        }
        self
    }

    /// Mark or declare a batch of interface variables.
    pub fn interfaces(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.interface(name);
        }
        self
    }

    /// Declare a named constant. Constants can appear in method reference
    /// lists and equations but are never selectable as outputs.
    pub fn constant(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.end_constraint();
        if let Err(diagnostic) = self.try_constant(name, value.into()) {
            self.report(diagnostic);
        }
        self
    }

    /// Open a constraint over the named variables. Commits any pending
    /// constraint first; the variable set is fixed once opened.
    pub fn constraint(&mut self, names: &[&str]) -> &mut Self {
        self.end_constraint();
        if let Err(diagnostic) = self.try_constraint(names) {
            self.report(diagnostic);
        }
        self
    }

    /// Add a synchronous method to the open constraint.
    ///
    /// The signature is `"inputs -> outputs"`; a `*` prefix on an input
    /// masks that position from the raw callable.
    pub fn method<F>(&mut self, signature: &str, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> EvalResult<Vec<Value>> + 'static,
    {
        if let Err(diagnostic) = self.try_method(signature, Rc::new(f), false) {
            self.report(diagnostic);
        }
        self
    }

    /// Add an asynchronous method to the open constraint. The callable is
    /// used unmodified; it delivers its own outputs.
    pub fn async_method<F>(&mut self, signature: &str, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> EvalResult<Vec<Value>> + 'static,
    {
        if let Err(diagnostic) = self.try_method(signature, Rc::new(f), true) {
            self.report(diagnostic);
        }
        self
    }

    /// Build the constraint represented by a simple algebraic equation.
    ///
    /// Produces one method per referenced variable, each computing that
    /// variable from the others; the constraint is committed immediately.
    pub fn equation(&mut self, text: &str) -> &mut Self {
        self.end_constraint();
        if let Err(diagnostic) = self.try_equation(text) {
            self.report(diagnostic);
        }
        self
    }

    /// Attach a command: a callable bound to the named variables, stored as
    /// a field on the target, outside the constraint graph.
    pub fn command<F>(&mut self, name: &str, args: &[&str], f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> EvalResult<Vec<Value>> + 'static,
    {
        self.end_constraint();
        if let Err(diagnostic) = self.try_command(name, args, Rc::new(f)) {
            self.report(diagnostic);
        }
        self
    }

    /// Commit the pending constraint, if any.
    pub fn end_constraint(&mut self) -> &mut Self {
        if let Some(constraint) = self.pending.take() {
            if let Err(err) = self.target.add_constraint(constraint) {
                self.report(err.into());
            }
        }
        self
    }

    /// Commit the pending constraint and get the modelcule built so far.
    /// Idempotent: a second call performs no further mutation.
    pub fn end(&mut self) -> &Modelcule {
        self.end_constraint();
        &self.target
    }

    /// Consume the session, returning the modelcule and every diagnostic.
    pub fn finish(mut self) -> (Modelcule, Vec<Diagnostic>) {
        self.end_constraint();
        (self.target, self.diagnostics)
    }

    /// Recoverable failures recorded so far, in occurrence order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "construct skipped");
        self.diagnostics.push(diagnostic);
    }

    fn check_new_name(&self, name: &str) -> Result<(), Diagnostic> {
        if !self.name_syntax.is_match(name) {
            return Err(Diagnostic::InvalidName(name.to_string()));
        }
        if self.target.contains(name) {
            return Err(Diagnostic::NameInUse(name.to_string()));
        }
        Ok(())
    }

    fn try_variable(&mut self, name: &str, spec: VariableSpec) -> Result<(), Diagnostic> {
        let (name, indirect) = strip_indirect(name.trim());
        self.check_new_name(name)?;

        let mut variable = match spec.existing {
            Some(existing) => existing,
            None => {
                let mut fresh = Variable::new(
                    self.ids.var_id(name),
                    name,
                    spec.init.unwrap_or(Value::Null),
                );
                if let Some(eq) = spec.eq {
                    fresh = fresh.with_equality(eq);
                }
                fresh
            }
        };
        variable.set_output(spec.output);

        self.target
            .add_variable(name, variable, indirect)
            .map_err(Diagnostic::from)
    }

    fn try_constant(&mut self, name: &str, value: Value) -> Result<(), Diagnostic> {
        self.check_new_name(name)?;
        self.target.add_constant(name, value).map_err(Diagnostic::from)
    }

    fn try_constraint(&mut self, names: &[&str]) -> Result<(), Diagnostic> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            match self.target.field(name) {
                Some(Field::Var { id, .. }) => ids.push(id.clone()),
                Some(_) => return Err(Diagnostic::NotAVariable(name.to_string())),
                None => return Err(Diagnostic::UnknownName(name.to_string())),
            }
        }
        let signature = names.join(", ");
        self.pending = Some(Constraint::new(
            self.ids.constraint_id(&signature),
            signature,
            ids,
        ));
        Ok(())
    }

    fn try_method(&mut self, signature: &str, f: RawFn, is_async: bool) -> Result<(), Diagnostic> {
        if self.pending.is_none() {
            return Err(Diagnostic::NoOpenConstraint(signature.to_string()));
        }

        let sides: Vec<&str> = signature.split("->").collect();
        if sides.len() != 2 {
            return Err(Diagnostic::MalformedSignature(signature.to_string()));
        }
        let mut input_names = split_names(sides[0]);
        let output_names = split_names(sides[1]);

        // A `*` prefix masks that input from the positional adapter.
        let mut mask = vec![false; input_names.len()];
        for (i, name) in input_names.iter_mut().enumerate() {
            if let Some(stripped) = name.strip_prefix('*') {
                mask[i] = true;
                *name = stripped.trim_start().to_string();
            }
        }
        let mask = mask.iter().any(|m| *m).then_some(mask);

        for name in input_names.iter().chain(output_names.iter()) {
            if !self.target.contains(name) {
                return Err(Diagnostic::UnknownName(name.clone()));
            }
        }

        let mut refs = Vec::with_capacity(input_names.len());
        for name in &input_names {
            match self.target.field(name) {
                Some(Field::Var { id, .. }) => refs.push(MethodRef::Var(id.clone())),
                Some(Field::Const(value)) => refs.push(MethodRef::Const(value.clone())),
                _ => return Err(Diagnostic::NotAVariable(name.clone())),
            }
        }

        // Output slots that do not resolve to variables are unselectable and
        // silently dropped; with none left the method is a valid no-op.
        let mut output_ids = Vec::new();
        for name in &output_names {
            if let Some(Field::Var { id, .. }) = self.target.field(name) {
                output_ids.push(id.clone());
            }
        }
        if output_ids.is_empty() {
            return Ok(());
        }

        let pending = match self.pending.as_mut() {
            Some(pending) => pending,
            None => return Err(Diagnostic::NoOpenConstraint(signature.to_string())),
        };
        for reference in &refs {
            if let MethodRef::Var(id) = reference {
                if !pending.contains(id) {
                    return Err(Diagnostic::InputOutsideConstraint(signature.to_string()));
                }
            }
        }
        for id in &output_ids {
            if !pending.contains(id) {
                return Err(Diagnostic::OutputOutsideConstraint(signature.to_string()));
            }
        }

        let activation = if is_async {
            Activation::Async(f)
        } else {
            Activation::Sync(match mask {
                Some(mask) => LiftedFn::with_mask(f, output_ids.len(), mask),
                None => LiftedFn::new(f, output_ids.len()),
            })
        };
        let method = Method::new(
            self.ids.method_id(signature),
            signature,
            pending.variables(),
            output_ids,
            refs,
            activation,
        );
        pending.add_method(method);
        Ok(())
    }

    fn try_equation(&mut self, text: &str) -> Result<(), Diagnostic> {
        let equation = parse(text).map_err(|source| Diagnostic::EquationParse {
            text: text.to_string(),
            source,
        })?;

        let occurrences = equation.names();
        for name in &occurrences {
            if !self.target.contains(name) {
                return Err(Diagnostic::UnknownName(name.to_string()));
            }
        }
        if equation.has_duplicate_name() {
            return Err(Diagnostic::DuplicateEquationName(text.to_string()));
        }

        // Referenced names in declaration order on the target; methods are
        // synthesized in this order.
        let referenced: Vec<String> = self
            .target
            .names()
            .filter(|name| occurrences.contains(name))
            .map(str::to_string)
            .collect();

        let mut resolved = Vec::with_capacity(referenced.len());
        for name in &referenced {
            match self.target.field(name) {
                Some(Field::Var { id, .. }) => resolved.push(MethodRef::Var(id.clone())),
                Some(Field::Const(value)) => resolved.push(MethodRef::Const(value.clone())),
                _ => return Err(Diagnostic::NotAVariable(name.clone())),
            }
        }

        // The constraint's variable set follows first appearance in the
        // equation text; constants never become members.
        let mut constraint_names = Vec::new();
        let mut constraint_vars = Vec::new();
        for name in &occurrences {
            if let Some(Field::Var { id, .. }) = self.target.field(name) {
                constraint_names.push(*name);
                constraint_vars.push(id.clone());
            }
        }

        let signature = constraint_names.join(", ");
        let mut constraint = Constraint::new(
            self.ids.constraint_id(&signature),
            signature,
            constraint_vars.clone(),
        );

        for (i, name) in referenced.iter().enumerate() {
            let MethodRef::Var(output_id) = &resolved[i] else {
                // Constants are usable as inputs but never as outputs.
                continue;
            };
            let solved = solve_for(&equation, name)
                .map_err(|_| Diagnostic::Unsolvable(text.to_string()))?;

            let others: Vec<&str> = referenced
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, n)| n.as_str())
                .collect();
            let method_signature = format!("{} -> {}", others.join(", "), name);

            // The binding list covers every referenced name; the rearranged
            // expression simply never reads the output's position.
            let binding_names = referenced.clone();
            let body: RawFn = Rc::new(move |args: &[Value]| {
                let mut env = HashMap::with_capacity(binding_names.len());
                for (name, value) in binding_names.iter().zip(args) {
                    let n = value.as_number().ok_or(EvalError::NotANumber {
                        actual: value.type_name(),
                    })?;
                    env.insert(name.clone(), n);
                }
                Ok(vec![Value::Number(eval(&solved, &env)?)])
            });

            let method = Method::new(
                self.ids.method_id(&method_signature),
                method_signature,
                &constraint_vars,
                vec![output_id.clone()],
                resolved.clone(),
                Activation::Sync(LiftedFn::new(body, 1)),
            );
            constraint.add_method(method);
        }

        self.target.add_constraint(constraint).map_err(Diagnostic::from)
    }

    fn try_command(&mut self, name: &str, args: &[&str], f: RawFn) -> Result<(), Diagnostic> {
        self.check_new_name(name)?;

        let mut ids = Vec::with_capacity(args.len());
        for arg in args {
            match self.target.field(arg) {
                Some(Field::Var { id, .. }) => ids.push(id.clone()),
                Some(_) => return Err(Diagnostic::NotAVariable(arg.to_string())),
                None => return Err(Diagnostic::UnknownName(arg.to_string())),
            }
        }
        self.target
            .add_command(name, Command::new(ids, f))
            .map_err(Diagnostic::from)
    }
}

/// Strip the leading indirect marker, if present.
fn strip_indirect(name: &str) -> (&str, bool) {
    match name.strip_prefix('$') {
        Some(stripped) => (stripped.trim_start(), true),
        None => (name, false),
    }
}

/// Split one side of a signature on commas, trimming each name. An empty
/// side yields no names.
fn split_names(side: &str) -> Vec<String> {
    let side = side.trim();
    if side.is_empty() {
        return Vec::new();
    }
    side.split(',').map(|name| name.trim().to_string()).collect()
}
