//! Standard stage kinds and their factories.
//!
//! Each factory builds one fully-configured stage; validation beyond what
//! the constructor needs is not its business.

use crate::stage::{Stage, StageError, StageResult, Timing};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tether_core::Value;

fn number(input: &Value, to: &'static str) -> Result<f64, StageError> {
    input.as_number().ok_or(StageError::Conversion {
        from: input.type_name(),
        to,
    })
}

/// Forwards each value after a fixed delay.
#[derive(Debug)]
pub struct Delay {
    window: Duration,
}

impl Stage for Delay {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn apply(&self, input: Value) -> StageResult {
        Ok(input)
    }

    fn timing(&self) -> Option<Timing> {
        Some(Timing::Delay(self.window))
    }
}

/// A delay stage.
pub fn delay(time_ms: u64) -> Delay {
    Delay {
        window: Duration::from_millis(time_ms),
    }
}

/// Forwards only the last value seen within a quiet window (debouncing).
#[derive(Debug)]
pub struct Stabilize {
    window: Duration,
    flush: Option<Value>,
}

impl Stage for Stabilize {
    fn name(&self) -> &'static str {
        "stabilize"
    }

    fn apply(&self, input: Value) -> StageResult {
        Ok(input)
    }

    fn timing(&self) -> Option<Timing> {
        Some(Timing::Stabilize {
            window: self.window,
            flush: self.flush.clone(),
        })
    }
}

/// A stabilization stage.
pub fn stabilize(time_ms: u64) -> Stabilize {
    Stabilize {
        window: Duration::from_millis(time_ms),
        flush: None,
    }
}

/// A stabilization stage that flushes a fixed value when its window opens.
pub fn stabilize_flush(time_ms: u64, flush: impl Into<Value>) -> Stabilize {
    Stabilize {
        window: Duration::from_millis(time_ms),
        flush: Some(flush.into()),
    }
}

/// Replaces any upstream error with a fixed message.
#[derive(Debug)]
pub struct ReplaceError {
    message: String,
}

impl Stage for ReplaceError {
    fn name(&self) -> &'static str {
        "msg"
    }

    fn apply(&self, input: Value) -> StageResult {
        Ok(input)
    }

    fn recover(&self, _error: StageError) -> StageResult {
        Err(StageError::Message(self.message.clone()))
    }
}

/// An error-replacement stage.
pub fn msg(message: impl Into<String>) -> ReplaceError {
    ReplaceError {
        message: message.into(),
    }
}

/// Rejects absent values (null or the empty string).
#[derive(Debug)]
pub struct Required;

impl Stage for Required {
    fn name(&self) -> &'static str {
        "req"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Null => Err(StageError::Required),
            Value::Str(s) if s.is_empty() => Err(StageError::Required),
            _ => Ok(input),
        }
    }
}

/// A presence stage.
pub fn req() -> Required {
    Required
}

/// Substitutes a fixed value for absent values and upstream errors.
#[derive(Debug)]
pub struct DefaultValue {
    value: Value,
}

impl Stage for DefaultValue {
    fn name(&self) -> &'static str {
        "def"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Null => Ok(self.value.clone()),
            Value::Str(s) if s.is_empty() => Ok(self.value.clone()),
            _ => Ok(input),
        }
    }

    fn recover(&self, _error: StageError) -> StageResult {
        Ok(self.value.clone())
    }
}

/// A default-value stage.
pub fn def(value: impl Into<Value>) -> DefaultValue {
    DefaultValue {
        value: value.into(),
    }
}

/// Rounds a number to a fixed count of decimal places.
#[derive(Debug)]
pub struct Round {
    places: i32,
}

impl Stage for Round {
    fn name(&self) -> &'static str {
        "round"
    }

    fn apply(&self, input: Value) -> StageResult {
        let n = number(&input, "number")?;
        let factor = 10f64.powi(self.places);
        Ok(Value::Number((n * factor).round() / factor))
    }
}

/// A rounding stage. Negative places round to tens, hundreds, and so on.
pub fn round(places: i32) -> Round {
    Round { places }
}

/// Formats a number with a fixed count of decimal places.
#[derive(Debug)]
pub struct ToFixed {
    places: usize,
}

impl Stage for ToFixed {
    fn name(&self) -> &'static str {
        "fix"
    }

    fn apply(&self, input: Value) -> StageResult {
        let n = number(&input, "string")?;
        Ok(Value::Str(format!("{:.*}", self.places, n)))
    }
}

/// A fixed-notation formatting stage.
pub fn fix(places: usize) -> ToFixed {
    ToFixed { places }
}

/// Formats a number to a count of significant digits.
#[derive(Debug)]
pub struct ToPrecision {
    sigfigs: usize,
}

impl Stage for ToPrecision {
    fn name(&self) -> &'static str {
        "prec"
    }

    fn apply(&self, input: Value) -> StageResult {
        let n = number(&input, "string")?;
        if n == 0.0 {
            return Ok(Value::Str(format!(
                "{:.*}",
                self.sigfigs.saturating_sub(1),
                0.0
            )));
        }
        let exponent = n.abs().log10().floor() as i32;
        let decimals = (self.sigfigs as i32 - 1 - exponent).max(0) as usize;
        let factor = 10f64.powi(self.sigfigs as i32 - 1 - exponent);
        let rounded = (n * factor).round() / factor;
        Ok(Value::Str(format!("{:.*}", decimals, rounded)))
    }
}

/// A significant-digits formatting stage.
pub fn prec(sigfigs: usize) -> ToPrecision {
    ToPrecision { sigfigs }
}

/// Formats a number in exponential notation with a fixed count of decimal
/// places.
#[derive(Debug)]
pub struct ToExponential {
    places: usize,
}

impl Stage for ToExponential {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn apply(&self, input: Value) -> StageResult {
        let n = number(&input, "string")?;
        Ok(Value::Str(format!("{:.*e}", self.places, n)))
    }
}

/// An exponential-notation formatting stage.
pub fn exp(places: usize) -> ToExponential {
    ToExponential { places }
}

/// Multiplies a number by a fixed factor.
#[derive(Debug)]
pub struct Scale {
    factor: f64,
}

impl Stage for Scale {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn apply(&self, input: Value) -> StageResult {
        let n = number(&input, "number")?;
        Ok(Value::Number(n * self.factor))
    }
}

/// A scaling stage.
pub fn scale(factor: f64) -> Scale {
    Scale { factor }
}

/// Applies an arbitrary transformation function.
pub struct FnStage {
    f: Rc<dyn Fn(Value) -> StageResult>,
}

impl Stage for FnStage {
    fn name(&self) -> &'static str {
        "fn"
    }

    fn apply(&self, input: Value) -> StageResult {
        (self.f)(input)
    }
}

impl fmt::Debug for FnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage").finish()
    }
}

/// A function stage.
pub fn func(f: impl Fn(Value) -> StageResult + 'static) -> FnStage {
    FnStage { f: Rc::new(f) }
}
