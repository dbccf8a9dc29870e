//! The bidirectional type-converter stage family.
//!
//! Each converter is unidirectional; the family covers both directions of
//! every pairing (string/number, date/milliseconds, and so on). Failed
//! conversions are stage errors, recoverable downstream by `msg` or `def`.

use crate::stage::{Stage, StageError, StageResult};
use chrono::{DateTime, Utc};
use tether_core::Value;

fn conversion(input: &Value, to: &'static str) -> StageError {
    StageError::Conversion {
        from: input.type_name(),
        to,
    }
}

fn millis_to_date(ms: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms as i64)
}

/// Renders any value as a string.
#[derive(Debug)]
pub struct ToStr;

impl Stage for ToStr {
    fn name(&self) -> &'static str {
        "to_str"
    }

    fn apply(&self, input: Value) -> StageResult {
        Ok(Value::Str(input.to_string()))
    }
}

/// A string conversion stage.
pub fn to_str() -> ToStr {
    ToStr
}

/// Converts strings, booleans, and dates to numbers.
#[derive(Debug)]
pub struct ToNum;

impl Stage for ToNum {
    fn name(&self) -> &'static str {
        "to_num"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Number(_) => Ok(input),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| conversion(&input, "number")),
            Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
            Value::Date(d) => Ok(Value::Number(d.timestamp_millis() as f64)),
            _ => Err(conversion(&input, "number")),
        }
    }
}

/// A number conversion stage.
pub fn to_num() -> ToNum {
    ToNum
}

/// Converts RFC 3339 strings and millisecond counts to dates.
#[derive(Debug)]
pub struct ToDate;

impl Stage for ToDate {
    fn name(&self) -> &'static str {
        "to_date"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Date(_) => Ok(input),
            Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|d| Value::Date(d.with_timezone(&Utc)))
                .map_err(|_| conversion(&input, "date")),
            Value::Number(ms) => millis_to_date(*ms)
                .map(Value::Date)
                .ok_or_else(|| conversion(&input, "date")),
            _ => Err(conversion(&input, "date")),
        }
    }
}

/// A date conversion stage.
pub fn to_date() -> ToDate {
    ToDate
}

/// Parses a JSON document from a string.
#[derive(Debug)]
pub struct ToJson;

impl Stage for ToJson {
    fn name(&self) -> &'static str {
        "to_json"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Json(_) => Ok(input),
            Value::Str(s) => serde_json::from_str(s)
                .map(Value::Json)
                .map_err(|_| conversion(&input, "json")),
            _ => Err(conversion(&input, "json")),
        }
    }
}

/// A JSON parsing stage.
pub fn to_json() -> ToJson {
    ToJson
}

/// Renders a date as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug)]
pub struct DateToString;

impl Stage for DateToString {
    fn name(&self) -> &'static str {
        "date_to_string"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Date(d) => Ok(Value::Str(d.format("%Y-%m-%d %H:%M:%S").to_string())),
            _ => Err(conversion(&input, "string")),
        }
    }
}

/// A date formatting stage.
pub fn date_to_string() -> DateToString {
    DateToString
}

/// Renders the calendar-date part of a date as `YYYY-MM-DD`.
#[derive(Debug)]
pub struct DateToDateString;

impl Stage for DateToDateString {
    fn name(&self) -> &'static str {
        "date_to_date_string"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Date(d) => Ok(Value::Str(d.format("%Y-%m-%d").to_string())),
            _ => Err(conversion(&input, "string")),
        }
    }
}

/// A calendar-date formatting stage.
pub fn date_to_date_string() -> DateToDateString {
    DateToDateString
}

/// Renders the time-of-day part of a date as `HH:MM:SS`.
#[derive(Debug)]
pub struct DateToTimeString;

impl Stage for DateToTimeString {
    fn name(&self) -> &'static str {
        "date_to_time_string"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Date(d) => Ok(Value::Str(d.format("%H:%M:%S").to_string())),
            _ => Err(conversion(&input, "string")),
        }
    }
}

/// A time-of-day formatting stage.
pub fn date_to_time_string() -> DateToTimeString {
    DateToTimeString
}

/// Converts a date to milliseconds since the Unix epoch.
#[derive(Debug)]
pub struct DateToMilliseconds;

impl Stage for DateToMilliseconds {
    fn name(&self) -> &'static str {
        "date_to_milliseconds"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Date(d) => Ok(Value::Number(d.timestamp_millis() as f64)),
            _ => Err(conversion(&input, "number")),
        }
    }
}

/// A date-to-milliseconds stage.
pub fn date_to_milliseconds() -> DateToMilliseconds {
    DateToMilliseconds
}

/// Converts milliseconds since the Unix epoch to a date.
#[derive(Debug)]
pub struct MillisecondsToDate;

impl Stage for MillisecondsToDate {
    fn name(&self) -> &'static str {
        "milliseconds_to_date"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Number(ms) => millis_to_date(*ms)
                .map(Value::Date)
                .ok_or_else(|| conversion(&input, "date")),
            _ => Err(conversion(&input, "date")),
        }
    }
}

/// A milliseconds-to-date stage.
pub fn milliseconds_to_date() -> MillisecondsToDate {
    MillisecondsToDate
}

/// Translates a point by fixed deltas.
#[derive(Debug)]
pub struct Offset {
    dx: f64,
    dy: f64,
}

impl Stage for Offset {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Point(p) => Ok(Value::Point(p.translate(self.dx, self.dy))),
            _ => Err(conversion(&input, "point")),
        }
    }
}

/// A point translation stage.
pub fn offset(dx: f64, dy: f64) -> Offset {
    Offset { dx, dy }
}

/// Renders a point as `(x, y)`.
#[derive(Debug)]
pub struct PointToString;

impl Stage for PointToString {
    fn name(&self) -> &'static str {
        "point_to_string"
    }

    fn apply(&self, input: Value) -> StageResult {
        match &input {
            Value::Point(p) => Ok(Value::Str(p.to_string())),
            _ => Err(conversion(&input, "string")),
        }
    }
}

/// A point formatting stage.
pub fn point_to_string() -> PointToString {
    PointToString
}
