//! Built-in functions applied to rule operands before comparison.
//!
//! Each function accepts a scalar or an array. String and per-number functions
//! map over arrays element by element; aggregate functions (`sum`, `average`,
//! `count`, `unique`, `length`) consume the array as a whole. Numeric functions
//! read non-numeric input as `0`.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde_json::Value;
use stencil_jpath::{number_value, parse_number, to_number, to_text};
use stencil_types::FunctionKind;

/// Applies an optional function; `None` leaves the operand untouched.
pub fn apply_optional(function: Option<FunctionKind>, value: Value) -> Value {
    match function {
        Some(function) => apply_function(function, value),
        None => value,
    }
}

/// Dispatches a function to its implementation.
pub fn apply_function(function: FunctionKind, value: Value) -> Value {
    match function {
        // String
        FunctionKind::Length => length(&value),
        FunctionKind::Upper => map_scalars(value, &|s| map_string(s, str::to_uppercase)),
        FunctionKind::Lower => map_scalars(value, &|s| map_string(s, str::to_lowercase)),
        FunctionKind::Trim => map_scalars(value, &|s| map_string(s, |t| t.trim().to_string())),
        FunctionKind::Date => map_scalars(value, &to_date),

        // Number
        FunctionKind::Number => map_scalars(value, &|v| number_value(number_or_zero(&v))),
        FunctionKind::Round => map_scalars(value, &|v| number_value(number_or_zero(&v).round())),
        FunctionKind::Abs => map_scalars(value, &|v| number_value(number_or_zero(&v).abs())),

        // Aggregate
        FunctionKind::Sum => number_value(sum(&value)),
        FunctionKind::Average => number_value(average(&value)),
        FunctionKind::Count => Value::from(count(&value)),
        FunctionKind::Unique => unique(value),

        FunctionKind::Unknown => value,
    }
}

// --- Helpers ---

fn map_scalars(value: Value, f: &dyn Fn(Value) -> Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_scalars(v, f)).collect()),
        other => f(other),
    }
}

fn map_string(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn number_or_zero(value: &Value) -> f64 {
    to_number(value).unwrap_or(0.0)
}

// --- Implementations ---

fn length(value: &Value) -> Value {
    let len = match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => to_text(other).chars().count(),
    };
    Value::from(len)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%B %d, %Y", "%d %B %Y"];

fn epoch_date(seconds: f64) -> Option<String> {
    DateTime::from_timestamp(seconds.trunc() as i64, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Normalizes a Unix timestamp or a parseable date string to `YYYY-MM-DD`.
/// Anything unparseable becomes the empty string.
fn to_date(value: Value) -> Value {
    let text = match &value {
        Value::Number(n) => {
            return Value::String(n.as_f64().and_then(epoch_date).unwrap_or_default());
        }
        Value::String(s) => s.trim(),
        _ => return Value::String(String::new()),
    };

    let parsed = parse_number(text)
        .and_then(epoch_date)
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.format("%Y-%m-%d").to_string())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.format("%Y-%m-%d").to_string())
        });

    Value::String(parsed.unwrap_or_default())
}

fn sum(value: &Value) -> f64 {
    match value {
        Value::Array(items) => items.iter().map(number_or_zero).sum(),
        other => number_or_zero(other),
    }
}

fn average(value: &Value) -> f64 {
    match value {
        Value::Array(items) if items.is_empty() => 0.0,
        Value::Array(items) => sum(value) / items.len() as f64,
        other => number_or_zero(other),
    }
}

fn count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null => 0,
        Value::String(s) if s.is_empty() => 0,
        _ => 1,
    }
}

fn unique(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().unique_by(to_text).collect()),
        other => other,
    }
}
