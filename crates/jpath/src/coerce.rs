//! Explicit coercion rules shared by rules, placeholders and math.
//!
//! Template data comes from web forms, so almost everything arrives as a string.
//! These functions pin down how strings, numbers, booleans and arrays convert
//! into one another; there is no other implicit truthiness anywhere in the engine.
use itertools::Itertools;
use serde_json::{Number, Value};

/// Text form of a value. Arrays join their elements with `", "`; null and
/// objects render as the empty string.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(to_text).join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => format_plain(f),
        _ => n.to_string(),
    }
}

/// Shortest decimal text for `f`, without a trailing `.0` on integral values.
pub fn format_plain(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        // Normalizes `-0` as well.
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// Parses a decimal string, rejecting the `inf`/`nan` spellings that Rust's
/// float parser would otherwise accept.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Numeric form of a scalar. Arrays, objects, null and non-numeric strings have none.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Wraps an `f64` as a JSON number, preferring an integer representation.
/// Non-finite input becomes `0`.
pub fn number_value(f: f64) -> Value {
    if !f.is_finite() {
        return Value::from(0);
    }
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        Value::from(f)
    }
}

/// Emptiness: null, `""`, `"0"`, `false`, `0`, `[]` and `{}` are empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Loose equality between two values.
///
/// A boolean on either side compares against the other side's non-emptiness;
/// two numeric operands compare as numbers (`"10" == 10.0`); anything else
/// compares by text.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == !is_empty(other),
        _ => match (scalar_number(a), scalar_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => to_text(a) == to_text(b),
        },
    }
}

fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) | Value::String(_) => to_number(value),
        _ => None,
    }
}
