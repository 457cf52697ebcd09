//! Comparison operators.
//!
//! Every operator is total: type mismatches, non-numeric operands and invalid
//! patterns evaluate to `false` instead of raising an error.
use regex::RegexBuilder;
use serde_json::Value;
use stencil_jpath::{is_empty, loose_eq, parse_number, to_number, to_text};
use stencil_types::OperatorKind;

/// Compiled-size ceiling for user-supplied patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Applies `op` to a prepared field operand and value operand.
///
/// `case_sensitive` only matters for `regex`; for every other operator the
/// caller has already case-folded the operands.
pub fn compare(op: OperatorKind, field: &Value, value: &Value, case_sensitive: bool) -> bool {
    match op {
        OperatorKind::Equal => loose_eq(field, value),
        OperatorKind::NotEqual => !loose_eq(field, value),

        OperatorKind::GreaterThan => numeric(field, value, |a, b| a > b),
        OperatorKind::LessThan => numeric(field, value, |a, b| a < b),
        OperatorKind::GreaterThanOrEqual => numeric(field, value, |a, b| a >= b),
        OperatorKind::LessThanOrEqual => numeric(field, value, |a, b| a <= b),

        OperatorKind::Contains => to_text(field).contains(&to_text(value)),
        OperatorKind::NotContains => !to_text(field).contains(&to_text(value)),
        OperatorKind::StartsWith => to_text(field).starts_with(&to_text(value)),
        OperatorKind::EndsWith => to_text(field).ends_with(&to_text(value)),

        OperatorKind::Empty => is_empty(field),
        OperatorKind::NotEmpty => !is_empty(field),

        OperatorKind::In => is_in(field, value),
        OperatorKind::NotIn => !is_in(field, value),

        OperatorKind::Regex => matches_pattern(field, value, case_sensitive),
        OperatorKind::Between => between(field, value),

        OperatorKind::Unknown => false,
    }
}

fn numeric(field: &Value, value: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (to_number(field), to_number(value)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// The candidate list for `in`/`not_in`: a literal array, or the value's text
/// split on commas with blank entries dropped.
fn candidates(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => to_text(other)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect(),
    }
}

/// Membership test. An array field (a multi-select answer) is a member when
/// any of its entries is.
fn is_in(field: &Value, value: &Value) -> bool {
    let list = candidates(value);
    let contains = |needle: &Value| list.iter().any(|c| loose_eq(needle, c));
    match field {
        Value::Array(items) => items.iter().any(contains),
        other => contains(other),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct PatternFlags {
    case_insensitive: bool,
    multi_line: bool,
    dot_all: bool,
    extended: bool,
}

/// Splits a `/pattern/flags` literal into its pattern and flags. Anything that
/// does not end in a recognised flag set is taken as a bare pattern.
fn split_delimited(pattern: &str) -> (&str, PatternFlags) {
    let delimited = pattern.strip_prefix('/').and_then(|body| {
        let end = body.rfind('/')?;
        let flags = &body[end + 1..];
        flags
            .chars()
            .all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u'))
            .then(|| {
                let parsed = PatternFlags {
                    case_insensitive: flags.contains('i'),
                    multi_line: flags.contains('m'),
                    dot_all: flags.contains('s'),
                    extended: flags.contains('x'),
                };
                (&body[..end], parsed)
            })
    });
    delimited.unwrap_or((pattern, PatternFlags::default()))
}

/// Unanchored search of `value` as a pattern within the field's text.
fn matches_pattern(field: &Value, value: &Value, case_sensitive: bool) -> bool {
    let raw = to_text(value);
    let (pattern, flags) = split_delimited(&raw);
    let built = RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive || !case_sensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_all)
        .ignore_whitespace(flags.extended)
        .size_limit(REGEX_SIZE_LIMIT)
        .build();
    match built {
        Ok(re) => re.is_match(&to_text(field)),
        Err(e) => {
            log::warn!("Invalid regex pattern '{}' in rule: {}", raw, e);
            false
        }
    }
}

/// Inclusive numeric range. The value must supply exactly two numeric bounds,
/// either as a two-element array or as `"min,max"`.
fn between(field: &Value, value: &Value) -> bool {
    let bounds: Vec<Option<f64>> = match value {
        Value::Array(items) => items.iter().map(to_number).collect(),
        other => to_text(other).split(',').map(parse_number).collect(),
    };
    let [Some(min), Some(max)] = bounds.as_slice() else {
        return false;
    };
    match to_number(field) {
        Some(n) => n >= *min && n <= *max,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_is_loose() {
        assert!(compare(OperatorKind::Equal, &json!("5"), &json!(5), true));
        assert!(compare(OperatorKind::NotEqual, &json!("5"), &json!("6"), true));
    }

    #[test]
    fn numeric_comparisons_reject_non_numbers() {
        assert!(compare(OperatorKind::GreaterThan, &json!("10"), &json!("9"), true));
        assert!(compare(OperatorKind::LessThanOrEqual, &json!(3), &json!("3.0"), true));
        assert!(!compare(OperatorKind::GreaterThan, &json!("abc"), &json!("1"), true));
        assert!(!compare(OperatorKind::LessThan, &json!(""), &json!("1"), true));
        assert!(!compare(OperatorKind::LessThan, &json!([1]), &json!("5"), true));
    }

    #[test]
    fn substring_operators() {
        let field = json!("invoice-2024-final");
        assert!(compare(OperatorKind::Contains, &field, &json!("2024"), true));
        assert!(compare(OperatorKind::NotContains, &field, &json!("draft"), true));
        assert!(compare(OperatorKind::StartsWith, &field, &json!("invoice"), true));
        assert!(compare(OperatorKind::EndsWith, &field, &json!("final"), true));
        assert!(compare(OperatorKind::Contains, &json!(["red", "blue"]), &json!("blue"), true));
    }

    #[test]
    fn membership() {
        assert!(compare(OperatorKind::In, &json!("b"), &json!("a, b ,c"), true));
        assert!(compare(OperatorKind::In, &json!(2), &json!(["1", "2"]), true));
        assert!(compare(OperatorKind::In, &json!(["x", "c"]), &json!("a,b,c"), true));
        assert!(!compare(OperatorKind::In, &json!(""), &json!(""), true));
        assert!(compare(OperatorKind::NotIn, &json!("z"), &json!("a,b"), true));
    }

    #[test]
    fn regex_is_unanchored() {
        assert!(compare(OperatorKind::Regex, &json!("order #123"), &json!(r"\d+"), true));
        assert!(!compare(OperatorKind::Regex, &json!("order"), &json!(r"^\d+$"), true));
        assert!(compare(OperatorKind::Regex, &json!("HELLO"), &json!("/hello/i"), true));
        assert!(compare(OperatorKind::Regex, &json!("HELLO"), &json!("hello"), false));
        assert!(!compare(OperatorKind::Regex, &json!("HELLO"), &json!("hello"), true));
        assert!(!compare(OperatorKind::Regex, &json!("x"), &json!("(unclosed"), true));
        assert!(compare(OperatorKind::Regex, &json!("/usr/bin/env"), &json!("/usr/bin"), true));
    }

    #[test]
    fn between_is_inclusive() {
        assert!(compare(OperatorKind::Between, &json!(5), &json!("5,10"), true));
        assert!(compare(OperatorKind::Between, &json!("10"), &json!("5, 10"), true));
        assert!(!compare(OperatorKind::Between, &json!(4.999), &json!("5,10"), true));
        assert!(compare(OperatorKind::Between, &json!(7), &json!([5, "10"]), true));
        assert!(!compare(OperatorKind::Between, &json!(7), &json!("5"), true));
        assert!(!compare(OperatorKind::Between, &json!(7), &json!("1,5,10"), true));
        assert!(!compare(OperatorKind::Between, &json!("seven"), &json!("5,10"), true));
    }

    #[test]
    fn emptiness_and_unknown() {
        assert!(compare(OperatorKind::Empty, &json!("0"), &json!(null), true));
        assert!(compare(OperatorKind::NotEmpty, &json!(["a"]), &json!(null), true));
        assert!(!compare(OperatorKind::Unknown, &json!("a"), &json!("a"), true));
    }
}
