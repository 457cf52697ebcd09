//! Recursive evaluation of rule trees against a [`Scope`].
use crate::functions::apply_optional;
use crate::operators::compare;
use serde_json::Value;
use stencil_jpath::Scope;
use stencil_types::{Condition, Logic, OperatorKind, Rule, RuleGroup};

/// Evaluates a rule or group. Never fails; see [`evaluate_rule`].
pub fn evaluate(condition: &Condition, scope: &Scope<'_>) -> bool {
    match condition {
        Condition::Rule(rule) => evaluate_rule(rule, scope),
        Condition::Group(group) => evaluate_group(group, scope),
    }
}

/// Combines the children of a group. An empty group is `true` for both
/// `and` and `or`, which lets `{"rules": []}` mean "always show".
pub fn evaluate_group(group: &RuleGroup, scope: &Scope<'_>) -> bool {
    if group.rules.is_empty() {
        return true;
    }
    match group.logic {
        Logic::And => group.rules.iter().all(|c| evaluate(c, scope)),
        Logic::Or => group.rules.iter().any(|c| evaluate(c, scope)),
    }
}

/// Evaluates a single comparison.
///
/// The field is resolved through `scope` (missing paths read as `""`), each
/// side runs through its optional function, then both sides are lowercased
/// unless the rule is case sensitive.
pub fn evaluate_rule(rule: &Rule, scope: &Scope<'_>) -> bool {
    if rule.operator == OperatorKind::Unknown {
        log::debug!("Rule on '{}' uses an unknown operator; evaluating to false", rule.field);
        return false;
    }

    let field = apply_optional(rule.field_function, scope.lookup(&rule.field).clone());
    let value = apply_optional(rule.value_function, rule.value.clone());

    // Regex folds case through the pattern engine; lowercasing the pattern
    // would turn `\D` into `\d`.
    let (field, value) = if rule.case_sensitive || rule.operator == OperatorKind::Regex {
        (field, value)
    } else {
        (fold_case(field), fold_case(value))
    };

    let result = compare(rule.operator, &field, &value, rule.case_sensitive);
    log::trace!(
        "Rule '{}' {:?} {} -> {}",
        rule.field,
        rule.operator,
        value,
        result
    );
    result
}

fn fold_case(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_case).collect()),
        other => other,
    }
}
