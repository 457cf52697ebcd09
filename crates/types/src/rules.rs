//! Rule trees that decide element visibility.
//!
//! The JSON surface is `{field, operator, value, case_sensitive?, field_function?,
//! value_function?}` for a leaf and `{logic: "and"|"or", rules: [...]}` for a group.
//! Operator and function names are closed enums; names the engine does not know
//! deserialize to an `Unknown` variant instead of failing the template load.
//! A leaf with unreadable fields still loads as a leaf, so it evaluates to `false`.

use crate::de::{lenient_bool, lenient_default, lenient_function, lenient_rules, lenient_string};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A node in a rule tree: either a single comparison or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Condition {
    Rule(Rule),
    Group(RuleGroup),
}

impl Condition {
    /// A group with no rules, which always evaluates to `true`.
    pub fn always() -> Self {
        Condition::Group(RuleGroup::default())
    }

    /// Objects carrying `rules` or `logic` (and the empty object) are groups;
    /// any other object is a leaf. Non-objects become a leaf that never holds.
    pub(crate) fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if is_group(&map) => {
                Condition::Group(serde_json::from_value(Value::Object(map)).unwrap_or_default())
            }
            Value::Object(map) => Condition::Rule(
                serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| Rule::malformed()),
            ),
            _ => Condition::Rule(Rule::malformed()),
        }
    }
}

fn is_group(map: &Map<String, Value>) -> bool {
    map.is_empty() || map.contains_key("rules") || map.contains_key("logic")
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Condition::from_value(Value::deserialize(deserializer)?))
    }
}

impl From<Rule> for Condition {
    fn from(rule: Rule) -> Self {
        Condition::Rule(rule)
    }
}

impl From<RuleGroup> for Condition {
    fn from(group: RuleGroup) -> Self {
        Condition::Group(group)
    }
}

/// How the children of a [`RuleGroup`] are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    #[serde(alias = "OR", alias = "Or", alias = "any")]
    Or,
    #[default]
    #[serde(alias = "AND", alias = "And", alias = "all", other)]
    And,
}

/// A boolean combinator over nested rules. An empty group is vacuously true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default, deserialize_with = "lenient_default")]
    pub logic: Logic,
    #[serde(default, deserialize_with = "lenient_rules")]
    pub rules: Vec<Condition>,
}

impl RuleGroup {
    pub fn new(logic: Logic, rules: Vec<Condition>) -> Self {
        Self { logic, rules }
    }

    pub fn and(rules: Vec<Condition>) -> Self {
        Self::new(Logic::And, rules)
    }

    pub fn or(rules: Vec<Condition>) -> Self {
        Self::new(Logic::Or, rules)
    }
}

/// A single comparison between a dataset field and a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_default")]
    pub operator: OperatorKind,
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub case_sensitive: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_function"
    )]
    pub field_function: Option<FunctionKind>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_function"
    )]
    pub value_function: Option<FunctionKind>,
}

impl Rule {
    /// A case-insensitive rule without operand functions.
    pub fn new(field: impl Into<String>, operator: OperatorKind, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            case_sensitive: false,
            field_function: None,
            value_function: None,
        }
    }

    fn malformed() -> Self {
        Self::new("", OperatorKind::Unknown, Value::Null)
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn field_function(mut self, function: FunctionKind) -> Self {
        self.field_function = Some(function);
        self
    }

    pub fn value_function(mut self, function: FunctionKind) -> Self {
        self.value_function = Some(function);
        self
    }
}

/// Comparison operators understood by the condition evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    #[serde(rename = "=", alias = "==", alias = "equals")]
    Equal,
    #[serde(rename = "!=", alias = "<>", alias = "not_equals")]
    NotEqual,
    #[serde(rename = ">", alias = "greater_than")]
    GreaterThan,
    #[serde(rename = "<", alias = "less_than")]
    LessThan,
    #[serde(rename = ">=", alias = "greater_than_or_equal")]
    GreaterThanOrEqual,
    #[serde(rename = "<=", alias = "less_than_or_equal")]
    LessThanOrEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    #[serde(rename = "empty", alias = "is_empty")]
    Empty,
    #[serde(rename = "not_empty", alias = "is_not_empty")]
    NotEmpty,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = "regex", alias = "matches")]
    Regex,
    #[serde(rename = "between")]
    Between,
    /// Any operator name the engine does not implement. Always evaluates to `false`.
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// Functions applied to a rule operand before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Length,
    Upper,
    Lower,
    Trim,
    Date,
    Number,
    Round,
    Abs,
    Sum,
    #[serde(alias = "avg")]
    Average,
    Count,
    Unique,
    /// Unrecognised function name. The operand passes through unchanged.
    #[serde(other)]
    Unknown,
}
