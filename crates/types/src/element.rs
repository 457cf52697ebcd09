//! The unresolved input side: templates, pages and element definitions.
use crate::de::{lenient_i64, lenient_loop, lenient_string, lenient_styles};
use crate::geometry::Rect;
use crate::rules::Condition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A declarative page template: an ordered sequence of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Template {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { name: None, pages }
    }
}

/// One page of a template and the elements it owns, in stacking order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub elements: Vec<ElementTemplate>,
}

impl Page {
    pub fn new(id: impl Into<String>, elements: Vec<ElementTemplate>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }
}

/// An element definition that may be conditional and/or repeating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTemplate {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// Back-reference to the owning page.
    #[serde(
        rename = "pageId",
        alias = "page_id",
        default,
        deserialize_with = "lenient_string"
    )]
    pub page_id: String,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_styles")]
    pub styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Condition>,
    #[serde(
        rename = "loop",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_loop"
    )]
    pub repeat: Option<LoopSpec>,
}

impl ElementTemplate {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            rect,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<Condition>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    pub fn with_loop(mut self, spec: LoopSpec) -> Self {
        self.repeat = Some(spec);
        self
    }
}

fn default_step() -> i64 {
    1
}

/// A repeating-element construct. A definition that cannot be read loads as
/// [`LoopSpec::Unknown`] rather than failing the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LoopSpec {
    /// Counts `start..=end` by `step`.
    #[serde(alias = "FOR")]
    For {
        #[serde(default, deserialize_with = "lenient_i64")]
        start: i64,
        #[serde(default, deserialize_with = "lenient_i64")]
        end: i64,
        #[serde(default = "default_step", deserialize_with = "lenient_i64")]
        step: i64,
    },
    /// Iterates the array found at a dataset path.
    #[serde(alias = "FOREACH", alias = "for_each")]
    Foreach {
        #[serde(
            rename = "dataSource",
            alias = "data_source",
            default,
            deserialize_with = "lenient_string"
        )]
        data_source: String,
    },
    /// Repeats while a rule tree holds.
    #[serde(alias = "WHILE")]
    While { condition: Condition },
    /// A loop type the engine does not implement. Expands to nothing.
    #[serde(other)]
    Unknown,
}

impl LoopSpec {
    pub fn kind(&self) -> LoopKind {
        match self {
            LoopSpec::For { .. } => LoopKind::For,
            LoopSpec::Foreach { .. } => LoopKind::Foreach,
            LoopSpec::While { .. } => LoopKind::While,
            LoopSpec::Unknown => LoopKind::Unknown,
        }
    }
}

/// The discriminant of a [`LoopSpec`], used in reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    For,
    Foreach,
    While,
    Unknown,
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoopKind::For => "for",
            LoopKind::Foreach => "foreach",
            LoopKind::While => "while",
            LoopKind::Unknown => "unknown",
        })
    }
}
