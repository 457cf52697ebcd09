//! Path lookup over a dataset, optionally shadowed by loop-local variables.
use crate::ast::{Path, PathSegment};
use crate::parser::parse_path;
use serde_json::{Map, Value};
use stencil_types::Dataset;

static MISSING: Value = Value::String(String::new());

/// The name resolution context for one evaluation: a dataset plus the locals
/// bound by an enclosing loop iteration (`i`, `index`, `item`, ...).
///
/// Locals shadow dataset keys of the same name.
#[derive(Debug, Clone)]
pub struct Scope<'d> {
    dataset: &'d Dataset,
    locals: Map<String, Value>,
}

impl<'d> Scope<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        Self {
            dataset,
            locals: Map::new(),
        }
    }

    pub fn dataset(&self) -> &'d Dataset {
        self.dataset
    }

    /// Binds a loop-local variable.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.locals.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    fn top_level(&self, key: &str) -> Option<&Value> {
        self.locals.get(key).or_else(|| self.dataset.get(key))
    }

    /// Returns true if `raw` names a top-level key exactly as written.
    pub fn has_key(&self, raw: &str) -> bool {
        self.top_level(raw).is_some()
    }

    /// Resolves `raw` to a value.
    ///
    /// An exact top-level key wins over path syntax, so keys containing dots or
    /// spaces (`"First Name"`, `"a.b"`) still resolve. Otherwise `raw` is parsed
    /// as a path and walked segment by segment.
    pub fn select(&self, raw: &str) -> Option<&Value> {
        if let Some(value) = self.top_level(raw) {
            return Some(value);
        }
        let path = parse_path(raw).ok()?;
        self.select_path(&path)
    }

    pub fn select_path(&self, path: &Path) -> Option<&Value> {
        let mut segments = path.segments.iter();
        let mut current = match segments.next()? {
            PathSegment::Key(key) => self.top_level(key)?,
            PathSegment::Index(_) => return None,
        };
        for segment in segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Like [`Scope::select`], but a missing path resolves to the empty string.
    pub fn lookup(&self, raw: &str) -> &Value {
        self.select(raw).unwrap_or(&MISSING)
    }
}
