//! Reading templates, datasets and conditions from JSON.
use crate::error::StencilError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use stencil_jpath::{PathSegment, parse_path};
use stencil_types::{Condition, Dataset, Template};

fn read_source(path: &Path, what: &str) -> Result<String, StencilError> {
    fs::read_to_string(path).map_err(|e| {
        StencilError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}

fn parse_json<T: DeserializeOwned>(source: &str) -> Result<T, StencilError> {
    Ok(serde_json::from_str(source)?)
}

pub fn parse_template(source: &str) -> Result<Template, StencilError> {
    parse_json(source)
}

pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Template, StencilError> {
    parse_template(&read_source(path.as_ref(), "template")?)
}

/// Parses a dataset. The top-level JSON value must be an object.
pub fn parse_dataset(source: &str) -> Result<Dataset, StencilError> {
    match parse_json::<Value>(source)? {
        Value::Object(map) => Ok(Dataset::from(map)),
        other => Err(StencilError::DatasetNotObject(json_kind(&other))),
    }
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, StencilError> {
    parse_dataset(&read_source(path.as_ref(), "dataset")?)
}

/// Parses a single rule or a rule group.
pub fn parse_condition(source: &str) -> Result<Condition, StencilError> {
    parse_json(source)
}

pub fn load_condition<P: AsRef<Path>>(path: P) -> Result<Condition, StencilError> {
    parse_condition(&read_source(path.as_ref(), "condition")?)
}

/// Applies a `key=value` override to a dataset. The key may be a dotted path,
/// in which case intermediate objects are created (or replaced when they hold
/// a non-object). Values are stored as strings, like submitted form fields.
pub fn apply_override(dataset: &mut Dataset, assignment: &str) -> Result<(), StencilError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| StencilError::Override(assignment.to_string(), "expected KEY=VALUE".into()))?;
    let path = parse_path(key.trim())?;

    let mut keys = Vec::with_capacity(path.segments.len());
    for segment in &path.segments {
        match segment {
            PathSegment::Key(k) => keys.push(k.as_str()),
            PathSegment::Index(_) => {
                return Err(StencilError::Override(
                    assignment.to_string(),
                    "array indices cannot be assigned".into(),
                ));
            }
        }
    }

    let Some((last, parents)) = keys.split_last() else {
        return Err(StencilError::Override(assignment.to_string(), "empty key".into()));
    };
    let mut target = dataset.as_map_mut();
    for parent in parents {
        let slot = target
            .entry(parent.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        target = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(StencilError::Override(
                    assignment.to_string(),
                    format!("'{}' is not an object", parent),
                ));
            }
        };
    }
    target.insert(last.to_string(), Value::String(value.to_string()));
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataset_must_be_object() {
        assert!(parse_dataset(r#"{"a": 1}"#).is_ok());
        let err = parse_dataset("[1, 2]").unwrap_err();
        assert!(matches!(err, StencilError::DatasetNotObject("an array")));
        assert!(matches!(parse_dataset("{"), Err(StencilError::Json(_))));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_template("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_overrides() {
        let mut dataset = Dataset::from_value(json!({ "name": "x", "customer": "flat" }));
        apply_override(&mut dataset, "name=Ada").unwrap();
        apply_override(&mut dataset, "customer.city=Oslo").unwrap();
        apply_override(&mut dataset, "order.total=12=5").unwrap();
        assert_eq!(dataset.get("name"), Some(&json!("Ada")));
        assert_eq!(dataset.get("customer"), Some(&json!({ "city": "Oslo" })));
        assert_eq!(dataset.get("order"), Some(&json!({ "total": "12=5" })));

        assert!(matches!(apply_override(&mut dataset, "novalue"), Err(StencilError::Override(..))));
        assert!(matches!(apply_override(&mut dataset, "items[0]=1"), Err(StencilError::Override(..))));
        assert!(matches!(apply_override(&mut dataset, "a b=1"), Err(StencilError::Path(_))));
    }
}
