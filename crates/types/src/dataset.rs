//! The normalized key/value record a template is evaluated against.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered mapping from string keys to scalars, arrays or nested mappings.
///
/// A dataset is assembled by the caller (form adapters, site metadata) and is
/// never mutated by the engine during an evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Map<String, Value>);

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from any JSON value. Only objects carry fields; any other
    /// value yields an empty dataset.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Mutable access for callers preparing a dataset before evaluation.
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Adds the `date` (`YYYY-MM-DD`) and `time` (`HH:MM`) system fields for `now`,
    /// keeping any value the caller already supplied under those keys.
    pub fn with_system_fields(mut self, now: NaiveDateTime) -> Self {
        if !self.contains_key("date") {
            self.insert("date", now.format("%Y-%m-%d").to_string());
        }
        if !self.contains_key("time") {
            self.insert("time", now.format("%H:%M").to_string());
        }
        self
    }
}

impl From<Map<String, Value>> for Dataset {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Dataset {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl FromIterator<(String, Value)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn non_object_values_yield_empty_dataset() {
        assert!(Dataset::from_value(json!([1, 2, 3])).is_empty());
        assert!(Dataset::from_value(json!("x")).is_empty());
    }

    #[test]
    fn keeps_insertion_order() {
        let dataset = Dataset::from_value(json!({ "zeta": 1, "alpha": 2, "mid": 3 }));
        let keys: Vec<&str> = dataset.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn system_fields_do_not_override_caller_values() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let dataset = Dataset::from_value(json!({ "time": "custom" })).with_system_fields(now);
        assert_eq!(dataset.get("date"), Some(&json!("2024-03-09")));
        assert_eq!(dataset.get("time"), Some(&json!("custom")));
    }
}
