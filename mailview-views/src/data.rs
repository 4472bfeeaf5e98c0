//! View data passed from the caller to a template

use crate::{Result, ViewError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Key-value bag handed to a view when it renders.
///
/// Values are stored as JSON so any `Serialize` type can be placed in the
/// bag and read by the template engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewData {
    values: Map<String, Value>,
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(ViewError::ConfigError(format!(
                "view data must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build from any serializable struct or map.
    pub fn from_serialize<T: Serialize>(data: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(data)?)
    }

    /// Insert a value, replacing any previous entry for the key.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Result<Self> {
        self.set(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Copy of the entries as a JSON map.
    pub fn to_map(&self) -> Map<String, Value> {
        self.values.clone()
    }
}

impl From<Map<String, Value>> for ViewData {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
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

    #[derive(Serialize)]
    struct Welcome {
        name: String,
        trial_days: u32,
    }

    #[test]
    fn test_set_and_get() {
        let mut data = ViewData::new();
        data.set("name", "Ada").unwrap();
        data.set("items", vec![1, 2, 3]).unwrap();

        assert_eq!(data.get("name"), Some(&json!("Ada")));
        assert_eq!(data.get("items"), Some(&json!([1, 2, 3])));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_from_serialize_struct() {
        let data = ViewData::from_serialize(&Welcome {
            name: "Ada".to_string(),
            trial_days: 14,
        })
        .unwrap();

        assert_eq!(data.get("trial_days"), Some(&json!(14)));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(ViewData::from_value(json!([1, 2])).is_err());
        assert!(ViewData::from_value(json!("text")).is_err());
        assert!(ViewData::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let data = ViewData::new().with("a", 1).unwrap();
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"a": 1}));
    }
}
