//! Records observed by a list view.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identity of a record.
///
/// IDs are compared as strings, so the numeric ID `7` and the string ID
/// `"7"` address the same record and the same rendered item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads an ID from a JSON number or string. Anything else has no ID.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A data entity owned by a collection.
///
/// List views only read records; they never mutate them.
pub trait Record: Clone + Send + Sync + 'static {
    /// Identity used to locate the record's rendered item.
    fn id(&self) -> Option<RecordId>;

    /// Raw attributes, handed to the item template when no `item_data`
    /// projection is configured.
    fn attributes(&self) -> Value;
}

/// Human-readable label for a record in logs and errors.
pub(crate) fn describe<R: Record>(record: &R) -> String {
    record
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "<unidentified>".to_string())
}

/// A record made of JSON attributes.
///
/// The identity is read from the `id` attribute.
///
/// # Example
///
/// ```
/// use listview::{Model, Record};
///
/// let apple = Model::with_id(1).set("name", "apple");
/// assert_eq!(apple.id().unwrap().as_str(), "1");
/// assert_eq!(apple.get("name").unwrap(), "apple");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    attributes: Map<String, Value>,
}

impl Model {
    /// Creates a model without attributes (and therefore without an ID).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model whose `id` attribute is `id`.
    pub fn with_id(id: impl Into<Value>) -> Self {
        Self::new().set("id", id)
    }

    /// Creates a model from a JSON object. Returns `None` for other values.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self { attributes }),
            _ => None,
        }
    }

    /// Sets an attribute (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// Returns the attribute, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }
}

impl From<Map<String, Value>> for Model {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

impl Record for Model {
    fn id(&self) -> Option<RecordId> {
        self.attributes.get("id").and_then(RecordId::from_value)
    }

    fn attributes(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        assert_eq!(Model::with_id(7).id(), Model::with_id("7").id());
        assert_eq!(Model::with_id(7).id(), Some(RecordId::from(7i64)));
    }

    #[test]
    fn models_without_usable_id() {
        assert_eq!(Model::new().id(), None);
        assert_eq!(Model::with_id("").id(), None);
        assert_eq!(Model::with_id(json!([1])).id(), None);
        assert_eq!(Model::with_id(Value::Null).id(), None);
    }

    #[test]
    fn from_json_requires_object() {
        let model = Model::from_json(json!({"id": 3, "name": "pineapple"})).unwrap();
        assert_eq!(model.attributes(), json!({"id": 3, "name": "pineapple"}));
        assert!(Model::from_json(json!("pineapple")).is_none());
    }

    #[test]
    fn deserializes_from_attribute_object() {
        let model: Model = serde_json::from_str(r#"{"id": 2, "name": "banana"}"#).unwrap();
        assert_eq!(model.id().unwrap().as_str(), "2");
        assert_eq!(model.get("name"), Some(&json!("banana")));
    }
}
