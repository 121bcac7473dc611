// ABOUTME: Value model and mutable rendering context for templates
// ABOUTME: Provides the closed Value variant, truthiness, textual form, and JSON/YAML conversions

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::ast::Reference;
use super::resolve;

/// String-keyed map of values. Equality ignores key order.
pub type Mapping = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Scalar(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Falsy values are `Null`, `false`, and the empty sequence. Everything else,
    /// the empty string included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Boolean(false) => false,
            Value::Sequence(items) => !items.is_empty(),
            Value::Boolean(true) | Value::Scalar(_) | Value::Mapping(_) => true,
        }
    }

    /// Text produced when the value is interpolated as a variable.
    ///
    /// Falsy values produce nothing. Sequences concatenate the text of their
    /// elements; mappings have no scalar form and render as `true`.
    pub fn to_text(&self) -> String {
        if !self.is_truthy() {
            return String::new();
        }
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Scalar(s) => s.clone(),
            Value::Sequence(items) => items.iter().map(Value::to_text).collect(),
            Value::Mapping(_) => "true".to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Scalar(n.to_string()),
            serde_json::Value::String(s) => Value::Scalar(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Boolean(b),
            serde_yaml::Value::Number(n) => Value::Scalar(n.to_string()),
            serde_yaml::Value::String(s) => Value::Scalar(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .filter_map(|(key, value)| yaml_key(key).map(|key| (key, Value::from(value))))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// Scalar YAML keys become strings; compound keys have no dot-path and are dropped.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        _ => None,
    }
}

/// The root mapping a template is rendered against.
///
/// Loops temporarily rebind their reference while the body renders and restore
/// the original value afterwards, so a context must not be shared between
/// concurrent renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: Mapping,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(values: Mapping) -> Self {
        Self { values }
    }

    /// Add or replace a top-level entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a top-level entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a dot-path. Missing paths resolve to `Value::Null`.
    pub fn resolve(&self, reference: &Reference) -> &Value {
        resolve::resolve(reference, &self.values)
    }

    /// Overwrite the slot a dot-path points at, if its parent exists
    pub fn bind(&mut self, reference: &Reference, value: Value) {
        resolve::bind(reference, value, &mut self.values);
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Mapping> for Context {
    fn from(values: Mapping) -> Self {
        Self { values }
    }
}

/// Objects become the root mapping; any other JSON value yields an empty context.
impl From<serde_json::Value> for Context {
    fn from(value: serde_json::Value) -> Self {
        match Value::from(value) {
            Value::Mapping(values) => Self { values },
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Sequence(vec![]).is_truthy());

        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::from("").is_truthy());
        assert!(Value::from("text").is_truthy());
        assert!(Value::Mapping(Mapping::new()).is_truthy());
        assert!(Value::from(vec!["a"]).is_truthy());
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Boolean(true).to_text(), "true");
        assert_eq!(Value::Boolean(false).to_text(), "");
        assert_eq!(Value::from(42i64).to_text(), "42");
        assert_eq!(Value::from(vec!["a", "b", "c"]).to_text(), "abc");
        assert_eq!(Value::from(json!({"k": "v"})).to_text(), "true");
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::from(json!({
            "title": "Notes",
            "draft": false,
            "count": 3,
            "tags": ["rust", "docs"],
            "author": {"name": "Jo"}
        }));

        let map = value.as_mapping().unwrap();
        assert_eq!(map["title"], Value::from("Notes"));
        assert_eq!(map["draft"], Value::Boolean(false));
        assert_eq!(map["count"], Value::from("3"));
        assert_eq!(map["tags"].as_sequence().unwrap().len(), 2);
        assert_eq!(
            map["author"].as_mapping().unwrap()["name"],
            Value::from("Jo")
        );
    }

    #[test]
    fn test_yaml_conversion() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("title: Notes\nyear: 2024\n1: one\nempty:\n").unwrap();
        let value = Value::from(yaml);
        let map = value.as_mapping().unwrap();

        assert_eq!(map["title"], Value::from("Notes"));
        assert_eq!(map["year"], Value::from("2024"));
        assert_eq!(map["1"], Value::from("one"));
        assert!(map["empty"].is_null());
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a: Context = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Context = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_from_non_object_json_is_empty() {
        assert!(Context::from(json!(["a"])).is_empty());
        assert_eq!(Context::from(json!({"a": 1})).len(), 1);
    }

    #[test]
    fn test_value_deserializes_numbers_as_scalars() {
        let value: Value = serde_json::from_str(r#"{"n": 1.5, "ok": true}"#).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["n"], Value::from("1.5"));
        assert_eq!(map["ok"], Value::Boolean(true));
    }
}
