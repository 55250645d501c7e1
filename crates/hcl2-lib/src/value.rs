//! The tagged value tree shared by the transformers and the builder.
//!
//! Mappings are insertion-ordered: attribute and block order is meaningful
//! for reconstruction, so a plain hash map would not do.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key carrying a block body's first source line. `-1` means unknown.
pub const START_LINE_KEY: &str = "__start_line__";
/// Key carrying a block body's last source line. `-1` means unknown.
pub const END_LINE_KEY: &str = "__end_line__";

/// Insertion-ordered string-keyed mapping.
pub type Map = IndexMap<String, Value>;

/// A value produced by the forward transformer or consumed by the reverse
/// transformer. Complex HCL expressions appear as `"${…}"` strings.
///
/// Serializes as plain JSON. `Int` comes before `Float` so untagged
/// deserialization keeps integers integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to a `serde_json::Value`, mostly for tests and the CLI.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("value tree is always representable as JSON")
    }

    /// Converts from JSON. Numbers that fit in `i64` stay integral; anything
    /// else becomes a float.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip_keeps_order_and_types() {
        let mut map = Map::new();
        map.insert("b".to_string(), Value::Int(1));
        map.insert("a".to_string(), Value::Float(1.5));
        map.insert("s".to_string(), Value::from("x"));
        let value = Value::Object(map);

        let json = value.to_json();
        assert_eq!(json, json!({"b": 1, "a": 1.5, "s": "x"}));
        assert_eq!(Value::from_json(&json), value);
    }

    #[test]
    fn untagged_deserialization_keeps_integers() {
        let value: Value = serde_json::from_str("[1, 1.5, null, true]").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Int(1),
                Value::Float(1.5),
                Value::Null,
                Value::Bool(true),
            ])
        );
    }
}
