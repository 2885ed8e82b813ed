use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single form field value. Steps write these into the shared store;
/// `Object` keys keep insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Object(v) => v.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn emptiness_by_variant() {
        assert!(Value::None.is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(Value::List(Vec::new()).is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::text("x").is_empty());
    }

    #[test]
    fn json_round_trip_keeps_object_order() {
        let parsed: Value =
            serde_json::from_str(r#"{"name":"x","age":30,"tags":["a","b"]}"#).expect("parse");
        let Value::Object(map) = &parsed else {
            panic!("expected object");
        };
        let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, vec!["name", "age", "tags"]);
        assert_eq!(parsed.to_json(), r#"{"name":"x","age":30.0,"tags":["a","b"]}"#);
    }

    #[test]
    fn null_parses_as_none() {
        let parsed: Value = serde_json::from_str("null").expect("parse");
        assert_eq!(parsed, Value::None);
    }

    #[test]
    fn scalar_accessors() {
        assert_eq!(Value::text("hi").as_text(), Some("hi"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Value::text("hi").as_bool(), None);
    }
}
