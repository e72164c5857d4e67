//! Property values shared by nodes, edges and statement parameters

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Borrow the value as a string slice, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, PropertyValue>> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Collect an array of strings, skipping non-string items
    pub fn to_string_vec(&self) -> Vec<String> {
        self.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        PropertyValue::Array(values.into_iter().map(PropertyValue::String).collect())
    }
}

impl From<HashMap<String, PropertyValue>> for PropertyValue {
    fn from(values: HashMap<String, PropertyValue>) -> Self {
        PropertyValue::Object(values)
    }
}

/// Properties collection
pub type Properties = HashMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_views() {
        assert_eq!(PropertyValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PropertyValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(PropertyValue::Float(0.5).as_i64(), None);
        assert_eq!(PropertyValue::from("x").as_f64(), None);
    }

    #[test]
    fn test_string_vec_skips_non_strings() {
        let value = PropertyValue::Array(vec![
            PropertyValue::from("a"),
            PropertyValue::Int(1),
            PropertyValue::from("b"),
        ]);
        assert_eq!(value.to_string_vec(), vec!["a".to_string(), "b".to_string()]);
        assert!(PropertyValue::from("a").to_string_vec().is_empty());
    }

    #[test]
    fn test_untagged_serialization() {
        let value = PropertyValue::from(vec!["t1".to_string()]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["t1"]"#);
        let parsed: PropertyValue = serde_json::from_str("0.25").unwrap();
        assert_eq!(parsed, PropertyValue::Float(0.25));
    }
}
