//! Property values
//!
//! Geoff property values are a JSON subset: scalars, `null`, and flat
//! arrays whose elements all share one scalar kind.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Array),
}

/// Homogeneous array value
///
/// The element type is fixed for the whole array. Numeric arrays are
/// `Integer` only when every element was written without a fraction or
/// exponent, otherwise every element is widened to `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Empty,
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
}

/// Scalar kind selected by the first element of an array literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::String => f.write_str("string"),
            ScalarKind::Number => f.write_str("number"),
            ScalarKind::Boolean => f.write_str("boolean"),
        }
    }
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value widened to f64 (integers included)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl Array {
    pub fn len(&self) -> usize {
        match self {
            Array::Empty => 0,
            Array::Boolean(v) => v.len(),
            Array::Integer(v) => v.len(),
            Array::Float(v) => v.len(),
            Array::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Array::Empty => serializer.collect_seq(std::iter::empty::<bool>()),
            Array::Boolean(v) => v.serialize(serializer),
            Array::Integer(v) => v.serialize(serializer),
            Array::Float(v) => v.serialize(serializer),
            Array::String(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => float_to_json(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => serde_json::Value::from(a),
        }
    }
}

impl From<&Array> for serde_json::Value {
    fn from(array: &Array) -> Self {
        let items = match array {
            Array::Empty => Vec::new(),
            Array::Boolean(v) => v.iter().map(|b| serde_json::Value::Bool(*b)).collect(),
            Array::Integer(v) => v.iter().map(|i| serde_json::Value::from(*i)).collect(),
            Array::Float(v) => v.iter().map(|f| float_to_json(*f)).collect(),
            Array::String(v) => v.iter().map(|s| serde_json::Value::String(s.clone())).collect(),
        };
        serde_json::Value::Array(items)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serializes_as_json() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Array(Array::Empty).to_string(), "[]");
        assert_eq!(Value::Array(Array::Integer(vec![1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_conversion_to_serde_json() {
        let value = Value::Array(Array::String(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(serde_json::Value::from(&value), serde_json::json!(["x", "y"]));
        assert_eq!(serde_json::Value::from(Value::Float(1.5)), serde_json::json!(1.5));
        assert_eq!(serde_json::Value::from(Value::Null), serde_json::Value::Null);
    }

    #[test]
    fn test_array_len() {
        assert!(Array::Empty.is_empty());
        assert_eq!(Array::Float(vec![1.0, 2.0]).len(), 2);
        assert!(!Array::String(vec!["x".to_string()]).is_empty());
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
    }
}
