//! Message identifiers, request kinds and decoded attribute values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric code of one protocol data point on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u16);

impl MessageId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for MessageId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Kind of request carried by a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Undefined,
    Read,
    Write,
    Request,
    Notification,
    Response,
    Ack,
    Nack,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Undefined => "undefined",
            DataType::Read => "read",
            DataType::Write => "write",
            DataType::Request => "request",
            DataType::Notification => "notification",
            DataType::Response => "response",
            DataType::Ack => "ack",
            DataType::Nack => "nack",
        };
        f.write_str(name)
    }
}

/// Decoded value of an attribute, as held in a device's attribute map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Structure(BTreeMap<String, AttributeValue>),
    Raw(Vec<u8>),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Field of a structured value
    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        match self {
            AttributeValue::Structure(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Truthiness used by availability checks: zero, false, empty and
    /// structures are all falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Bool(b) => *b,
            AttributeValue::Integer(i) => *i != 0,
            AttributeValue::Float(f) => *f != 0.0,
            AttributeValue::Text(s) => !s.is_empty(),
            AttributeValue::Raw(bytes) => bytes.iter().any(|b| *b != 0),
            AttributeValue::Structure(_) => false,
        }
    }

    /// Build a single-field structure
    pub fn structure(field: impl Into<String>, value: AttributeValue) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), value);
        AttributeValue::Structure(fields)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId::new(0x4235).to_string(), "0x4235");
        assert_eq!(MessageId::new(0x1).to_string(), "0x0001");
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(AttributeValue::Integer(1).as_bool(), Some(true));
        assert_eq!(AttributeValue::Bool(true).as_i64(), Some(1));
        assert_eq!(AttributeValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(AttributeValue::Text("x".into()).as_f64(), None);
    }

    #[test]
    fn test_structure_field() {
        let value = AttributeValue::structure("frequency_ratio_percent", AttributeValue::Integer(80));
        assert_eq!(
            value.field("frequency_ratio_percent").and_then(AttributeValue::as_i64),
            Some(80)
        );
        assert!(value.field("missing").is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(AttributeValue::Integer(2).is_truthy());
        assert!(!AttributeValue::Integer(0).is_truthy());
        assert!(!AttributeValue::Text(String::new()).is_truthy());
        assert!(AttributeValue::Raw(vec![0, 1]).is_truthy());
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_value(AttributeValue::Float(21.5)).unwrap();
        assert_eq!(json, serde_json::json!(21.5));
        let json = serde_json::to_value(AttributeValue::structure("a", true.into())).unwrap();
        assert_eq!(json, serde_json::json!({"a": true}));
    }
}
