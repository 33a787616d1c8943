//! Value extraction for description-driven entities
//!
//! Entity descriptions name the value they show with a [`ValueExtractor`]
//! instead of carrying a closure, so catalogs stay `const` and comparable.

use chrono::{DateTime, Utc};
use nasa_client::{AttributeValue, MessageId};
use serde::Serialize;

use crate::context::EntityContext;

/// Rendered entity state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityValue {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl EntityValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EntityValue::Number(n) => Some(*n),
            EntityValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EntityValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&AttributeValue> for EntityValue {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Bool(b) => EntityValue::Bool(*b),
            AttributeValue::Integer(i) => EntityValue::Integer(*i),
            AttributeValue::Float(f) => EntityValue::Number(*f),
            AttributeValue::Text(s) => EntityValue::Text(s.clone()),
            other => EntityValue::Text(
                serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
            ),
        }
    }
}

impl From<bool> for EntityValue {
    fn from(value: bool) -> Self {
        EntityValue::Bool(value)
    }
}

impl From<f64> for EntityValue {
    fn from(value: f64) -> Self {
        EntityValue::Number(value)
    }
}

impl From<&str> for EntityValue {
    fn from(value: &str) -> Self {
        EntityValue::Text(value.to_string())
    }
}

/// Where an entity's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueExtractor {
    /// The decoded value of one message
    Attribute(MessageId),
    /// One field of a structured message
    AttributeField {
        id: MessageId,
        field: &'static str,
    },
    /// When the device last sent anything
    LastPacketTime,
    /// How many distinct messages the device has sent
    AttributeCount,
    /// Whether the transport is connected
    TransportConnected,
    /// Whether the device is in the registry
    DevicePresent,
}

impl ValueExtractor {
    /// The message this extractor reads, if any
    pub fn message(&self) -> Option<MessageId> {
        match self {
            ValueExtractor::Attribute(id) | ValueExtractor::AttributeField { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn extract(&self, context: &EntityContext) -> Option<EntityValue> {
        match self {
            ValueExtractor::Attribute(id) => {
                context.attribute(*id).as_ref().map(EntityValue::from)
            }
            ValueExtractor::AttributeField { id, field } => context
                .attribute(*id)?
                .field(field)
                .map(EntityValue::from),
            ValueExtractor::LastPacketTime => {
                context.device()?.last_packet_time().map(EntityValue::Timestamp)
            }
            ValueExtractor::AttributeCount => {
                let count = context.device().map_or(0, |device| device.attribute_count());
                Some(EntityValue::Integer(count as i64))
            }
            ValueExtractor::TransportConnected => {
                Some(EntityValue::Bool(context.coordinator().is_connected()))
            }
            ValueExtractor::DevicePresent => Some(EntityValue::Bool(context.device().is_some())),
        }
    }
}
