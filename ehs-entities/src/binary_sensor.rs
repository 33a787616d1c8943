//! Connectivity binary sensors

use ehs_coordinator::PollingCoordinator;
use std::sync::Arc;

use crate::context::EntityContext;
use crate::extractor::{EntityValue, ValueExtractor};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy)]
pub struct BinarySensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub value: ValueExtractor,
}

/// One per entry
pub const INTEGRATION_BINARY_SENSORS: &[BinarySensorDescription] = &[BinarySensorDescription {
    key: "connected",
    name: "Connected",
    value: ValueExtractor::TransportConnected,
}];

/// One per configured device
pub const DEVICE_BINARY_SENSORS: &[BinarySensorDescription] = &[BinarySensorDescription {
    key: "online",
    name: "Online",
    value: ValueExtractor::DevicePresent,
}];

#[derive(Debug)]
pub struct BinarySensor {
    context: EntityContext,
    description: &'static BinarySensorDescription,
}

impl BinarySensor {
    pub fn new(context: EntityContext, description: &'static BinarySensorDescription) -> Self {
        Self {
            context,
            description,
        }
    }

    pub fn integration(
        coordinator: Arc<PollingCoordinator>,
        entry_id: &str,
        description: &'static BinarySensorDescription,
    ) -> Self {
        Self::new(
            EntityContext::integration(coordinator, entry_id, description.key),
            description,
        )
    }

    pub fn is_on(&self) -> bool {
        self.description
            .value
            .extract(&self.context)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

impl EhsEntity for BinarySensor {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn available(&self) -> bool {
        self.context.coordinator_available()
    }

    fn state(&self) -> Option<EntityValue> {
        Some(EntityValue::Bool(self.is_on()))
    }
}
