//! Sensor entities

use std::collections::BTreeMap;

use crate::context::{EntityContext, PollMode};
use crate::extractor::{EntityValue, ValueExtractor};
use crate::messages::{
    IN_DHW_CURRENT_TEMPERATURE, IN_DHW_TARGET_TEMPERATURE, IN_FLOW_TEMPERATURE,
    OUT_COMPRESSOR_TARGET_FREQUENCY, OUT_FAN_RPM, OUT_TOP_SENSOR_TEMPERATURE_1,
};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorDeviceClass {
    Temperature,
    Frequency,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Diagnostic,
}

/// Static description of one sensor
#[derive(Debug, Clone, Copy)]
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub value: ValueExtractor,
    pub poll_mode: PollMode,
    pub device_class: Option<SensorDeviceClass>,
    pub unit: Option<&'static str>,
}

const LAST_PACKET_RECEIVED: SensorDescription = SensorDescription {
    key: "last_packet_received",
    name: "Last Packet Received",
    value: ValueExtractor::LastPacketTime,
    poll_mode: PollMode::Passive,
    device_class: Some(SensorDeviceClass::Timestamp),
    unit: None,
};

pub const OUTDOOR_SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "outdoor_top_sensor_temperature_1",
        name: "Outdoor Top Sensor Temperature 1",
        value: ValueExtractor::Attribute(OUT_TOP_SENSOR_TEMPERATURE_1),
        poll_mode: PollMode::Continuous,
        device_class: Some(SensorDeviceClass::Temperature),
        unit: Some("°C"),
    },
    SensorDescription {
        key: "outdoor_compressor_target_frequency",
        name: "Outdoor Compressor Target Frequency",
        value: ValueExtractor::Attribute(OUT_COMPRESSOR_TARGET_FREQUENCY),
        poll_mode: PollMode::Continuous,
        device_class: Some(SensorDeviceClass::Frequency),
        unit: Some("Hz"),
    },
    SensorDescription {
        key: "outdoor_fan_rpm",
        name: "Outdoor Fan RPM",
        value: ValueExtractor::Attribute(OUT_FAN_RPM),
        poll_mode: PollMode::Continuous,
        device_class: None,
        unit: Some("rpm"),
    },
    LAST_PACKET_RECEIVED,
];

pub const INDOOR_SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "indoor_dhw_target_temperature",
        name: "DHW Target Temperature",
        value: ValueExtractor::Attribute(IN_DHW_TARGET_TEMPERATURE),
        poll_mode: PollMode::Continuous,
        device_class: Some(SensorDeviceClass::Temperature),
        unit: Some("°C"),
    },
    SensorDescription {
        key: "indoor_dhw_current_temperature",
        name: "DHW Current Temperature",
        value: ValueExtractor::Attribute(IN_DHW_CURRENT_TEMPERATURE),
        poll_mode: PollMode::Continuous,
        device_class: Some(SensorDeviceClass::Temperature),
        unit: Some("°C"),
    },
    SensorDescription {
        key: "indoor_flow_temperature",
        name: "Flow Temperature",
        value: ValueExtractor::Attribute(IN_FLOW_TEMPERATURE),
        poll_mode: PollMode::Continuous,
        device_class: Some(SensorDeviceClass::Temperature),
        unit: Some("°C"),
    },
    LAST_PACKET_RECEIVED,
];

#[derive(Debug)]
pub struct Sensor {
    context: EntityContext,
    description: &'static SensorDescription,
}

impl Sensor {
    pub fn new(context: EntityContext, description: &'static SensorDescription) -> Self {
        Self {
            context: context.with_message(description.value.message(), description.poll_mode),
            description,
        }
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }
}

impl EhsEntity for Sensor {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    /// Attribute sensors need a live transport and a value; the others only
    /// need the device.
    fn available(&self) -> bool {
        let Some(device) = self.context.device() else {
            return false;
        };
        match self.description.value.message() {
            Some(id) => self.context.coordinator().is_connected() && device.has_attribute(id),
            None => true,
        }
    }

    fn state(&self) -> Option<EntityValue> {
        self.context.device()?;
        self.description.value.extract(&self.context)
    }
}

/// Diagnostic count of everything a device has reported
#[derive(Debug)]
pub struct AvailableAttributesSensor {
    context: EntityContext,
}

impl AvailableAttributesSensor {
    pub const KEY: &'static str = "available_attributes";
    pub const NAME: &'static str = "Available Attributes";

    pub fn new(context: EntityContext) -> Self {
        Self { context }
    }

    pub fn category(&self) -> EntityCategory {
        EntityCategory::Diagnostic
    }
}

impl EhsEntity for AvailableAttributesSensor {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn available(&self) -> bool {
        self.context.device().is_some()
    }

    fn state(&self) -> Option<EntityValue> {
        ValueExtractor::AttributeCount.extract(&self.context)
    }

    /// The whole attribute map, keyed by message id
    fn attributes(&self) -> BTreeMap<String, EntityValue> {
        let Some(device) = self.context.device() else {
            return BTreeMap::new();
        };
        device
            .attributes()
            .iter()
            .map(|(id, value)| (id.to_string(), EntityValue::from(value)))
            .collect()
    }
}
