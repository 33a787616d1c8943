//! Entity platforms and per-entry entity sets
//!
//! [`setup_entities`] builds everything an entry exposes: integration-level
//! entities first, then the catalog picked by each device's address class.

use ehs_coordinator::PollingCoordinator;
use nasa_client::DeviceAddress;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::binary_sensor::{BinarySensor, DEVICE_BINARY_SENSORS, INTEGRATION_BINARY_SENSORS};
use crate::climate::Climate;
use crate::context::{EntityContext, StateListener};
use crate::extractor::EntityValue;
use crate::number::{Number, INDOOR_NUMBERS};
use crate::select::{Select, INDOOR_SELECTS};
use crate::sensor::{AvailableAttributesSensor, Sensor, INDOOR_SENSORS, OUTDOOR_SENSORS};
use crate::switch::{Switch, INDOOR_SWITCHES};
use crate::water_heater::WaterHeater;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    BinarySensor,
    Climate,
    Number,
    Select,
    Sensor,
    Switch,
    WaterHeater,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::BinarySensor,
        Platform::Climate,
        Platform::Number,
        Platform::Select,
        Platform::Sensor,
        Platform::Switch,
        Platform::WaterHeater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::BinarySensor => "binary_sensor",
            Platform::Climate => "climate",
            Platform::Number => "number",
            Platform::Select => "select",
            Platform::Sensor => "sensor",
            Platform::Switch => "switch",
            Platform::WaterHeater => "water_heater",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-side behaviour shared by every entity
pub trait EhsEntity: Send + Sync {
    fn context(&self) -> &EntityContext;

    fn platform(&self) -> Platform;

    fn available(&self) -> bool;

    /// Main state, `None` when unknown
    fn state(&self) -> Option<EntityValue>;

    /// Extra state attributes
    fn attributes(&self) -> BTreeMap<String, EntityValue> {
        BTreeMap::new()
    }

    fn unique_id(&self) -> &str {
        self.context().unique_id()
    }
}

/// Every entity of one config entry, grouped by platform
#[derive(Debug, Default)]
pub struct EntitySet {
    pub sensors: Vec<Sensor>,
    pub available_attributes: Vec<AvailableAttributesSensor>,
    pub binary_sensors: Vec<BinarySensor>,
    pub switches: Vec<Switch>,
    pub numbers: Vec<Number>,
    pub selects: Vec<Select>,
    pub climates: Vec<Climate>,
    pub water_heaters: Vec<WaterHeater>,
}

impl EntitySet {
    pub fn iter(&self) -> impl Iterator<Item = &dyn EhsEntity> + '_ {
        let sensors = self.sensors.iter().map(|e| e as &dyn EhsEntity);
        let available = self.available_attributes.iter().map(|e| e as &dyn EhsEntity);
        let binary = self.binary_sensors.iter().map(|e| e as &dyn EhsEntity);
        let switches = self.switches.iter().map(|e| e as &dyn EhsEntity);
        let numbers = self.numbers.iter().map(|e| e as &dyn EhsEntity);
        let selects = self.selects.iter().map(|e| e as &dyn EhsEntity);
        let climates = self.climates.iter().map(|e| e as &dyn EhsEntity);
        let heaters = self.water_heaters.iter().map(|e| e as &dyn EhsEntity);

        sensors
            .chain(available)
            .chain(binary)
            .chain(switches)
            .chain(numbers)
            .chain(selects)
            .chain(climates)
            .chain(heaters)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, unique_id: &str) -> Option<&dyn EhsEntity> {
        self.iter().find(|entity| entity.unique_id() == unique_id)
    }

    /// Entities bound to one device
    pub fn for_device<'a>(
        &'a self,
        address: &'a DeviceAddress,
    ) -> impl Iterator<Item = &'a dyn EhsEntity> + 'a {
        self.iter()
            .filter(move |entity| entity.context().address() == Some(address))
    }

    pub fn count_by_platform(&self) -> BTreeMap<Platform, usize> {
        let mut counts = BTreeMap::new();
        for entity in self.iter() {
            *counts.entry(entity.platform()).or_insert(0) += 1;
        }
        counts
    }

    pub fn attach_all(&self, listener: StateListener) {
        for entity in self.iter() {
            entity.context().attach(Arc::clone(&listener));
        }
    }

    pub fn detach_all(&self) {
        for entity in self.iter() {
            entity.context().detach();
        }
    }
}

/// Build the entities for one config entry
///
/// Nothing is attached yet; call [`EntitySet::attach_all`] once the set is
/// in place.
pub fn setup_entities(
    coordinator: &Arc<PollingCoordinator>,
    entry_id: &str,
    devices: &[DeviceAddress],
) -> EntitySet {
    let mut set = EntitySet::default();

    for description in INTEGRATION_BINARY_SENSORS {
        set.binary_sensors.push(BinarySensor::integration(
            Arc::clone(coordinator),
            entry_id,
            description,
        ));
    }

    for address in devices {
        let device_context = |key: &'static str| {
            EntityContext::for_device(Arc::clone(coordinator), entry_id, address.clone(), key)
        };

        set.available_attributes
            .push(AvailableAttributesSensor::new(device_context(
                AvailableAttributesSensor::KEY,
            )));
        for description in DEVICE_BINARY_SENSORS {
            set.binary_sensors
                .push(BinarySensor::new(device_context(description.key), description));
        }

        if address.is_outdoor() {
            for description in OUTDOOR_SENSORS {
                set.sensors.push(Sensor::new(device_context(description.key), description));
            }
        } else if address.is_indoor() {
            for description in INDOOR_SENSORS {
                set.sensors.push(Sensor::new(device_context(description.key), description));
            }
            for description in INDOOR_SWITCHES {
                set.switches.push(Switch::new(device_context(description.key), description));
            }
            for description in INDOOR_NUMBERS {
                set.numbers.push(Number::new(device_context(description.key), description));
            }
            for description in INDOOR_SELECTS {
                set.selects.push(Select::new(device_context(description.key), description));
            }
            set.climates.push(Climate::new(device_context(Climate::KEY)));
            set.water_heaters
                .push(WaterHeater::new(device_context(WaterHeater::KEY)));
        } else {
            tracing::debug!("No catalog for device {}, only generic entities", address);
        }
    }

    tracing::debug!("Built {} entities for entry {}", set.len(), entry_id);
    set
}
