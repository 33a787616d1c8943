//! Host-side device registry
//!
//! Devices are keyed by an opaque host id and carry `(domain, value)`
//! identifiers. Services resolve a host id back to a bus address through the
//! `samsungehs` identifier, whose value is `{entry_id}_{address}`.

use ehs_entities::{DeviceInfo, DOMAIN};
use nasa_client::DeviceAddress;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    pub id: String,
    pub identifiers: BTreeSet<(String, String)>,
    pub config_entries: BTreeSet<String>,
    pub manufacturer: Option<String>,
    pub name: Option<String>,
}

impl DeviceEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identifiers: BTreeSet::new(),
            config_entries: BTreeSet::new(),
            manufacturer: None,
            name: None,
        }
    }

    pub fn with_identifier(mut self, domain: impl Into<String>, value: impl Into<String>) -> Self {
        self.identifiers.insert((domain.into(), value.into()));
        self
    }

    pub fn with_config_entry(mut self, entry_id: impl Into<String>) -> Self {
        self.config_entries.insert(entry_id.into());
        self
    }

    /// Bus address from the first `samsungehs` identifier, if it has one
    pub fn bus_address(&self) -> Option<DeviceAddress> {
        self.identifiers
            .iter()
            .filter(|(domain, _)| domain == DOMAIN)
            .find_map(|(_, value)| value.split_once('_').map(|(_, address)| address))
            .filter(|address| !address.is_empty())
            .map(DeviceAddress::new)
    }
}

#[derive(Debug, Default)]
pub struct HostDeviceRegistry {
    devices: RwLock<HashMap<String, DeviceEntry>>,
    next_id: AtomicU64,
}

impl HostDeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for the device's identifier, created on first sight and linked
    /// to `entry_id`
    pub fn get_or_create(&self, entry_id: &str, info: &DeviceInfo) -> DeviceEntry {
        let mut devices = self.devices.write();

        let existing = devices
            .values()
            .find(|device| device.identifiers.contains(&info.identifier))
            .map(|device| device.id.clone());

        let id = existing.unwrap_or_else(|| {
            let id = format!("{:016x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
            devices.insert(id.clone(), DeviceEntry::new(id.clone()));
            id
        });

        let device = devices
            .entry(id.clone())
            .or_insert_with(|| DeviceEntry::new(id));
        device.identifiers.insert(info.identifier.clone());
        device.config_entries.insert(entry_id.to_string());
        device.manufacturer = Some(info.manufacturer.clone());
        device.name = Some(info.name.clone());
        device.clone()
    }

    /// Add or replace an entry under its own id
    pub fn insert(&self, device: DeviceEntry) {
        self.devices.write().insert(device.id.clone(), device);
    }

    pub fn get(&self, id: &str) -> Option<DeviceEntry> {
        self.devices.read().get(id).cloned()
    }

    pub fn find_by_identifier(&self, domain: &str, value: &str) -> Option<DeviceEntry> {
        self.devices
            .read()
            .values()
            .find(|device| {
                device
                    .identifiers
                    .iter()
                    .any(|(d, v)| d == domain && v == value)
            })
            .cloned()
    }

    /// Devices linked to a config entry, sorted by id
    pub fn devices_for_entry(&self, entry_id: &str) -> Vec<DeviceEntry> {
        let mut devices: Vec<DeviceEntry> = self
            .devices
            .read()
            .values()
            .filter(|device| device.config_entries.contains(entry_id))
            .cloned()
            .collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        devices
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}
