//! Device registry and per-device attribute maps
//!
//! The transport feeds every decoded packet into the registry. Entities read
//! from it when rendering state and subscribe to change callbacks; they never
//! ask the transport for values directly.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::address::DeviceAddress;
use crate::message::{AttributeValue, MessageId};

/// Handle returned when registering a device callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Called with the device address and the message that changed
pub type DeviceCallback = Arc<dyn Fn(&DeviceAddress, MessageId) + Send + Sync>;

/// Called once per newly seen device
pub type DiscoveryCallback = Arc<dyn Fn(&Arc<NasaDevice>) + Send + Sync>;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

fn next_callback_id() -> CallbackId {
    CallbackId(NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed))
}

/// One unit on the bus and everything decoded from it so far
pub struct NasaDevice {
    address: DeviceAddress,
    attributes: RwLock<HashMap<MessageId, AttributeValue>>,
    last_packet_time: RwLock<Option<DateTime<Utc>>>,
    callbacks: Mutex<Vec<(CallbackId, DeviceCallback)>>,
}

impl NasaDevice {
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            attributes: RwLock::new(HashMap::new()),
            last_packet_time: RwLock::new(None),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Current decoded value of a message, if one has been seen
    pub fn attribute(&self, id: MessageId) -> Option<AttributeValue> {
        self.attributes.read().get(&id).cloned()
    }

    pub fn has_attribute(&self, id: MessageId) -> bool {
        self.attributes.read().contains_key(&id)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.read().len()
    }

    /// Copy of the whole attribute map
    pub fn attributes(&self) -> HashMap<MessageId, AttributeValue> {
        self.attributes.read().clone()
    }

    pub fn last_packet_time(&self) -> Option<DateTime<Utc>> {
        *self.last_packet_time.read()
    }

    /// Store a decoded value and notify subscribers
    pub fn record_attribute(&self, id: MessageId, value: AttributeValue) {
        self.attributes.write().insert(id, value);
        *self.last_packet_time.write() = Some(Utc::now());

        let callbacks: Vec<DeviceCallback> = self
            .callbacks
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(&self.address, id);
        }
    }

    pub fn add_device_callback(&self, callback: DeviceCallback) -> CallbackId {
        let id = next_callback_id();
        self.callbacks.lock().push((id, callback));
        id
    }

    /// Returns whether a callback was removed
    pub fn remove_device_callback(&self, id: CallbackId) -> bool {
        let mut callbacks = self.callbacks.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().len()
    }
}

impl std::fmt::Debug for NasaDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NasaDevice")
            .field("address", &self.address)
            .field("attributes", &self.attribute_count())
            .field("last_packet_time", &self.last_packet_time())
            .finish()
    }
}

/// All devices seen on the bus, keyed by address
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceAddress, Arc<NasaDevice>>>,
    discovery_callbacks: Mutex<Vec<(CallbackId, DiscoveryCallback)>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &DeviceAddress) -> Option<Arc<NasaDevice>> {
        self.devices.read().get(address).cloned()
    }

    pub fn contains(&self, address: &DeviceAddress) -> bool {
        self.devices.read().contains_key(address)
    }

    /// Known addresses in sorted order
    pub fn addresses(&self) -> Vec<DeviceAddress> {
        let mut addresses: Vec<DeviceAddress> = self.devices.read().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Get a device, creating it (and firing discovery callbacks) on first sight
    pub fn ensure_device(&self, address: &DeviceAddress) -> Arc<NasaDevice> {
        if let Some(device) = self.get(address) {
            return device;
        }

        let (device, created) = {
            let mut devices = self.devices.write();
            match devices.get(address) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let device = Arc::new(NasaDevice::new(address.clone()));
                    devices.insert(address.clone(), Arc::clone(&device));
                    (device, true)
                }
            }
        };

        if created {
            tracing::debug!("Discovered device {}", address);
            let callbacks: Vec<DiscoveryCallback> = self
                .discovery_callbacks
                .lock()
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();
            for callback in callbacks {
                callback(&device);
            }
        }

        device
    }

    /// Record a decoded value for a device, discovering it if needed
    pub fn record_attribute(&self, address: &DeviceAddress, id: MessageId, value: AttributeValue) {
        self.ensure_device(address).record_attribute(id, value);
    }

    pub fn on_device_discovered(&self, callback: DiscoveryCallback) -> CallbackId {
        let id = next_callback_id();
        self.discovery_callbacks.lock().push((id, callback));
        id
    }

    /// Returns whether a callback was removed
    pub fn remove_discovery_callback(&self, id: CallbackId) -> bool {
        let mut callbacks = self.discovery_callbacks.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.addresses())
            .finish()
    }
}
