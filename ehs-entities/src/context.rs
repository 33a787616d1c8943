//! Shared entity plumbing
//!
//! Every entity owns an [`EntityContext`]: the coordinator handle, the device
//! it belongs to (none for integration-level entities), its unique id and the
//! message it declares for polling. Attaching registers that message with the
//! coordinator and subscribes to the device's change callbacks.

use ehs_coordinator::PollingCoordinator;
use nasa_client::{AttributeValue, CallbackId, DataType, DeviceAddress, MessageId, NasaDevice};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{EntityError, Result};

/// Identifier domain for device registry entries
pub const DOMAIN: &str = "samsungehs";

pub const MANUFACTURER: &str = "Samsung";

/// Called with the entity's unique id whenever its device reports a change
pub type StateListener = Arc<dyn Fn(&str) + Send + Sync>;

/// How an entity's message reaches the device attribute map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Broadcast by the device; nothing to register
    Passive,
    /// Re-read by the coordinator every cycle
    Continuous,
    /// Read once on the first connected cycle
    Bootstrap,
}

/// Device registry information for a device-bound entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, "{entry_id}_{address}")`
    pub identifier: (String, String),
    pub manufacturer: String,
    pub name: String,
}

impl DeviceInfo {
    pub fn new(entry_id: &str, address: &DeviceAddress) -> Self {
        Self {
            identifier: (DOMAIN.to_string(), device_identifier(entry_id, address)),
            manufacturer: MANUFACTURER.to_string(),
            name: address.to_string(),
        }
    }
}

/// `{entry_id}_{address}`, the second half of a device identifier
pub fn device_identifier(entry_id: &str, address: &DeviceAddress) -> String {
    format!("{}_{}", entry_id, address)
}

pub struct EntityContext {
    coordinator: Arc<PollingCoordinator>,
    address: Option<DeviceAddress>,
    key: &'static str,
    unique_id: String,
    device_info: Option<DeviceInfo>,
    message: Option<MessageId>,
    poll_mode: PollMode,
    callback: Mutex<Option<(Arc<NasaDevice>, CallbackId)>>,
}

impl EntityContext {
    /// Context for an entity describing the whole integration
    pub fn integration(
        coordinator: Arc<PollingCoordinator>,
        entry_id: &str,
        key: &'static str,
    ) -> Self {
        Self {
            coordinator,
            address: None,
            key,
            unique_id: format!("{}_{}", entry_id, key),
            device_info: None,
            message: None,
            poll_mode: PollMode::Passive,
            callback: Mutex::new(None),
        }
    }

    /// Context for an entity bound to one device
    pub fn for_device(
        coordinator: Arc<PollingCoordinator>,
        entry_id: &str,
        address: DeviceAddress,
        key: &'static str,
    ) -> Self {
        Self {
            coordinator,
            unique_id: format!("{}_{}_{}", entry_id, address, key),
            device_info: Some(DeviceInfo::new(entry_id, &address)),
            address: Some(address),
            key,
            message: None,
            poll_mode: PollMode::Passive,
            callback: Mutex::new(None),
        }
    }

    /// Declare the message this entity needs and how it gets read
    pub fn with_message(mut self, message: Option<MessageId>, poll_mode: PollMode) -> Self {
        self.message = message;
        self.poll_mode = poll_mode;
        self
    }

    pub fn coordinator(&self) -> &Arc<PollingCoordinator> {
        &self.coordinator
    }

    pub fn address(&self) -> Option<&DeviceAddress> {
        self.address.as_ref()
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub fn message(&self) -> Option<MessageId> {
        self.message
    }

    pub fn poll_mode(&self) -> PollMode {
        self.poll_mode
    }

    /// The registry device behind this entity, if it has been seen
    pub fn device(&self) -> Option<Arc<NasaDevice>> {
        self.coordinator.devices().get(self.address.as_ref()?)
    }

    pub fn attribute(&self, id: MessageId) -> Option<AttributeValue> {
        self.device()?.attribute(id)
    }

    /// Availability inherited from the coordinator's last refresh
    pub fn coordinator_available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    pub fn is_attached(&self) -> bool {
        self.callback.lock().is_some()
    }

    /// Register the entity's message for polling and subscribe to changes
    ///
    /// The change subscription needs the device to exist in the registry;
    /// devices that have not been seen yet are only registered for polling.
    pub fn attach(&self, listener: StateListener) {
        if let (Some(address), Some(message)) = (&self.address, self.message) {
            match self.poll_mode {
                PollMode::Passive => {}
                PollMode::Continuous => {
                    self.coordinator.register_polled_attribute(address, message, false)
                }
                PollMode::Bootstrap => {
                    self.coordinator.register_polled_attribute(address, message, true)
                }
            }
        }

        let Some(device) = self.device() else {
            tracing::debug!("{} attached without a device callback", self.unique_id);
            return;
        };

        let unique_id = self.unique_id.clone();
        let id = device.add_device_callback(Arc::new(move |_: &DeviceAddress, _: MessageId| {
            listener(&unique_id)
        }));
        if let Some((previous, previous_id)) = self.callback.lock().replace((device, id)) {
            previous.remove_device_callback(previous_id);
        }
    }

    /// Remove the change subscription; polling registrations stay
    pub fn detach(&self) {
        if let Some((device, id)) = self.callback.lock().take() {
            device.remove_device_callback(id);
        }
    }

    /// Device address, or `Unavailable` when the entity has none or the
    /// device has not been seen
    pub fn require_device(&self) -> Result<&DeviceAddress> {
        match &self.address {
            Some(address) if self.device().is_some() => Ok(address),
            _ => Err(EntityError::Unavailable(self.unique_id.clone())),
        }
    }

    /// Write through the coordinator to this entity's device
    pub async fn write(
        &self,
        message: MessageId,
        kind: DataType,
        value: AttributeValue,
    ) -> Result<()> {
        let address = self.require_device()?;
        self.coordinator
            .write_attribute(address, message, kind, value)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for EntityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityContext")
            .field("unique_id", &self.unique_id)
            .field("address", &self.address)
            .field("message", &self.message)
            .field("poll_mode", &self.poll_mode)
            .finish()
    }
}
