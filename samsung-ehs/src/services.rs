//! Raw attribute services
//!
//! `read_attribute` and `write_attribute` address a host device id and talk
//! to the transport directly. They bypass the coordinator's worklists, so a
//! service read never causes the attribute to be polled afterwards.

use ehs_coordinator::PollingCoordinator;
use nasa_client::{AttributeValue, DataType, DeviceAddress, MessageId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ServiceError;
use crate::registry::HostDeviceRegistry;

pub const READ_ATTRIBUTE: &str = "read_attribute";
pub const WRITE_ATTRIBUTE: &str = "write_attribute";

type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadAttributeCall {
    #[serde(default)]
    pub device_id: Option<String>,
    pub attribute: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteAttributeCall {
    #[serde(default)]
    pub device_id: Option<String>,
    pub attribute: u16,
    pub value: u32,
}

/// Result of a read, as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeReadout {
    pub device_id: String,
    pub address: DeviceAddress,
    pub attribute: MessageId,
    /// `None` when the device did not answer with a value
    pub value: Option<AttributeValue>,
}

/// Service handlers shared by every loaded entry
#[derive(Debug, Default)]
pub struct EhsServices {
    host_registry: Arc<HostDeviceRegistry>,
    entries: RwLock<HashMap<String, Arc<PollingCoordinator>>>,
}

impl EhsServices {
    pub fn new(host_registry: Arc<HostDeviceRegistry>) -> Self {
        Self {
            host_registry,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn host_registry(&self) -> &Arc<HostDeviceRegistry> {
        &self.host_registry
    }

    pub fn register_entry(&self, entry_id: &str, coordinator: Arc<PollingCoordinator>) {
        self.entries.write().insert(entry_id.to_string(), coordinator);
    }

    /// Returns whether the entry was loaded
    pub fn unregister_entry(&self, entry_id: &str) -> bool {
        self.entries.write().remove(entry_id).is_some()
    }

    pub fn is_loaded(&self, entry_id: &str) -> bool {
        self.entries.read().contains_key(entry_id)
    }

    pub async fn read_attribute(
        &self,
        device_id: Option<&str>,
        attribute: MessageId,
    ) -> Result<AttributeReadout> {
        let (device_id, address, coordinator) = self.resolve(device_id, attribute)?;
        let transport = coordinator.transport();

        transport.read_attributes(&address, &[attribute]).await?;
        let value = transport
            .devices()
            .get(&address)
            .and_then(|device| device.attribute(attribute));

        debug!(
            "Read attribute {} from device {}: {:?}",
            attribute, address, value
        );
        Ok(AttributeReadout {
            device_id,
            address,
            attribute,
            value,
        })
    }

    pub async fn write_attribute(
        &self,
        device_id: Option<&str>,
        attribute: MessageId,
        value: u32,
    ) -> Result<()> {
        let (_, address, coordinator) = self.resolve(device_id, attribute)?;

        coordinator
            .transport()
            .write_attribute(
                &address,
                attribute,
                AttributeValue::Integer(i64::from(value)),
                DataType::Request,
            )
            .await?;

        debug!(
            "Wrote value {} to attribute {} on device {}",
            value, attribute, address
        );
        Ok(())
    }

    /// Dispatch a `read_attribute` call decoded from service data
    pub async fn handle_read(&self, call: ReadAttributeCall) -> Result<AttributeReadout> {
        self.read_attribute(call.device_id.as_deref(), MessageId::new(call.attribute))
            .await
    }

    /// Dispatch a `write_attribute` call decoded from service data
    pub async fn handle_write(&self, call: WriteAttributeCall) -> Result<()> {
        self.write_attribute(
            call.device_id.as_deref(),
            MessageId::new(call.attribute),
            call.value,
        )
        .await
    }

    fn resolve(
        &self,
        device_id: Option<&str>,
        attribute: MessageId,
    ) -> Result<(String, DeviceAddress, Arc<PollingCoordinator>)> {
        let device_id = device_id
            .filter(|id| !id.is_empty())
            .ok_or(ServiceError::MissingDeviceId)?;

        let device = self
            .host_registry
            .get(device_id)
            .ok_or_else(|| ServiceError::DeviceNotFound {
                device_id: device_id.to_string(),
            })?;

        let coordinator = {
            let entries = self.entries.read();
            device
                .config_entries
                .iter()
                .find_map(|entry_id| entries.get(entry_id).cloned())
        };

        match (coordinator, device.bus_address()) {
            (Some(coordinator), Some(address)) => Ok((device.id, address, coordinator)),
            _ => Err(ServiceError::InvalidDevice {
                device_id: device.id,
                attribute,
            }),
        }
    }
}
