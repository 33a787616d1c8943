//! New-device discovery
//!
//! The transport registry reports every address it sees for the first time.
//! Addresses the entry does not know yet are appended to the entry as device
//! sub-entries and a reload is requested, so the next setup builds entities
//! for them.

use nasa_client::{DeviceAddress, DiscoveryCallback, NasaDevice};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::{DeviceConfig, EntryConfig};

/// Notifications sent from a running integration to its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationEvent {
    /// An entity's device reported a change
    StateChanged { unique_id: String },
    /// A new device was added to the entry
    DeviceDiscovered {
        entry_id: String,
        address: DeviceAddress,
    },
    /// The entry changed and should be unloaded and set up again
    ReloadRequested { entry_id: String },
}

pub type EventSender = mpsc::UnboundedSender<IntegrationEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<IntegrationEvent>;

#[derive(Debug)]
pub struct DiscoveryHandler {
    entry: Arc<RwLock<EntryConfig>>,
    events: EventSender,
}

impl DiscoveryHandler {
    pub fn new(entry: Arc<RwLock<EntryConfig>>, events: EventSender) -> Self {
        Self { entry, events }
    }

    /// Returns true when the address was new to the entry
    pub fn handle(&self, address: &DeviceAddress) -> bool {
        let entry_id = {
            let mut entry = self.entry.write();
            if !entry.add_device(DeviceConfig::new(address.clone())) {
                return false;
            }
            entry.entry_id.clone()
        };

        info!("Discovered new device {} for entry {}", address, entry_id);
        let _ = self.events.send(IntegrationEvent::DeviceDiscovered {
            entry_id: entry_id.clone(),
            address: address.clone(),
        });
        let _ = self.events.send(IntegrationEvent::ReloadRequested { entry_id });
        true
    }

    /// Callback for the transport's device registry
    pub fn callback(self: &Arc<Self>) -> DiscoveryCallback {
        let handler = Arc::clone(self);
        Arc::new(move |device: &Arc<NasaDevice>| {
            handler.handle(device.address());
        })
    }
}
