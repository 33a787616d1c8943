//! Config entry lifecycle
//!
//! `setup` wires one entry together: coordinator, bootstrap reads, the eager
//! first refresh, entities, host devices, the refresh scheduler and
//! discovery. `unload` takes it apart again in reverse.

use ehs_coordinator::{PollingCoordinator, RefreshScheduler};
use ehs_entities::{setup_entities, DeviceInfo, EntitySet, StateListener, INDOOR_CONFIGURATION};
use nasa_client::{CallbackId, DeviceAddress, NasaTransport};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::EntryConfig;
use crate::discovery::{DiscoveryHandler, EventReceiver, IntegrationEvent};
use crate::error::{EhsError, Result};
use crate::services::EhsServices;

/// One loaded config entry
pub struct SamsungEhsIntegration {
    entry_id: String,
    entry: Arc<RwLock<EntryConfig>>,
    transport: Arc<dyn NasaTransport>,
    coordinator: Arc<PollingCoordinator>,
    entities: EntitySet,
    scheduler: RefreshScheduler,
    services: Arc<EhsServices>,
    discovery: CallbackId,
    events: Mutex<Option<EventReceiver>>,
}

impl SamsungEhsIntegration {
    /// Set up an entry
    ///
    /// Fails with [`EhsError::NotReady`] when the first refresh fails; nothing
    /// is left registered in that case.
    pub async fn setup(
        entry: EntryConfig,
        transport: Arc<dyn NasaTransport>,
        services: Arc<EhsServices>,
    ) -> Result<Self> {
        entry.validate()?;
        let entry_id = entry.entry_id.clone();
        let addresses = entry.addresses();
        info!(
            "Setting up entry {} for {}:{} with {} devices",
            entry_id,
            entry.host,
            entry.port,
            addresses.len()
        );

        let coordinator = Arc::new(PollingCoordinator::new(
            Arc::clone(&transport),
            entry.coordinator_config(),
        )?);

        for address in addresses.iter().filter(|address| address.is_indoor()) {
            for message in INDOOR_CONFIGURATION {
                coordinator.register_polled_attribute(address, *message, true);
            }
        }
        for address in &addresses {
            transport.devices().ensure_device(address);
        }

        coordinator
            .refresh()
            .await
            .map_err(|e| EhsError::NotReady(e.to_string()))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let entities = setup_entities(&coordinator, &entry_id, &addresses);
        let state_tx = events_tx.clone();
        let listener: StateListener = Arc::new(move |unique_id: &str| {
            let _ = state_tx.send(IntegrationEvent::StateChanged {
                unique_id: unique_id.to_string(),
            });
        });
        entities.attach_all(listener);

        register_host_devices(&services, &entry, &addresses);
        services.register_entry(&entry_id, Arc::clone(&coordinator));

        let scheduler = RefreshScheduler::start(Arc::clone(&coordinator));

        let entry = Arc::new(RwLock::new(entry));
        let handler = Arc::new(DiscoveryHandler::new(Arc::clone(&entry), events_tx));
        let discovery = transport.devices().on_device_discovered(handler.callback());

        info!("Entry {} set up with {} entities", entry_id, entities.len());
        Ok(Self {
            entry_id,
            entry,
            transport,
            coordinator,
            entities,
            scheduler,
            services,
            discovery,
            events: Mutex::new(Some(events_rx)),
        })
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    /// Current entry, including devices added by discovery
    pub fn entry(&self) -> EntryConfig {
        self.entry.read().clone()
    }

    pub fn coordinator(&self) -> &Arc<PollingCoordinator> {
        &self.coordinator
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn transport(&self) -> &Arc<dyn NasaTransport> {
        &self.transport
    }

    pub fn services(&self) -> &Arc<EhsServices> {
        &self.services
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Event stream for this entry; only the first call gets it
    pub fn take_events(&self) -> Option<EventReceiver> {
        self.events.lock().take()
    }

    /// Restart the transport after the gateway dropped the connection
    pub async fn handle_disconnection(&self) -> Result<()> {
        warn!("Entry {} lost its connection, restarting transport", self.entry_id);
        self.transport.disconnect().await?;
        self.transport.connect().await?;
        Ok(())
    }

    pub async fn unload(self) -> Result<()> {
        info!("Unloading entry {}", self.entry_id);
        self.scheduler.shutdown().await?;
        self.entities.detach_all();
        self.transport.devices().remove_discovery_callback(self.discovery);
        self.services.unregister_entry(&self.entry_id);
        self.transport.disconnect().await?;
        Ok(())
    }

    /// Unload, then set up again from the current entry
    pub async fn reload(self) -> Result<Self> {
        let entry = self.entry();
        let transport = Arc::clone(&self.transport);
        let services = Arc::clone(&self.services);

        self.unload().await?;
        Self::setup(entry, transport, services).await
    }
}

impl std::fmt::Debug for SamsungEhsIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamsungEhsIntegration")
            .field("entry_id", &self.entry_id)
            .field("coordinator", &self.coordinator)
            .field("entities", &self.entities.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

/// One host device per configured address, named from the entry when it
/// carries a name
fn register_host_devices(services: &EhsServices, entry: &EntryConfig, addresses: &[DeviceAddress]) {
    let registry = services.host_registry();
    for address in addresses {
        let mut info = DeviceInfo::new(&entry.entry_id, address);
        if let Some(name) = entry.device_name(address) {
            info.name = name.to_string();
        }
        registry.get_or_create(&entry.entry_id, &info);
    }
}
