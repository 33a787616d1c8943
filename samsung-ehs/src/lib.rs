//! # samsung-ehs
//!
//! Samsung EHS heat pumps over the NASA bus: one [`SamsungEhsIntegration`]
//! per config entry, raw attribute services shared by all entries, and
//! discovery of devices that appear on the bus after setup.
//!
//! ```rust,no_run
//! use samsung_ehs::{
//!     DeviceConfig, EhsEntity, EhsServices, EntryConfig, IntegrationEvent, NasaTransport,
//!     SamsungEhsIntegration,
//! };
//! use std::sync::Arc;
//!
//! # async fn run(transport: Arc<dyn NasaTransport>) -> Result<(), samsung_ehs::EhsError> {
//! samsung_ehs::logging::init_logging_from_env().ok();
//!
//! let entry = EntryConfig::new("main", "192.168.1.50", 8000)
//!     .with_device(DeviceConfig::new("10.00.00"))
//!     .with_device(DeviceConfig::new("20.00.00"));
//! let services = Arc::new(EhsServices::default());
//!
//! let mut integration = SamsungEhsIntegration::setup(entry, transport, services).await?;
//! let mut events = integration.take_events().expect("first call");
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         IntegrationEvent::StateChanged { unique_id } => {
//!             if let Some(entity) = integration.entities().get(&unique_id) {
//!                 println!("{} = {:?}", unique_id, entity.state());
//!             }
//!         }
//!         IntegrationEvent::ReloadRequested { .. } => {
//!             integration = integration.reload().await?;
//!             events = integration.take_events().expect("fresh integration");
//!         }
//!         IntegrationEvent::DeviceDiscovered { .. } => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! SamsungEhsIntegration (setup / unload / reload)
//!     ├── ehs_entities (entity catalog)
//!     ├── ehs_coordinator (polling, scheduler)
//!     └── nasa_client (transport, device registry)
//!
//! EhsServices ──▶ HostDeviceRegistry ──▶ transport (direct reads/writes)
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod integration;
pub mod logging;
pub mod registry;
pub mod services;

pub use config::{DeviceConfig, EntryConfig};
pub use discovery::{DiscoveryHandler, EventReceiver, IntegrationEvent};
pub use error::{EhsError, Result, ServiceError};
pub use integration::SamsungEhsIntegration;
pub use registry::{DeviceEntry, HostDeviceRegistry};
pub use services::{AttributeReadout, EhsServices, ReadAttributeCall, WriteAttributeCall};

pub use ehs_coordinator::{CoordinatorConfig, PollingCoordinator, RefreshScheduler};
pub use ehs_entities::{EhsEntity, EntitySet, EntityValue, Platform, DOMAIN};
pub use nasa_client::{AttributeValue, DataType, DeviceAddress, MessageId, NasaTransport};
