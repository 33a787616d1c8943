//! # ehs-coordinator
//!
//! Keeps NASA attribute values fresh for attributes that devices do not
//! broadcast on their own.
//!
//! ```rust,ignore
//! use ehs_coordinator::{PollingCoordinator, RefreshScheduler};
//!
//! let coordinator = Arc::new(PollingCoordinator::with_defaults(transport));
//!
//! // Entities declare what they need while attaching
//! coordinator.register_polled_attribute(&address, MessageId::new(0x406E), false);
//!
//! // Eager first cycle, then one every 15 seconds
//! coordinator.refresh().await?;
//! let scheduler = RefreshScheduler::start(Arc::clone(&coordinator));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! entities ──register──▶ PollingCoordinator ◀──tick── RefreshScheduler
//!                              │
//!                  batches of ≤10, sequential
//!                              ▼
//!                        NasaTransport ──▶ DeviceRegistry ──▶ entities
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod scheduler;
pub mod worklist;

pub use config::CoordinatorConfig;
pub use coordinator::{CoordinatorPhase, CoordinatorStats, PollingCoordinator, RefreshOutcome};
pub use error::{CoordinatorError, Result};
pub use scheduler::{RefreshScheduler, SchedulerStats};
pub use worklist::{batches, Worklist};
