//! # nasa-client
//!
//! The pieces of a Samsung NASA bus client that the rest of the workspace
//! depends on:
//!
//! - [`DeviceAddress`] and [`AddressClass`] for naming units on the bus
//! - [`MessageId`], [`DataType`] and [`AttributeValue`] for data points
//! - the [`NasaTransport`] trait, the seam to the actual gateway connection
//! - the [`DeviceRegistry`] where decoded attributes land
//!
//! With the `test-support` feature, [`mock::MockTransport`] provides an
//! in-memory transport that records every call.

pub mod address;
pub mod device;
pub mod error;
pub mod message;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use address::{AddressClass, DeviceAddress};
pub use device::{CallbackId, DeviceCallback, DeviceRegistry, DiscoveryCallback, NasaDevice};
pub use error::{Result, TransportError};
pub use message::{AttributeValue, DataType, MessageId};
pub use transport::{validate_batch, NasaTransport, MAX_BATCH_SIZE};
