//! Transport seam to the NASA bus
//!
//! Framing, checksums, request/response correlation and the socket itself
//! live behind this trait. Everything above it only needs connection
//! liveness, batched reads and single writes.

use async_trait::async_trait;

use crate::address::DeviceAddress;
use crate::device::DeviceRegistry;
use crate::error::{Result, TransportError};
use crate::message::{AttributeValue, DataType, MessageId};

/// Maximum number of messages one read packet may carry
pub const MAX_BATCH_SIZE: usize = 10;

/// Connection to a NASA bus gateway
///
/// Reads do not return values: answers arrive as packets and land in the
/// [`DeviceRegistry`], the same way unsolicited broadcasts do.
#[async_trait]
pub trait NasaTransport: Send + Sync {
    /// Open (or reopen) the connection
    async fn connect(&self) -> Result<()>;

    /// Close the connection
    async fn disconnect(&self) -> Result<()>;

    /// Whether the connection is currently alive
    fn is_connected(&self) -> bool;

    /// Request a batch of 1 to [`MAX_BATCH_SIZE`] messages from one device
    async fn read_attributes(&self, address: &DeviceAddress, messages: &[MessageId]) -> Result<()>;

    /// Send a single value to a device
    async fn write_attribute(
        &self,
        address: &DeviceAddress,
        message: MessageId,
        value: AttributeValue,
        kind: DataType,
    ) -> Result<()>;

    /// Devices and decoded attributes seen so far
    fn devices(&self) -> &DeviceRegistry;
}

/// Check a read batch against the packet limits
pub fn validate_batch(messages: &[MessageId]) -> Result<()> {
    if messages.is_empty() {
        return Err(TransportError::EmptyBatch);
    }
    if messages.len() > MAX_BATCH_SIZE {
        return Err(TransportError::BatchTooLarge {
            size: messages.len(),
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}
