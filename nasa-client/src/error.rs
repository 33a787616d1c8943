//! Error types for the nasa-client crate.

use crate::address::DeviceAddress;
use crate::message::MessageId;

/// Errors raised by a NASA transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport has no live connection
    #[error("Not connected")]
    NotConnected,

    /// Opening the connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The device did not answer in time
    #[error("Timed out waiting for {message} from {address}")]
    Timeout {
        /// The device that was asked
        address: DeviceAddress,
        /// The first message of the request
        message: MessageId,
    },

    /// A read batch exceeded what fits in one packet
    #[error("Batch of {size} messages exceeds the maximum of {max}")]
    BatchTooLarge {
        /// Number of messages in the batch
        size: usize,
        /// Maximum allowed per packet
        max: usize,
    },

    /// A read batch had no messages
    #[error("Empty read batch")]
    EmptyBatch,

    /// No device with this address is known
    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceAddress),

    /// The device answered with a NACK or a malformed response
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Convenience type alias for Results using TransportError.
pub type Result<T> = std::result::Result<T, TransportError>;
