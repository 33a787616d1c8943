//! Error types for the ehs-coordinator crate.

use nasa_client::TransportError;

/// Errors surfaced by the polling coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// A read or write failed in the transport
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The refresh scheduler could not be stopped cleanly
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

/// Convenience type alias for Results using CoordinatorError.
pub type Result<T> = std::result::Result<T, CoordinatorError>;
