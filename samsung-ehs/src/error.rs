//! Error types for the samsung-ehs crate.

use ehs_coordinator::CoordinatorError;
use ehs_entities::EntityError;
use nasa_client::{MessageId, TransportError};
use thiserror::Error;

/// Errors raised while setting up, running or unloading an integration.
#[derive(Error, Debug)]
pub enum EhsError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The first refresh failed; setup should be retried later
    #[error("Integration not ready: {0}")]
    NotReady(String),

    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation and transport errors from the attribute services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Missing device_id")]
    MissingDeviceId,

    #[error("Device {device_id} not found")]
    DeviceNotFound { device_id: String },

    /// The device exists but has no loaded entry or no bus address
    #[error("Device {device_id} cannot serve attribute {attribute}")]
    InvalidDevice {
        device_id: String,
        attribute: MessageId,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, EhsError>;
