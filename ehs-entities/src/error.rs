//! Error types for entity commands

use ehs_coordinator::CoordinatorError;
use thiserror::Error;

/// Errors returned by entity commands (turn on, select option, set value...)
#[derive(Debug, Error)]
pub enum EntityError {
    /// The entity has no device behind it, or its device is not ready
    #[error("Entity {0} is unavailable")]
    Unavailable(String),

    /// A numeric value was outside the entity's range
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A select option or operation mode not offered by the entity
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The write reached the coordinator and failed there
    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),
}

pub type Result<T> = std::result::Result<T, EntityError>;

#[cfg(test)]
mod tests {
    use super::*;
    use nasa_client::TransportError;

    #[test]
    fn test_error_display() {
        let err = EntityError::Unavailable("entry_20.00.00_heating".to_string());
        assert_eq!(err.to_string(), "Entity entry_20.00.00_heating is unavailable");

        let err = EntityError::InvalidOption("mode_9".to_string());
        assert_eq!(err.to_string(), "Invalid option: mode_9");
    }

    #[test]
    fn test_coordinator_error_conversion() {
        let err: EntityError = CoordinatorError::Transport(TransportError::NotConnected).into();
        assert!(matches!(err, EntityError::Coordinator(_)));
    }
}
