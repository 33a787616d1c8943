//! Configuration types for the ehs-coordinator crate
//!
//! Controls how often the coordinator refreshes, how large a read batch may
//! get and whether a dropped transport is reconnected at the start of a cycle.

use nasa_client::MAX_BATCH_SIZE;
use std::time::Duration;

use crate::error::CoordinatorError;

/// Configuration for the PollingCoordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Interval between scheduled refresh cycles
    /// Default: 15 seconds
    pub update_interval: Duration,

    /// Maximum number of messages per read request
    /// Default: 10 (the protocol maximum)
    pub max_batch_size: usize,

    /// Reconnect a dropped transport at the start of each cycle
    /// Default: true
    pub reconnect_on_refresh: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(15),
            max_batch_size: MAX_BATCH_SIZE,
            reconnect_on_refresh: true,
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorter interval for installations that want snappier entities
    pub fn fast_polling() -> Self {
        Self {
            update_interval: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Longer interval for busy buses shared with other controllers
    pub fn resource_efficient() -> Self {
        Self {
            update_interval: Duration::from_secs(60),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoordinatorError> {
        if self.update_interval == Duration::ZERO {
            return Err(CoordinatorError::Configuration(
                "Update interval must be greater than 0".to_string(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(CoordinatorError::Configuration(
                "Max batch size must be greater than 0".to_string(),
            ));
        }

        if self.max_batch_size > MAX_BATCH_SIZE {
            return Err(CoordinatorError::Configuration(format!(
                "Max batch size {} exceeds the protocol maximum of {}",
                self.max_batch_size, MAX_BATCH_SIZE
            )));
        }

        Ok(())
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_reconnect(mut self, enabled: bool) -> Self {
        self.reconnect_on_refresh = enabled;
        self
    }
}
