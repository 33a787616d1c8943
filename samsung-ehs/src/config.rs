//! Config entry for one Samsung EHS installation
//!
//! An entry names the gateway to talk to and the bus devices it owns. It is
//! stored as JSON, by default under the user's config directory.

use ehs_coordinator::CoordinatorConfig;
use nasa_client::DeviceAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EhsError, Result};

const CONFIG_DIR: &str = "samsung-ehs";
const CONFIG_FILE: &str = "entry.json";

fn default_client_address() -> u8 {
    0x01
}

fn default_update_interval_secs() -> u64 {
    15
}

/// A device sub-entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub address: DeviceAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DeviceConfig {
    pub fn new(address: impl Into<DeviceAddress>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Unique per entry; may not contain `_`, which separates the parts of
    /// device identifiers
    pub entry_id: String,

    pub host: String,

    pub port: u16,

    /// Address this client uses on the bus
    /// Default: 0x01
    #[serde(default = "default_client_address")]
    pub client_address: u8,

    /// Seconds between refresh cycles
    /// Default: 15
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,

    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl EntryConfig {
    pub fn new(entry_id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            entry_id: entry_id.into(),
            host: host.into(),
            port,
            client_address: default_client_address(),
            update_interval_secs: default_update_interval_secs(),
            devices: Vec::new(),
        }
    }

    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.add_device(device);
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval_secs = interval.as_secs();
        self
    }

    /// Returns false when the address is already configured
    pub fn add_device(&mut self, device: DeviceConfig) -> bool {
        if self.has_device(&device.address) {
            return false;
        }
        self.devices.push(device);
        true
    }

    pub fn has_device(&self, address: &DeviceAddress) -> bool {
        self.devices.iter().any(|device| &device.address == address)
    }

    /// Configured addresses in entry order
    pub fn addresses(&self) -> Vec<DeviceAddress> {
        self.devices.iter().map(|device| device.address.clone()).collect()
    }

    pub fn device_name(&self, address: &DeviceAddress) -> Option<&str> {
        self.devices
            .iter()
            .find(|device| &device.address == address)
            .and_then(|device| device.name.as_deref())
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::default()
            .with_update_interval(Duration::from_secs(self.update_interval_secs))
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry_id.is_empty() {
            return Err(EhsError::Config("Entry id must not be empty".to_string()));
        }

        if self.entry_id.contains('_') {
            return Err(EhsError::Config(format!(
                "Entry id {} must not contain '_'",
                self.entry_id
            )));
        }

        if self.host.is_empty() {
            return Err(EhsError::Config("Host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(EhsError::Config("Port must be between 1 and 65535".to_string()));
        }

        if self.update_interval_secs == 0 {
            return Err(EhsError::Config(
                "Update interval must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if !seen.insert(&device.address) {
                return Err(EhsError::Config(format!(
                    "Device {} is configured twice",
                    device.address
                )));
            }
        }

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: EntryConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the entry as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/samsung-ehs/entry.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()
            .ok_or_else(|| EhsError::Config("No user config directory".to_string()))?;
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry() -> EntryConfig {
        EntryConfig::new("abc123", "192.168.1.50", 8000)
            .with_device(DeviceConfig::new("10.00.00"))
            .with_device(DeviceConfig::new("20.00.00").with_name("Indoor unit"))
    }

    #[test]
    fn test_defaults() {
        let config = EntryConfig::new("abc123", "gateway.local", 8000);
        assert_eq!(config.client_address, 0x01);
        assert_eq!(config.update_interval_secs, 15);
        assert_eq!(
            config.coordinator_config().update_interval,
            Duration::from_secs(15)
        );
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("", "host", 8000)]
    #[case("abc_123", "host", 8000)]
    #[case("abc123", "", 8000)]
    #[case("abc123", "host", 0)]
    fn test_invalid_entries(#[case] entry_id: &str, #[case] host: &str, #[case] port: u16) {
        let config = EntryConfig::new(entry_id, host, port);
        assert!(matches!(config.validate(), Err(EhsError::Config(_))));
    }

    #[test]
    fn test_duplicate_devices_are_rejected() {
        let mut config = entry();
        assert!(!config.add_device(DeviceConfig::new("10.00.00")));
        assert_eq!(config.devices.len(), 2);

        config.devices.push(DeviceConfig::new("10.00.00"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = entry().with_update_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_lookup() {
        let config = entry();
        assert_eq!(
            config.addresses(),
            vec![DeviceAddress::new("10.00.00"), DeviceAddress::new("20.00.00")]
        );
        assert_eq!(
            config.device_name(&DeviceAddress::new("20.00.00")),
            Some("Indoor unit")
        );
        assert_eq!(config.device_name(&DeviceAddress::new("10.00.00")), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("entry.json");

        entry().save(&path).unwrap();
        let loaded = EntryConfig::load(&path).unwrap();

        assert_eq!(loaded, entry());
    }

    #[test]
    fn test_load_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.json");
        std::fs::write(
            &path,
            r#"{"entry_id":"abc123","host":"10.0.0.2","port":8000,"devices":[{"address":"20.00.00"}]}"#,
        )
        .unwrap();

        let loaded = EntryConfig::load(&path).unwrap();

        assert_eq!(loaded.client_address, 0x01);
        assert_eq!(loaded.update_interval_secs, 15);
        assert_eq!(loaded.devices, vec![DeviceConfig::new("20.00.00")]);
    }

    #[test]
    fn test_load_rejects_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.json");

        assert!(matches!(EntryConfig::load(&path), Err(EhsError::Io(_))));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(EntryConfig::load(&path), Err(EhsError::Json(_))));

        std::fs::write(&path, r#"{"entry_id":"a_b","host":"h","port":1}"#).unwrap();
        assert!(matches!(EntryConfig::load(&path), Err(EhsError::Config(_))));
    }
}
