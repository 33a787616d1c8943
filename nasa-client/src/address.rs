//! Device addressing on the NASA bus
//!
//! Every unit on the bus is named by a class/channel/index triplet written as
//! dotted hex, e.g. `"20.00.00"` for the first indoor unit. The rest of the
//! workspace treats the address as an opaque key; only the class byte is
//! interpreted, to decide which entity catalog a device gets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address class, taken from the first byte of a device address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    /// Outdoor unit (`0x10`)
    Outdoor,
    /// Hydro/heat transfer unit (`0x11`)
    HydroUnit,
    /// Indoor unit (`0x20`)
    Indoor,
    /// Wired remote controller (`0x50`)
    WiredRemote,
    /// Wifi kit / gateway (`0x62`)
    WifiKit,
    /// Any class this workspace has no catalog for
    Other(u8),
}

impl AddressClass {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x10 => AddressClass::Outdoor,
            0x11 => AddressClass::HydroUnit,
            0x20 => AddressClass::Indoor,
            0x50 => AddressClass::WiredRemote,
            0x62 => AddressClass::WifiKit,
            other => AddressClass::Other(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            AddressClass::Outdoor => 0x10,
            AddressClass::HydroUnit => 0x11,
            AddressClass::Indoor => 0x20,
            AddressClass::WiredRemote => 0x50,
            AddressClass::WifiKit => 0x62,
            AddressClass::Other(byte) => *byte,
        }
    }
}

/// Opaque identifier of one physical unit on the bus
///
/// Normalized to lower-case so `"20.00.0A"` and `"20.00.0a"` name the same
/// device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DeviceAddress(String);

impl DeviceAddress {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        Self(address.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address class from the leading hex byte, if the address has one
    pub fn class(&self) -> Option<AddressClass> {
        let head = self.0.split('.').next()?;
        if head.len() != 2 {
            return None;
        }
        u8::from_str_radix(head, 16).ok().map(AddressClass::from_byte)
    }

    pub fn is_outdoor(&self) -> bool {
        self.class() == Some(AddressClass::Outdoor)
    }

    pub fn is_indoor(&self) -> bool {
        self.class() == Some(AddressClass::Indoor)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceAddress {
    fn from(s: &str) -> Self {
        DeviceAddress::new(s)
    }
}

impl From<String> for DeviceAddress {
    fn from(s: String) -> Self {
        DeviceAddress::new(s)
    }
}

impl From<DeviceAddress> for String {
    fn from(address: DeviceAddress) -> Self {
        address.0
    }
}
