//! # ehs-entities
//!
//! Maps NASA messages to typed entities for a Samsung EHS installation.
//!
//! The catalog is picked by address class:
//!
//! | class   | entities |
//! |---------|----------|
//! | any     | available attributes sensor, online binary sensor |
//! | outdoor | temperature, compressor frequency, fan speed, last packet sensors |
//! | indoor  | DHW and flow sensors, outing/quiet switches, frequency ratio number, FSV selects, climate, water heater |
//!
//! plus one `connected` binary sensor per entry.
//!
//! ```rust,ignore
//! use ehs_entities::setup_entities;
//!
//! let entities = setup_entities(&coordinator, "entry", &addresses);
//! entities.attach_all(Arc::new(|unique_id| println!("{} changed", unique_id)));
//!
//! for entity in entities.iter() {
//!     println!("{}: {:?}", entity.unique_id(), entity.state());
//! }
//! ```
//!
//! Entities read values from the transport's device registry. Attaching an
//! entity registers its message with the coordinator when the device does not
//! broadcast it, so the coordinator reads it every cycle.

pub mod binary_sensor;
pub mod climate;
pub mod context;
pub mod enums;
pub mod error;
pub mod extractor;
pub mod helpers;
pub mod messages;
pub mod number;
pub mod platform;
pub mod select;
pub mod sensor;
pub mod switch;
pub mod water_heater;

pub use binary_sensor::BinarySensor;
pub use climate::{Climate, HvacAction, HvacMode};
pub use context::{device_identifier, DeviceInfo, EntityContext, PollMode, StateListener, DOMAIN};
pub use error::{EntityError, Result};
pub use extractor::{EntityValue, ValueExtractor};
pub use helpers::{temperature_control_mode, TemperatureControlMode};
pub use messages::INDOOR_CONFIGURATION;
pub use number::Number;
pub use platform::{setup_entities, EhsEntity, EntitySet, Platform};
pub use select::Select;
pub use sensor::{AvailableAttributesSensor, Sensor};
pub use switch::Switch;
pub use water_heater::{WaterHeater, WaterHeaterOperation};
