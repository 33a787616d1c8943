//! Temperature control mode resolution for space heating

use nasa_client::{MessageId, NasaDevice};

use crate::enums::OperationMode;
use crate::messages::{
    IN_FSV_2091_USE_THERMOSTAT_1, IN_FSV_2092_USE_THERMOSTAT_2, IN_OPERATION_MODE,
    IN_TARGET_TEMPERATURE, IN_WATER_LAW_TARGET_TEMPERATURE, IN_WATER_OUTLET_TARGET_TEMPERATURE,
};

/// Which setpoint a space heating target temperature is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureControlMode {
    TargetWaterTemperature,
    WaterLawOffset,
    TargetRoomTemperature,
}

impl TemperatureControlMode {
    /// Message carrying the setpoint for this mode
    pub fn target_message(&self) -> MessageId {
        match self {
            TemperatureControlMode::TargetWaterTemperature => IN_WATER_OUTLET_TARGET_TEMPERATURE,
            TemperatureControlMode::WaterLawOffset => IN_WATER_LAW_TARGET_TEMPERATURE,
            TemperatureControlMode::TargetRoomTemperature => IN_TARGET_TEMPERATURE,
        }
    }
}

/// Resolve the control mode from the operation mode
///
/// Unknown until the operation mode and both thermostat settings have been
/// seen.
pub fn temperature_control_mode(device: &NasaDevice) -> Option<TemperatureControlMode> {
    let required = [
        IN_OPERATION_MODE,
        IN_FSV_2091_USE_THERMOSTAT_1,
        IN_FSV_2092_USE_THERMOSTAT_2,
    ];
    if !required.iter().all(|id| device.has_attribute(*id)) {
        return None;
    }

    let mode = device
        .attribute(IN_OPERATION_MODE)
        .and_then(|value| value.as_i64())
        .and_then(OperationMode::from_value);

    Some(match mode {
        Some(OperationMode::Heat) | Some(OperationMode::Cool) => {
            TemperatureControlMode::TargetWaterTemperature
        }
        Some(OperationMode::Auto) => TemperatureControlMode::WaterLawOffset,
        _ => TemperatureControlMode::TargetRoomTemperature,
    })
}
