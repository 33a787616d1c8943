//! Protocol enumerations decoded from integer attribute values

/// Indoor operation mode (`0x4001`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMode {
    Auto,
    Cool,
    Dry,
    Fan,
    Heat,
}

impl OperationMode {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(OperationMode::Auto),
            1 => Some(OperationMode::Cool),
            2 => Some(OperationMode::Dry),
            3 => Some(OperationMode::Fan),
            4 => Some(OperationMode::Heat),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            OperationMode::Auto => 0,
            OperationMode::Cool => 1,
            OperationMode::Dry => 2,
            OperationMode::Fan => 3,
            OperationMode::Heat => 4,
        }
    }
}

/// Domestic hot water operating mode (`0x4066`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DhwOpMode {
    Eco,
    Standard,
    Power,
    Force,
}

impl DhwOpMode {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(DhwOpMode::Eco),
            1 => Some(DhwOpMode::Standard),
            2 => Some(DhwOpMode::Power),
            3 => Some(DhwOpMode::Force),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            DhwOpMode::Eco => 0,
            DhwOpMode::Standard => 1,
            DhwOpMode::Power => 2,
            DhwOpMode::Force => 3,
        }
    }
}

/// Outdoor unit operation status (`0x8001`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutdoorOperationStatus {
    Stop,
    Safety,
    Normal,
    Balance,
    Recovery,
    Deice,
    Other(i64),
}

impl OutdoorOperationStatus {
    pub fn from_value(value: i64) -> Self {
        match value {
            0 => OutdoorOperationStatus::Stop,
            1 => OutdoorOperationStatus::Safety,
            2 => OutdoorOperationStatus::Normal,
            3 => OutdoorOperationStatus::Balance,
            4 => OutdoorOperationStatus::Recovery,
            5 => OutdoorOperationStatus::Deice,
            other => OutdoorOperationStatus::Other(other),
        }
    }
}

/// Outdoor defrost step (`0x8061`); 255 means no defrost is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefrostStep {
    NoDefrost,
    Step(u8),
}

impl DefrostStep {
    pub fn from_value(value: i64) -> Self {
        match value {
            255 | 0 => DefrostStep::NoDefrost,
            step => DefrostStep::Step(step.clamp(1, 254) as u8),
        }
    }

    pub fn is_defrosting(&self) -> bool {
        matches!(self, DefrostStep::Step(_))
    }
}

/// Options for FSV 2041, water law type for heating
pub const WATER_LAW_TYPE_OPTIONS: &[&str] = &["floor_heating", "fan_coil_unit"];

/// Options for FSV 2091/2092, external thermostat use per zone
pub const USE_THERMOSTAT_OPTIONS: &[&str] = &["no", "mode_1", "mode_2", "mode_3", "mode_4"];

/// Options for FSV 2093, remote controller room temperature control
pub const REMOTE_ROOM_TEMP_CONTROL_OPTIONS: &[&str] = &["mode_1", "mode_2", "mode_3", "mode_4"];

/// Options for FSV 3042, disinfection day of week
pub const DAY_OF_WEEK_OPTIONS: &[&str] = &[
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "everyday",
];

/// Options for FSV 4051, PWM pump mode
pub const PWM_PUMP_OPTIONS: &[&str] = &["no", "yes_100", "yes_70"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_mode_values_roundtrip() {
        for mode in [
            OperationMode::Auto,
            OperationMode::Cool,
            OperationMode::Dry,
            OperationMode::Fan,
            OperationMode::Heat,
        ] {
            assert_eq!(OperationMode::from_value(mode.value()), Some(mode));
        }
        assert_eq!(OperationMode::from_value(21), None);
    }

    #[test]
    fn test_dhw_op_mode_values() {
        assert_eq!(DhwOpMode::from_value(2), Some(DhwOpMode::Power));
        assert_eq!(DhwOpMode::Force.value(), 3);
        assert_eq!(DhwOpMode::from_value(9), None);
    }

    #[test]
    fn test_defrost_step() {
        assert!(!DefrostStep::from_value(255).is_defrosting());
        assert!(!DefrostStep::from_value(0).is_defrosting());
        assert_eq!(DefrostStep::from_value(3), DefrostStep::Step(3));
        assert!(DefrostStep::from_value(3).is_defrosting());
    }

    #[test]
    fn test_outdoor_status_keeps_unknown_values() {
        assert_eq!(OutdoorOperationStatus::from_value(2), OutdoorOperationStatus::Normal);
        assert_eq!(
            OutdoorOperationStatus::from_value(42),
            OutdoorOperationStatus::Other(42)
        );
    }
}
