//! NASA message numbers used by the entity catalog

use nasa_client::MessageId;

// Indoor unit
pub const IN_OPERATION_POWER: MessageId = MessageId::new(0x4000);
pub const IN_OPERATION_MODE: MessageId = MessageId::new(0x4001);
pub const IN_CURRENT_HUMIDITY: MessageId = MessageId::new(0x4038);
pub const IN_WATER_HEATER_POWER: MessageId = MessageId::new(0x4065);
pub const IN_WATER_HEATER_MODE: MessageId = MessageId::new(0x4066);
pub const IN_OUTING_MODE: MessageId = MessageId::new(0x406D);
pub const IN_QUIET_MODE: MessageId = MessageId::new(0x406E);
pub const IN_TARGET_TEMPERATURE: MessageId = MessageId::new(0x4201);
pub const IN_ROOM_TEMPERATURE: MessageId = MessageId::new(0x4203);
pub const IN_DHW_TARGET_TEMPERATURE: MessageId = MessageId::new(0x4235);
pub const IN_DHW_CURRENT_TEMPERATURE: MessageId = MessageId::new(0x4237);
pub const IN_FLOW_TEMPERATURE: MessageId = MessageId::new(0x4238);
pub const IN_WATER_OUTLET_TARGET_TEMPERATURE: MessageId = MessageId::new(0x4247);
pub const IN_WATER_LAW_TARGET_TEMPERATURE: MessageId = MessageId::new(0x4248);
pub const IN_FREQUENCY_RATIO_CONTROL: MessageId = MessageId::new(0x42F1);

// Indoor field setting values (FSV)
pub const IN_FSV_2041_WATER_LAW_TYPE_HEATING: MessageId = MessageId::new(0x4093);
pub const IN_FSV_2091_USE_THERMOSTAT_1: MessageId = MessageId::new(0x4095);
pub const IN_FSV_2092_USE_THERMOSTAT_2: MessageId = MessageId::new(0x4096);
pub const IN_FSV_2093_REMOTE_ROOM_TEMP_CONTROL: MessageId = MessageId::new(0x4127);
pub const IN_FSV_3042_DISINFECTION_DAY: MessageId = MessageId::new(0x409A);
pub const IN_FSV_4051_PWM_PUMP: MessageId = MessageId::new(0x40C4);
pub const IN_FSV_5051_FREQUENCY_RATIO_CONTROL: MessageId = MessageId::new(0x411B);

// Outdoor unit
pub const OUT_OPERATION_STATUS: MessageId = MessageId::new(0x8001);
pub const OUT_DEFROST_STEP: MessageId = MessageId::new(0x8061);
pub const OUT_COMPRESSOR_TARGET_FREQUENCY: MessageId = MessageId::new(0x8237);
pub const OUT_FAN_RPM: MessageId = MessageId::new(0x823D);
pub const OUT_TOP_SENSOR_TEMPERATURE_1: MessageId = MessageId::new(0x8280);

/// Installer settings an indoor unit never broadcasts; read once at startup
pub const INDOOR_CONFIGURATION: &[MessageId] = &[
    IN_FSV_2041_WATER_LAW_TYPE_HEATING,
    IN_FSV_2091_USE_THERMOSTAT_1,
    IN_FSV_2092_USE_THERMOSTAT_2,
    IN_FSV_2093_REMOTE_ROOM_TEMP_CONTROL,
    IN_FSV_3042_DISINFECTION_DAY,
    IN_FSV_4051_PWM_PUMP,
    IN_FSV_5051_FREQUENCY_RATIO_CONTROL,
];
