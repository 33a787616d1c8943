//! Field setting selects
//!
//! Each option list is indexed by the raw enum value the unit uses, so the
//! selected option's position is what gets written.

use nasa_client::{AttributeValue, DataType, MessageId};

use crate::context::{EntityContext, PollMode};
use crate::enums::{
    DAY_OF_WEEK_OPTIONS, PWM_PUMP_OPTIONS, REMOTE_ROOM_TEMP_CONTROL_OPTIONS,
    USE_THERMOSTAT_OPTIONS, WATER_LAW_TYPE_OPTIONS,
};
use crate::error::{EntityError, Result};
use crate::extractor::EntityValue;
use crate::messages::{
    IN_FSV_2041_WATER_LAW_TYPE_HEATING, IN_FSV_2091_USE_THERMOSTAT_1,
    IN_FSV_2092_USE_THERMOSTAT_2, IN_FSV_2093_REMOTE_ROOM_TEMP_CONTROL,
    IN_FSV_3042_DISINFECTION_DAY, IN_FSV_4051_PWM_PUMP,
};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy)]
pub struct SelectDescription {
    pub key: &'static str,
    pub message: MessageId,
    pub options: &'static [&'static str],
}

pub const INDOOR_SELECTS: &[SelectDescription] = &[
    SelectDescription {
        key: "water_law_type_heating",
        message: IN_FSV_2041_WATER_LAW_TYPE_HEATING,
        options: WATER_LAW_TYPE_OPTIONS,
    },
    SelectDescription {
        key: "use_thermostat_zone_1",
        message: IN_FSV_2091_USE_THERMOSTAT_1,
        options: USE_THERMOSTAT_OPTIONS,
    },
    SelectDescription {
        key: "use_thermostat_zone_2",
        message: IN_FSV_2092_USE_THERMOSTAT_2,
        options: USE_THERMOSTAT_OPTIONS,
    },
    SelectDescription {
        key: "remote_controller_room_temp_control",
        message: IN_FSV_2093_REMOTE_ROOM_TEMP_CONTROL,
        options: REMOTE_ROOM_TEMP_CONTROL_OPTIONS,
    },
    SelectDescription {
        key: "dhw_disinfection_day_of_week",
        message: IN_FSV_3042_DISINFECTION_DAY,
        options: DAY_OF_WEEK_OPTIONS,
    },
    SelectDescription {
        key: "pwm_pump_mode",
        message: IN_FSV_4051_PWM_PUMP,
        options: PWM_PUMP_OPTIONS,
    },
];

#[derive(Debug)]
pub struct Select {
    context: EntityContext,
    description: &'static SelectDescription,
}

impl Select {
    /// Settings are read once at startup by the coordinator's bootstrap, so
    /// the select itself registers nothing.
    pub fn new(context: EntityContext, description: &'static SelectDescription) -> Self {
        Self {
            context: context.with_message(Some(description.message), PollMode::Passive),
            description,
        }
    }

    pub fn options(&self) -> &'static [&'static str] {
        self.description.options
    }

    /// Option name for the current raw value; values outside the list are
    /// shown as-is
    pub fn current_option(&self) -> Option<String> {
        let value = self.context.attribute(self.description.message)?;
        let options = self.description.options;
        match value.as_i64() {
            Some(index) if index >= 0 && (index as usize) < options.len() => {
                Some(options[index as usize].to_string())
            }
            Some(raw) => Some(raw.to_string()),
            None => value.as_str().map(str::to_string),
        }
    }

    pub async fn select_option(&self, option: &str) -> Result<()> {
        let wanted = option.to_lowercase();
        let index = self
            .description
            .options
            .iter()
            .position(|candidate| *candidate == wanted)
            .ok_or_else(|| {
                EntityError::InvalidOption(format!("{} for {}", option, self.description.key))
            })?;

        self.context
            .write(
                self.description.message,
                DataType::Request,
                AttributeValue::Integer(index as i64),
            )
            .await
    }
}

impl EhsEntity for Select {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Select
    }

    fn available(&self) -> bool {
        self.context.coordinator_available() && self.context.device().is_some()
    }

    fn state(&self) -> Option<EntityValue> {
        self.current_option().map(EntityValue::Text)
    }
}
