//! Space heating climate entity
//!
//! Mode and action are derived from the indoor unit's power and operation
//! mode plus the outdoor unit's operation status and defrost step. The
//! outdoor values are taken from the indoor unit when it relays them,
//! otherwise from the first outdoor unit in the registry.

use nasa_client::{AttributeValue, DataType, MessageId};
use std::collections::BTreeMap;
use std::fmt;

use crate::context::EntityContext;
use crate::enums::{DefrostStep, OperationMode, OutdoorOperationStatus};
use crate::error::{EntityError, Result};
use crate::extractor::EntityValue;
use crate::helpers::temperature_control_mode;
use crate::messages::{
    IN_CURRENT_HUMIDITY, IN_OPERATION_MODE, IN_OPERATION_POWER, IN_ROOM_TEMPERATURE,
    IN_TARGET_TEMPERATURE, OUT_DEFROST_STEP, OUT_OPERATION_STATUS,
};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    Auto,
    Cool,
    Heat,
    FanOnly,
    Off,
}

impl HvacMode {
    pub const ALL: [HvacMode; 5] = [
        HvacMode::Auto,
        HvacMode::Cool,
        HvacMode::Heat,
        HvacMode::FanOnly,
        HvacMode::Off,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Auto => "auto",
            HvacMode::Cool => "cool",
            HvacMode::Heat => "heat",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Off => "off",
        }
    }

    fn from_operation_mode(mode: OperationMode) -> Option<Self> {
        match mode {
            OperationMode::Auto => Some(HvacMode::Auto),
            OperationMode::Cool => Some(HvacMode::Cool),
            OperationMode::Heat => Some(HvacMode::Heat),
            OperationMode::Fan => Some(HvacMode::FanOnly),
            OperationMode::Dry => None,
        }
    }

    fn operation_mode(&self) -> Option<OperationMode> {
        match self {
            HvacMode::Auto => Some(OperationMode::Auto),
            HvacMode::Cool => Some(OperationMode::Cool),
            HvacMode::Heat => Some(OperationMode::Heat),
            HvacMode::FanOnly => Some(OperationMode::Fan),
            HvacMode::Off => None,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacAction {
    Cooling,
    Heating,
    Preheating,
    Defrosting,
    Idle,
    Off,
}

impl HvacAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HvacAction::Cooling => "cooling",
            HvacAction::Heating => "heating",
            HvacAction::Preheating => "preheating",
            HvacAction::Defrosting => "defrosting",
            HvacAction::Idle => "idle",
            HvacAction::Off => "off",
        }
    }
}

#[derive(Debug)]
pub struct Climate {
    context: EntityContext,
}

impl Climate {
    pub const KEY: &'static str = "heating";

    pub fn new(context: EntityContext) -> Self {
        Self { context }
    }

    fn power(&self) -> Option<bool> {
        self.context
            .attribute(IN_OPERATION_POWER)
            .and_then(|value| value.as_bool())
    }

    fn float(&self, id: MessageId) -> Option<f64> {
        self.context.attribute(id).and_then(|value| value.as_f64())
    }

    /// Outdoor value relayed by this unit, or read from an outdoor unit
    fn outdoor_value(&self, id: MessageId) -> Option<AttributeValue> {
        if let Some(value) = self.context.attribute(id) {
            return Some(value);
        }
        let registry = self.context.coordinator().devices();
        registry
            .addresses()
            .into_iter()
            .filter(|address| address.is_outdoor())
            .find_map(|address| registry.get(&address)?.attribute(id))
    }

    pub fn outdoor_operation_status(&self) -> Option<OutdoorOperationStatus> {
        self.outdoor_value(OUT_OPERATION_STATUS)?
            .as_i64()
            .map(OutdoorOperationStatus::from_value)
    }

    /// Unknown defrost state reads as no defrost
    pub fn defrost_step(&self) -> DefrostStep {
        self.outdoor_value(OUT_DEFROST_STEP)
            .and_then(|value| value.as_i64())
            .map_or(DefrostStep::NoDefrost, DefrostStep::from_value)
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.float(IN_ROOM_TEMPERATURE)
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.float(IN_TARGET_TEMPERATURE)
    }

    pub fn current_humidity(&self) -> Option<f64> {
        self.float(IN_CURRENT_HUMIDITY)
    }

    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }

    /// `Off` while power is off or unknown; `None` for modes without a
    /// climate equivalent
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.context.device()?;
        if !self.power().unwrap_or(false) {
            return Some(HvacMode::Off);
        }
        self.context
            .attribute(IN_OPERATION_MODE)
            .and_then(|value| value.as_i64())
            .and_then(OperationMode::from_value)
            .and_then(HvacMode::from_operation_mode)
    }

    pub fn hvac_action(&self) -> Option<HvacAction> {
        let power = self.power()?;
        let mode = self.hvac_mode()?;
        let status = self.outdoor_operation_status();
        let running = status == Some(OutdoorOperationStatus::Normal);

        if power && running && mode == HvacMode::Cool {
            return Some(HvacAction::Cooling);
        }
        if power && running && mode == HvacMode::Heat {
            return Some(HvacAction::Heating);
        }
        if status == Some(OutdoorOperationStatus::Safety) {
            return Some(HvacAction::Preheating);
        }
        if self.defrost_step().is_defrosting() {
            return Some(HvacAction::Defrosting);
        }
        if !power {
            return Some(HvacAction::Off);
        }
        Some(HvacAction::Idle)
    }

    /// Write the space heating setpoint for the current control mode
    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() {
            return Err(EntityError::InvalidValue(format!(
                "temperature {}",
                temperature
            )));
        }
        let device = self
            .context
            .device()
            .ok_or_else(|| EntityError::Unavailable(self.unique_id().to_string()))?;
        let mode = temperature_control_mode(&device).ok_or_else(|| {
            tracing::debug!("{}: temperature control mode not known yet", self.unique_id());
            EntityError::Unavailable(self.unique_id().to_string())
        })?;

        self.context
            .write(
                mode.target_message(),
                DataType::Request,
                AttributeValue::Float(temperature),
            )
            .await
    }

    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        let Some(operation_mode) = mode.operation_mode() else {
            return self.turn_off().await;
        };
        self.context
            .write(
                IN_OPERATION_MODE,
                DataType::Request,
                AttributeValue::Integer(operation_mode.value()),
            )
            .await?;
        self.turn_on().await
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.set_power(true).await
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.set_power(false).await
    }

    async fn set_power(&self, on: bool) -> Result<()> {
        self.context
            .write(IN_OPERATION_POWER, DataType::Request, AttributeValue::Bool(on))
            .await
    }
}

impl EhsEntity for Climate {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Climate
    }

    fn available(&self) -> bool {
        self.context.device().is_some()
    }

    fn state(&self) -> Option<EntityValue> {
        self.hvac_mode().map(|mode| EntityValue::from(mode.as_str()))
    }

    fn attributes(&self) -> BTreeMap<String, EntityValue> {
        let mut attributes = BTreeMap::new();
        let values = [
            ("current_temperature", self.current_temperature()),
            ("target_temperature", self.target_temperature()),
            ("current_humidity", self.current_humidity()),
        ];
        for (name, value) in values {
            if let Some(value) = value {
                attributes.insert(name.to_string(), EntityValue::Number(value));
            }
        }
        if let Some(action) = self.hvac_action() {
            attributes.insert("hvac_action".to_string(), EntityValue::from(action.as_str()));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{
        IN_FSV_2091_USE_THERMOSTAT_1, IN_FSV_2092_USE_THERMOSTAT_2,
        IN_WATER_LAW_TARGET_TEMPERATURE, IN_WATER_OUTLET_TARGET_TEMPERATURE,
    };
    use ehs_coordinator::PollingCoordinator;
    use nasa_client::mock::{MockTransport, TransportCall};
    use nasa_client::{DeviceAddress, NasaTransport};
    use std::sync::Arc;

    const INDOOR: &str = "20.00.00";
    const OUTDOOR: &str = "10.00.00";

    fn climate(mock: &Arc<MockTransport>) -> Climate {
        let coordinator = Arc::new(PollingCoordinator::with_defaults(
            Arc::clone(mock) as Arc<dyn NasaTransport>
        ));
        Climate::new(EntityContext::for_device(
            coordinator,
            "entry",
            DeviceAddress::new(INDOOR),
            Climate::KEY,
        ))
    }

    fn record(mock: &MockTransport, address: &str, id: MessageId, value: AttributeValue) {
        mock.devices()
            .record_attribute(&DeviceAddress::new(address), id, value);
    }

    #[test]
    fn test_mode_is_off_without_power() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        assert_eq!(entity.hvac_mode(), None, "no device yet");

        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(4));
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Off));
        assert_eq!(entity.hvac_action(), None, "power unknown");

        record(&mock, INDOOR, IN_OPERATION_POWER, AttributeValue::Bool(true));
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Heat));

        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(2));
        assert_eq!(entity.hvac_mode(), None, "dry has no climate mode");
    }

    #[test]
    fn test_action_uses_outdoor_unit_status() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        record(&mock, INDOOR, IN_OPERATION_POWER, AttributeValue::Bool(true));
        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(4));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Idle));

        record(&mock, OUTDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(2));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Heating));

        record(&mock, OUTDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(1));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Preheating));

        record(&mock, OUTDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(0));
        record(&mock, OUTDOOR, OUT_DEFROST_STEP, AttributeValue::Integer(2));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Defrosting));

        record(&mock, OUTDOOR, OUT_DEFROST_STEP, AttributeValue::Integer(255));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Idle));
    }

    #[test]
    fn test_relayed_status_wins_over_outdoor_unit() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        record(&mock, INDOOR, IN_OPERATION_POWER, AttributeValue::Bool(true));
        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(1));
        record(&mock, OUTDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(0));
        record(&mock, INDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(2));

        assert_eq!(entity.hvac_action(), Some(HvacAction::Cooling));
    }

    #[test]
    fn test_action_off_when_powered_down() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        record(&mock, INDOOR, IN_OPERATION_POWER, AttributeValue::Bool(false));
        record(&mock, OUTDOOR, OUT_OPERATION_STATUS, AttributeValue::Integer(2));

        assert_eq!(entity.hvac_action(), Some(HvacAction::Off));
        assert_eq!(entity.state(), Some(EntityValue::Text("off".to_string())));
    }

    #[tokio::test]
    async fn test_set_temperature_follows_control_mode() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        record(&mock, INDOOR, IN_FSV_2091_USE_THERMOSTAT_1, AttributeValue::Integer(0));
        record(&mock, INDOOR, IN_FSV_2092_USE_THERMOSTAT_2, AttributeValue::Integer(0));

        assert!(matches!(
            entity.set_temperature(35.0).await,
            Err(EntityError::Unavailable(_))
        ));

        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(4));
        entity.set_temperature(35.0).await.unwrap();
        record(&mock, INDOOR, IN_OPERATION_MODE, AttributeValue::Integer(0));
        entity.set_temperature(1.5).await.unwrap();

        let written: Vec<MessageId> = mock
            .writes()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Write { message, .. } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(
            written,
            vec![IN_WATER_OUTLET_TARGET_TEMPERATURE, IN_WATER_LAW_TARGET_TEMPERATURE]
        );
    }

    #[tokio::test]
    async fn test_set_hvac_mode_writes_mode_then_power() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        mock.devices().ensure_device(&DeviceAddress::new(INDOOR));

        entity.set_hvac_mode(HvacMode::Cool).await.unwrap();
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Cool));

        entity.set_hvac_mode(HvacMode::Off).await.unwrap();
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Off));

        let writes = mock.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(
            writes[0],
            TransportCall::Write {
                address: DeviceAddress::new(INDOOR),
                message: IN_OPERATION_MODE,
                value: AttributeValue::Integer(1),
                kind: DataType::Request,
            }
        );
    }

    #[test]
    fn test_attributes() {
        let mock = Arc::new(MockTransport::connected());
        let entity = climate(&mock);
        record(&mock, INDOOR, IN_ROOM_TEMPERATURE, AttributeValue::Float(21.5));
        record(&mock, INDOOR, IN_TARGET_TEMPERATURE, AttributeValue::Float(22.0));

        let attributes = entity.attributes();
        assert_eq!(attributes.get("current_temperature"), Some(&EntityValue::Number(21.5)));
        assert_eq!(attributes.get("target_temperature"), Some(&EntityValue::Number(22.0)));
        assert!(!attributes.contains_key("current_humidity"));
    }
}
