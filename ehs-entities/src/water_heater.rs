//! Domestic hot water entity

use nasa_client::{AttributeValue, DataType};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::context::EntityContext;
use crate::enums::DhwOpMode;
use crate::error::{EntityError, Result};
use crate::extractor::EntityValue;
use crate::messages::{
    IN_DHW_CURRENT_TEMPERATURE, IN_DHW_TARGET_TEMPERATURE, IN_WATER_HEATER_MODE,
    IN_WATER_HEATER_POWER,
};
use crate::platform::{EhsEntity, Platform};

/// Operation offered by the water heater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterHeaterOperation {
    Off,
    Eco,
    HeatPump,
    Performance,
    Electric,
}

impl WaterHeaterOperation {
    pub const ALL: [WaterHeaterOperation; 5] = [
        WaterHeaterOperation::Off,
        WaterHeaterOperation::Eco,
        WaterHeaterOperation::HeatPump,
        WaterHeaterOperation::Performance,
        WaterHeaterOperation::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterHeaterOperation::Off => "off",
            WaterHeaterOperation::Eco => "eco",
            WaterHeaterOperation::HeatPump => "heat_pump",
            WaterHeaterOperation::Performance => "performance",
            WaterHeaterOperation::Electric => "electric",
        }
    }

    fn from_dhw_mode(mode: DhwOpMode) -> Self {
        match mode {
            DhwOpMode::Eco => WaterHeaterOperation::Eco,
            DhwOpMode::Standard => WaterHeaterOperation::HeatPump,
            DhwOpMode::Power => WaterHeaterOperation::Performance,
            DhwOpMode::Force => WaterHeaterOperation::Electric,
        }
    }

    fn dhw_mode(&self) -> Option<DhwOpMode> {
        match self {
            WaterHeaterOperation::Off => None,
            WaterHeaterOperation::Eco => Some(DhwOpMode::Eco),
            WaterHeaterOperation::HeatPump => Some(DhwOpMode::Standard),
            WaterHeaterOperation::Performance => Some(DhwOpMode::Power),
            WaterHeaterOperation::Electric => Some(DhwOpMode::Force),
        }
    }
}

impl fmt::Display for WaterHeaterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaterHeaterOperation {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|operation| operation.as_str() == s)
            .ok_or_else(|| EntityError::InvalidOption(format!("water heater operation {}", s)))
    }
}

#[derive(Debug)]
pub struct WaterHeater {
    context: EntityContext,
}

impl WaterHeater {
    pub const KEY: &'static str = "dhw";
    pub const NAME: &'static str = "Hot Water";

    pub fn new(context: EntityContext) -> Self {
        Self { context }
    }

    pub fn operation_list(&self) -> &'static [WaterHeaterOperation] {
        &WaterHeaterOperation::ALL
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.context
            .attribute(IN_DHW_CURRENT_TEMPERATURE)
            .and_then(|value| value.as_f64())
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.context
            .attribute(IN_DHW_TARGET_TEMPERATURE)
            .and_then(|value| value.as_f64())
    }

    /// `Off` unless power is on and the mode is known
    pub fn current_operation(&self) -> WaterHeaterOperation {
        let power = self
            .context
            .attribute(IN_WATER_HEATER_POWER)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        let mode = self
            .context
            .attribute(IN_WATER_HEATER_MODE)
            .and_then(|value| value.as_i64())
            .and_then(DhwOpMode::from_value);

        match mode {
            Some(mode) if power => WaterHeaterOperation::from_dhw_mode(mode),
            _ => WaterHeaterOperation::Off,
        }
    }

    /// Power on, then switch mode; `Off` only powers down
    pub async fn set_operation_mode(&self, operation: WaterHeaterOperation) -> Result<()> {
        let Some(mode) = operation.dhw_mode() else {
            return self.turn_off().await;
        };
        self.turn_on().await?;
        self.context
            .write(
                IN_WATER_HEATER_MODE,
                DataType::Request,
                AttributeValue::Integer(mode.value()),
            )
            .await
    }

    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() {
            return Err(EntityError::InvalidValue(format!(
                "temperature {}",
                temperature
            )));
        }
        self.context
            .write(
                IN_DHW_TARGET_TEMPERATURE,
                DataType::Request,
                AttributeValue::Float(temperature),
            )
            .await
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.context
            .write(IN_WATER_HEATER_POWER, DataType::Request, AttributeValue::Bool(true))
            .await
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.context
            .write(IN_WATER_HEATER_POWER, DataType::Request, AttributeValue::Bool(false))
            .await
    }
}

impl EhsEntity for WaterHeater {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::WaterHeater
    }

    fn available(&self) -> bool {
        self.context.device().is_some()
    }

    fn state(&self) -> Option<EntityValue> {
        self.context.device()?;
        Some(EntityValue::from(self.current_operation().as_str()))
    }

    fn attributes(&self) -> BTreeMap<String, EntityValue> {
        let mut attributes = BTreeMap::new();
        if let Some(current) = self.current_temperature() {
            attributes.insert("current_temperature".to_string(), EntityValue::Number(current));
        }
        if let Some(target) = self.target_temperature() {
            attributes.insert("target_temperature".to_string(), EntityValue::Number(target));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehs_coordinator::PollingCoordinator;
    use nasa_client::mock::{MockTransport, TransportCall};
    use nasa_client::{DeviceAddress, MessageId, NasaTransport};
    use rstest::rstest;
    use std::sync::Arc;

    fn water_heater(mock: &Arc<MockTransport>) -> WaterHeater {
        let coordinator = Arc::new(PollingCoordinator::with_defaults(
            Arc::clone(mock) as Arc<dyn NasaTransport>
        ));
        WaterHeater::new(EntityContext::for_device(
            coordinator,
            "entry",
            DeviceAddress::new("20.00.00"),
            WaterHeater::KEY,
        ))
    }

    fn record(mock: &MockTransport, id: MessageId, value: AttributeValue) {
        mock.devices()
            .record_attribute(&DeviceAddress::new("20.00.00"), id, value);
    }

    #[rstest]
    #[case(0, WaterHeaterOperation::Eco)]
    #[case(1, WaterHeaterOperation::HeatPump)]
    #[case(2, WaterHeaterOperation::Performance)]
    #[case(3, WaterHeaterOperation::Electric)]
    fn test_operation_from_mode(#[case] mode: i64, #[case] expected: WaterHeaterOperation) {
        let mock = Arc::new(MockTransport::connected());
        let entity = water_heater(&mock);
        record(&mock, IN_WATER_HEATER_POWER, AttributeValue::Bool(true));
        record(&mock, IN_WATER_HEATER_MODE, AttributeValue::Integer(mode));
        assert_eq!(entity.current_operation(), expected);
    }

    #[test]
    fn test_operation_off_when_power_or_mode_missing() {
        let mock = Arc::new(MockTransport::connected());
        let entity = water_heater(&mock);
        assert_eq!(entity.state(), None);

        record(&mock, IN_WATER_HEATER_MODE, AttributeValue::Integer(1));
        assert_eq!(entity.current_operation(), WaterHeaterOperation::Off);

        record(&mock, IN_WATER_HEATER_POWER, AttributeValue::Bool(false));
        assert_eq!(entity.state(), Some(EntityValue::Text("off".to_string())));
    }

    #[tokio::test]
    async fn test_set_operation_mode_powers_on_first() {
        let mock = Arc::new(MockTransport::connected());
        let entity = water_heater(&mock);
        mock.devices().ensure_device(&DeviceAddress::new("20.00.00"));

        entity
            .set_operation_mode("performance".parse().unwrap())
            .await
            .unwrap();

        let written: Vec<(MessageId, AttributeValue)> = mock
            .writes()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Write { message, value, .. } => Some((message, value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            written,
            vec![
                (IN_WATER_HEATER_POWER, AttributeValue::Bool(true)),
                (IN_WATER_HEATER_MODE, AttributeValue::Integer(2)),
            ]
        );
        assert_eq!(entity.current_operation(), WaterHeaterOperation::Performance);

        entity.set_operation_mode(WaterHeaterOperation::Off).await.unwrap();
        assert_eq!(entity.current_operation(), WaterHeaterOperation::Off);
        assert_eq!(mock.writes().len(), 3);
    }

    #[test]
    fn test_unknown_operation_name() {
        assert!(matches!(
            "boost".parse::<WaterHeaterOperation>(),
            Err(EntityError::InvalidOption(_))
        ));
    }

    #[tokio::test]
    async fn test_set_temperature() {
        let mock = Arc::new(MockTransport::connected());
        let entity = water_heater(&mock);
        mock.devices().ensure_device(&DeviceAddress::new("20.00.00"));

        entity.set_temperature(50.0).await.unwrap();

        assert_eq!(entity.target_temperature(), Some(50.0));
        assert_eq!(entity.attributes().get("target_temperature"), Some(&EntityValue::Number(50.0)));
    }
}
