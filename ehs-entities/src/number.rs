//! Numeric setpoints

use nasa_client::{AttributeValue, DataType, MessageId};

use crate::context::{EntityContext, PollMode};
use crate::error::{EntityError, Result};
use crate::extractor::{EntityValue, ValueExtractor};
use crate::messages::{IN_FREQUENCY_RATIO_CONTROL, IN_FSV_5051_FREQUENCY_RATIO_CONTROL};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy)]
pub struct NumberDescription {
    pub key: &'static str,
    pub message: MessageId,
    /// Structure field holding the value, when the message is structured
    pub field: Option<&'static str>,
    pub poll_mode: PollMode,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: Option<&'static str>,
    /// Setting that must be enabled for the number to be usable
    pub enabled_by: Option<MessageId>,
}

impl NumberDescription {
    fn extractor(&self) -> ValueExtractor {
        match self.field {
            Some(field) => ValueExtractor::AttributeField {
                id: self.message,
                field,
            },
            None => ValueExtractor::Attribute(self.message),
        }
    }
}

pub const INDOOR_NUMBERS: &[NumberDescription] = &[NumberDescription {
    key: "frequency_ratio_control_percent",
    message: IN_FREQUENCY_RATIO_CONTROL,
    field: Some("frequency_ratio_percent"),
    poll_mode: PollMode::Continuous,
    min: 50.0,
    max: 150.0,
    step: 10.0,
    unit: Some("%"),
    enabled_by: Some(IN_FSV_5051_FREQUENCY_RATIO_CONTROL),
}];

#[derive(Debug)]
pub struct Number {
    context: EntityContext,
    description: &'static NumberDescription,
}

impl Number {
    pub fn new(context: EntityContext, description: &'static NumberDescription) -> Self {
        Self {
            context: context.with_message(Some(description.message), description.poll_mode),
            description,
        }
    }

    pub fn description(&self) -> &'static NumberDescription {
        self.description
    }

    pub fn value(&self) -> Option<f64> {
        self.description
            .extractor()
            .extract(&self.context)
            .and_then(|value| value.as_f64())
    }

    pub async fn set_value(&self, value: f64) -> Result<()> {
        let description = self.description;
        if !value.is_finite() || value < description.min || value > description.max {
            return Err(EntityError::InvalidValue(format!(
                "{} must be between {} and {}, got {}",
                description.key, description.min, description.max, value
            )));
        }
        let steps = (value - description.min) / description.step;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(EntityError::InvalidValue(format!(
                "{} must be a multiple of {} from {}, got {}",
                description.key, description.step, description.min, value
            )));
        }
        if !self.available() {
            return Err(EntityError::Unavailable(self.unique_id().to_string()));
        }

        // The device takes whole percent; fractions are dropped
        let raw = AttributeValue::Integer(value.trunc() as i64);
        let payload = match description.field {
            Some(field) => AttributeValue::structure(field, raw),
            None => raw,
        };
        self.context
            .write(description.message, DataType::Request, payload)
            .await
    }
}

impl EhsEntity for Number {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Number
    }

    fn available(&self) -> bool {
        if !self.context.coordinator_available() || self.context.device().is_none() {
            return false;
        }
        match self.description.enabled_by {
            Some(setting) => self
                .context
                .attribute(setting)
                .is_some_and(|value| value.is_truthy()),
            None => true,
        }
    }

    fn state(&self) -> Option<EntityValue> {
        self.value().map(EntityValue::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehs_coordinator::PollingCoordinator;
    use nasa_client::mock::{MockTransport, TransportCall};
    use nasa_client::{DeviceAddress, NasaTransport};
    use std::sync::Arc;

    async fn ready_number(mock: &Arc<MockTransport>) -> Number {
        let coordinator = Arc::new(PollingCoordinator::with_defaults(
            Arc::clone(mock) as Arc<dyn NasaTransport>
        ));
        coordinator.refresh().await.unwrap();
        Number::new(
            EntityContext::for_device(
                coordinator,
                "entry",
                DeviceAddress::new("20.00.00"),
                "frequency_ratio_control_percent",
            ),
            &INDOOR_NUMBERS[0],
        )
    }

    #[tokio::test]
    async fn test_available_only_when_setting_enabled() {
        let mock = Arc::new(MockTransport::connected());
        let number = ready_number(&mock).await;
        let address = DeviceAddress::new("20.00.00");

        mock.devices().ensure_device(&address);
        assert!(!number.available());

        mock.devices().record_attribute(
            &address,
            IN_FSV_5051_FREQUENCY_RATIO_CONTROL,
            AttributeValue::Integer(0),
        );
        assert!(!number.available());

        mock.devices().record_attribute(
            &address,
            IN_FSV_5051_FREQUENCY_RATIO_CONTROL,
            AttributeValue::Integer(1),
        );
        assert!(number.available());
    }

    #[tokio::test]
    async fn test_set_value_writes_structure() {
        let mock = Arc::new(MockTransport::connected());
        let number = ready_number(&mock).await;
        let address = DeviceAddress::new("20.00.00");
        mock.devices().record_attribute(
            &address,
            IN_FSV_5051_FREQUENCY_RATIO_CONTROL,
            AttributeValue::Bool(true),
        );

        number.set_value(120.0).await.unwrap();

        let expected =
            AttributeValue::structure("frequency_ratio_percent", AttributeValue::Integer(120));
        assert_eq!(
            mock.writes(),
            vec![TransportCall::Write {
                address,
                message: IN_FREQUENCY_RATIO_CONTROL,
                value: expected,
                kind: DataType::Request,
            }]
        );
        assert_eq!(number.value(), Some(120.0));
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_rejected() {
        let mock = Arc::new(MockTransport::connected());
        let number = ready_number(&mock).await;

        for value in [40.0, 160.0, f64::NAN, 55.0, 121.0] {
            assert!(matches!(
                number.set_value(value).await,
                Err(EntityError::InvalidValue(_))
            ));
        }
        assert!(mock.writes().is_empty());
    }
}
