//! On/off switches for indoor unit modes

use nasa_client::{AttributeValue, DataType, MessageId};

use crate::context::{EntityContext, PollMode};
use crate::error::Result;
use crate::extractor::EntityValue;
use crate::messages::{IN_OUTING_MODE, IN_QUIET_MODE};
use crate::platform::{EhsEntity, Platform};

#[derive(Debug, Clone, Copy)]
pub struct SwitchDescription {
    pub key: &'static str,
    pub message: MessageId,
    pub poll_mode: PollMode,
    pub on_state: bool,
    pub off_state: bool,
}

pub const INDOOR_SWITCHES: &[SwitchDescription] = &[
    SwitchDescription {
        key: "outing_mode",
        message: IN_OUTING_MODE,
        poll_mode: PollMode::Passive,
        on_state: true,
        off_state: false,
    },
    SwitchDescription {
        key: "quiet_mode",
        message: IN_QUIET_MODE,
        poll_mode: PollMode::Continuous,
        on_state: true,
        off_state: false,
    },
];

#[derive(Debug)]
pub struct Switch {
    context: EntityContext,
    description: &'static SwitchDescription,
}

impl Switch {
    pub fn new(context: EntityContext, description: &'static SwitchDescription) -> Self {
        Self {
            context: context.with_message(Some(description.message), description.poll_mode),
            description,
        }
    }

    /// `None` until the device has reported the mode
    pub fn is_on(&self) -> Option<bool> {
        let value = self.context.attribute(self.description.message)?;
        value.as_bool().map(|state| state == self.description.on_state)
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.write_state(self.description.on_state).await
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.write_state(self.description.off_state).await
    }

    async fn write_state(&self, state: bool) -> Result<()> {
        self.context
            .write(self.description.message, DataType::Write, AttributeValue::Bool(state))
            .await
    }
}

impl EhsEntity for Switch {
    fn context(&self) -> &EntityContext {
        &self.context
    }

    fn platform(&self) -> Platform {
        Platform::Switch
    }

    fn available(&self) -> bool {
        self.context.coordinator_available() && self.context.device().is_some()
    }

    fn state(&self) -> Option<EntityValue> {
        self.is_on().map(EntityValue::Bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityError;
    use ehs_coordinator::PollingCoordinator;
    use nasa_client::mock::{MockTransport, TransportCall};
    use nasa_client::{DeviceAddress, NasaTransport};
    use std::sync::Arc;

    fn quiet_mode(mock: &Arc<MockTransport>) -> Switch {
        let coordinator = Arc::new(PollingCoordinator::with_defaults(
            Arc::clone(mock) as Arc<dyn NasaTransport>
        ));
        Switch::new(
            EntityContext::for_device(coordinator, "entry", DeviceAddress::new("20.00.00"), "quiet_mode"),
            &INDOOR_SWITCHES[1],
        )
    }

    #[tokio::test]
    async fn test_turn_on_writes_bool() {
        let mock = Arc::new(MockTransport::connected());
        let switch = quiet_mode(&mock);
        let address = DeviceAddress::new("20.00.00");
        mock.devices().ensure_device(&address);
        assert_eq!(switch.is_on(), None);

        switch.turn_on().await.unwrap();

        assert_eq!(
            mock.writes(),
            vec![TransportCall::Write {
                address,
                message: IN_QUIET_MODE,
                value: AttributeValue::Bool(true),
                kind: DataType::Write,
            }]
        );
        assert_eq!(switch.is_on(), Some(true));

        switch.turn_off().await.unwrap();
        assert_eq!(switch.is_on(), Some(false));
    }

    #[tokio::test]
    async fn test_integer_state_is_decoded() {
        let mock = Arc::new(MockTransport::connected());
        let switch = quiet_mode(&mock);
        mock.devices().record_attribute(
            &DeviceAddress::new("20.00.00"),
            IN_QUIET_MODE,
            AttributeValue::Integer(1),
        );
        assert_eq!(switch.state(), Some(EntityValue::Bool(true)));
    }

    #[tokio::test]
    async fn test_command_without_device_is_rejected() {
        let mock = Arc::new(MockTransport::connected());
        let switch = quiet_mode(&mock);

        assert!(matches!(switch.turn_on().await, Err(EntityError::Unavailable(_))));
        assert!(mock.writes().is_empty());
    }
}
