//! Integration tests for building and attaching an entry's entities.

use ehs_coordinator::PollingCoordinator;
use ehs_entities::messages::{
    IN_DHW_CURRENT_TEMPERATURE, IN_DHW_TARGET_TEMPERATURE, IN_FLOW_TEMPERATURE,
    IN_FREQUENCY_RATIO_CONTROL, IN_QUIET_MODE, OUT_COMPRESSOR_TARGET_FREQUENCY, OUT_FAN_RPM,
    OUT_TOP_SENSOR_TEMPERATURE_1,
};
use ehs_entities::{setup_entities, EntityValue, StateListener};
use nasa_client::mock::MockTransport;
use nasa_client::{AttributeValue, DeviceAddress, MessageId, NasaTransport};
use parking_lot::Mutex;
use std::sync::Arc;

fn setup() -> (Arc<MockTransport>, Arc<PollingCoordinator>) {
    let mock = Arc::new(MockTransport::connected());
    let coordinator = Arc::new(PollingCoordinator::with_defaults(
        Arc::clone(&mock) as Arc<dyn NasaTransport>
    ));
    (mock, coordinator)
}

fn recording_listener() -> (StateListener, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: StateListener = Arc::new(move |unique_id: &str| {
        sink.lock().push(unique_id.to_string());
    });
    (listener, seen)
}

#[tokio::test]
async fn test_attached_entities_drive_the_read_worklist() {
    let (mock, coordinator) = setup();
    let outdoor = DeviceAddress::new("10.00.00");
    let indoor = DeviceAddress::new("20.00.00");

    let entities = setup_entities(&coordinator, "entry", &[outdoor.clone(), indoor.clone()]);
    entities.attach_all(Arc::new(|_: &str| {}));

    let worklist = coordinator.read_worklist();
    assert_eq!(
        worklist,
        vec![
            (
                outdoor.clone(),
                vec![OUT_TOP_SENSOR_TEMPERATURE_1, OUT_COMPRESSOR_TARGET_FREQUENCY, OUT_FAN_RPM]
            ),
            (
                indoor.clone(),
                vec![
                    IN_DHW_TARGET_TEMPERATURE,
                    IN_DHW_CURRENT_TEMPERATURE,
                    IN_FLOW_TEMPERATURE,
                    IN_QUIET_MODE,
                    IN_FREQUENCY_RATIO_CONTROL,
                ]
            ),
        ]
    );

    coordinator.refresh().await.unwrap();
    assert_eq!(mock.read_batches_for(&outdoor).len(), 1);
    assert_eq!(mock.read_batches_for(&indoor).len(), 1);
}

#[tokio::test]
async fn test_device_changes_reach_the_listener() {
    let (mock, coordinator) = setup();
    let indoor = DeviceAddress::new("20.00.00");
    mock.devices().ensure_device(&indoor);

    let entities = setup_entities(&coordinator, "entry", &[indoor.clone()]);
    let (listener, seen) = recording_listener();
    entities.attach_all(listener);

    mock.devices()
        .record_attribute(&indoor, IN_FLOW_TEMPERATURE, AttributeValue::Float(31.0));

    let seen = seen.lock().clone();
    let expected = entities.for_device(&indoor).count();
    assert_eq!(seen.len(), expected);
    assert!(seen.contains(&"entry_20.00.00_indoor_flow_temperature".to_string()));

    let flow = entities
        .get("entry_20.00.00_indoor_flow_temperature")
        .unwrap();
    assert_eq!(flow.state(), Some(EntityValue::Number(31.0)));
}

#[tokio::test]
async fn test_detach_stops_notifications() {
    let (mock, coordinator) = setup();
    let outdoor = DeviceAddress::new("10.00.00");
    let device = mock.devices().ensure_device(&outdoor);

    let entities = setup_entities(&coordinator, "entry", &[outdoor.clone()]);
    let (listener, seen) = recording_listener();
    entities.attach_all(listener);
    assert!(device.callback_count() > 0);

    entities.detach_all();
    assert_eq!(device.callback_count(), 0);

    mock.devices()
        .record_attribute(&outdoor, MessageId::new(0x8280), AttributeValue::Float(3.0));
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_polled_values_show_up_in_entities() {
    let (mock, coordinator) = setup();
    let indoor = DeviceAddress::new("20.00.00");
    mock.set_response(&indoor, IN_QUIET_MODE, AttributeValue::Bool(true));

    let entities = setup_entities(&coordinator, "entry", &[indoor.clone()]);
    entities.attach_all(Arc::new(|_: &str| {}));
    coordinator.refresh().await.unwrap();

    let quiet = entities.get("entry_20.00.00_quiet_mode").unwrap();
    assert!(quiet.available());
    assert_eq!(quiet.state(), Some(EntityValue::Bool(true)));
}
