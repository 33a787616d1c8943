//! Integration tests for addressing and the device registry.

use nasa_client::{AddressClass, AttributeValue, DeviceAddress, DeviceRegistry, MessageId};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[rstest]
#[case("10.00.00", Some(AddressClass::Outdoor))]
#[case("11.00.00", Some(AddressClass::HydroUnit))]
#[case("20.00.00", Some(AddressClass::Indoor))]
#[case("20.00.03", Some(AddressClass::Indoor))]
#[case("50.00.00", Some(AddressClass::WiredRemote))]
#[case("62.00.ff", Some(AddressClass::WifiKit))]
#[case("B0.FF.20", Some(AddressClass::Other(0xb0)))]
#[case("outdoor", None)]
#[case("", None)]
fn test_address_classification(#[case] raw: &str, #[case] expected: Option<AddressClass>) {
    assert_eq!(DeviceAddress::new(raw).class(), expected);
}

#[test]
fn test_callbacks_follow_registry_updates() {
    let registry = DeviceRegistry::new();
    let address = DeviceAddress::new("20.00.00");
    let device = registry.ensure_device(&address);

    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    let id = device.add_device_callback(Arc::new(move |changed: &DeviceAddress, message: MessageId| {
        assert_eq!(changed.as_str(), "20.00.00");
        assert_eq!(message, MessageId::new(0x4238));
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    registry.record_attribute(&address, MessageId::new(0x4238), AttributeValue::Float(35.0));
    registry.record_attribute(&address, MessageId::new(0x4238), AttributeValue::Float(35.5));
    assert_eq!(changes.load(Ordering::SeqCst), 2);

    device.remove_device_callback(id);
    registry.record_attribute(&address, MessageId::new(0x4238), AttributeValue::Float(36.0));
    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert_eq!(
        registry.get(&address).unwrap().attribute(MessageId::new(0x4238)),
        Some(AttributeValue::Float(36.0))
    );
}

#[test]
fn test_registry_shares_device_handles() {
    let registry = DeviceRegistry::new();
    let address = DeviceAddress::new("10.00.00");

    let first = registry.ensure_device(&address);
    let second = registry.ensure_device(&DeviceAddress::new("10.00.00"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert!(!registry.is_empty());
}
