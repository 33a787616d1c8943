//! In-memory transport for tests
//!
//! Records every call in order and can be told to drop the connection, fail
//! reconnects or fail specific reads. Reads answer from a configurable value
//! table by recording into the device registry, like a real gateway would.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::address::DeviceAddress;
use crate::device::DeviceRegistry;
use crate::error::{Result, TransportError};
use crate::message::{AttributeValue, DataType, MessageId};
use crate::transport::{validate_batch, NasaTransport};

/// One call made against the mock, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Connect,
    Disconnect,
    Read {
        address: DeviceAddress,
        messages: Vec<MessageId>,
    },
    Write {
        address: DeviceAddress,
        message: MessageId,
        value: AttributeValue,
        kind: DataType,
    },
}

/// Mock transport that never touches the network
#[derive(Default)]
pub struct MockTransport {
    registry: DeviceRegistry,
    connected: AtomicBool,
    fail_connect: AtomicBool,
    fail_all_reads: AtomicBool,
    failing_read_calls: Mutex<HashSet<usize>>,
    read_calls: AtomicUsize,
    responses: Mutex<HashMap<(DeviceAddress, MessageId), AttributeValue>>,
    calls: Mutex<Vec<TransportCall>>,
}

impl MockTransport {
    /// A mock that starts out connected
    pub fn connected() -> Self {
        let mock = Self::default();
        mock.connected.store(true, Ordering::SeqCst);
        mock
    }

    /// A mock that starts out disconnected
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make every `connect()` fail
    pub fn set_fail_connect(&self, should_fail: bool) {
        self.fail_connect.store(should_fail, Ordering::SeqCst);
    }

    /// Make every read fail
    pub fn set_fail_reads(&self, should_fail: bool) {
        self.fail_all_reads.store(should_fail, Ordering::SeqCst);
    }

    /// Make the n-th read call (1-based, counted over the mock's lifetime) fail
    pub fn fail_read_call(&self, n: usize) {
        self.failing_read_calls.lock().insert(n);
    }

    /// Value a device reports when the given message is read
    pub fn set_response(&self, address: &DeviceAddress, message: MessageId, value: AttributeValue) {
        self.responses.lock().insert((address.clone(), message), value);
    }

    /// All calls so far
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    /// Read batches so far, in order
    pub fn read_batches(&self) -> Vec<(DeviceAddress, Vec<MessageId>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::Read { address, messages } => {
                    Some((address.clone(), messages.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Read batches for one device, in order
    pub fn read_batches_for(&self, address: &DeviceAddress) -> Vec<Vec<MessageId>> {
        self.read_batches()
            .into_iter()
            .filter(|(a, _)| a == address)
            .map(|(_, messages)| messages)
            .collect()
    }

    pub fn connect_attempts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, TransportCall::Connect))
            .count()
    }

    pub fn writes(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, TransportCall::Write { .. }))
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl NasaTransport for MockTransport {
    async fn connect(&self) -> Result<()> {
        self.calls.lock().push(TransportCall::Connect);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionFailed(
                "mock connect failure".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.calls.lock().push(TransportCall::Disconnect);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn read_attributes(&self, address: &DeviceAddress, messages: &[MessageId]) -> Result<()> {
        validate_batch(messages)?;
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        let call_number = self.read_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().push(TransportCall::Read {
            address: address.clone(),
            messages: messages.to_vec(),
        });

        if self.fail_all_reads.load(Ordering::SeqCst)
            || self.failing_read_calls.lock().contains(&call_number)
        {
            return Err(TransportError::Timeout {
                address: address.clone(),
                message: messages[0],
            });
        }

        let answers: Vec<(MessageId, AttributeValue)> = {
            let responses = self.responses.lock();
            messages
                .iter()
                .filter_map(|message| {
                    responses
                        .get(&(address.clone(), *message))
                        .map(|value| (*message, value.clone()))
                })
                .collect()
        };
        for (message, value) in answers {
            self.registry.record_attribute(address, message, value);
        }

        Ok(())
    }

    async fn write_attribute(
        &self,
        address: &DeviceAddress,
        message: MessageId,
        value: AttributeValue,
        kind: DataType,
    ) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.calls.lock().push(TransportCall::Write {
            address: address.clone(),
            message,
            value: value.clone(),
            kind,
        });
        self.registry.record_attribute(address, message, value);
        Ok(())
    }

    fn devices(&self) -> &DeviceRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let mock = MockTransport::disconnected();
        let address = DeviceAddress::new("20.00.00");

        mock.connect().await.unwrap();
        mock.read_attributes(&address, &[MessageId::new(1), MessageId::new(2)])
            .await
            .unwrap();
        mock.write_attribute(&address, MessageId::new(3), true.into(), DataType::Write)
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], TransportCall::Connect);
        assert!(matches!(calls[1], TransportCall::Read { .. }));
        assert!(matches!(calls[2], TransportCall::Write { kind: DataType::Write, .. }));
    }

    #[tokio::test]
    async fn test_mock_answers_reads_from_response_table() {
        let mock = MockTransport::connected();
        let address = DeviceAddress::new("20.00.00");
        mock.set_response(&address, MessageId::new(0x4237), AttributeValue::Float(45.5));

        mock.read_attributes(&address, &[MessageId::new(0x4237), MessageId::new(0x4238)])
            .await
            .unwrap();

        let device = mock.devices().get(&address).unwrap();
        assert_eq!(
            device.attribute(MessageId::new(0x4237)),
            Some(AttributeValue::Float(45.5))
        );
        assert!(!device.has_attribute(MessageId::new(0x4238)));
    }

    #[tokio::test]
    async fn test_mock_fails_selected_read_call() {
        let mock = MockTransport::connected();
        let address = DeviceAddress::new("A");
        mock.fail_read_call(2);

        assert!(mock.read_attributes(&address, &[MessageId::new(1)]).await.is_ok());
        assert!(mock.read_attributes(&address, &[MessageId::new(2)]).await.is_err());
        assert!(mock.read_attributes(&address, &[MessageId::new(3)]).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_connect_failure_leaves_disconnected() {
        let mock = MockTransport::disconnected();
        mock.set_fail_connect(true);

        assert!(mock.connect().await.is_err());
        assert!(!mock.is_connected());
        assert_eq!(mock.connect_attempts(), 1);
    }

    #[tokio::test]
    async fn test_mock_rejects_oversized_batch() {
        let mock = MockTransport::connected();
        let batch: Vec<MessageId> = (0..11).map(MessageId::new).collect();
        let result = mock.read_attributes(&DeviceAddress::new("A"), &batch).await;
        assert!(matches!(result, Err(TransportError::BatchTooLarge { .. })));
        assert!(mock.read_batches().is_empty());
    }
}
