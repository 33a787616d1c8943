//! Per-device lists of messages awaiting an active read
//!
//! A worklist only ever grows through [`Worklist::push`]; readers take a
//! snapshot (or drain it wholesale) and iterate the copy, so registrations
//! that race with an in-flight refresh are simply picked up next cycle.

use nasa_client::{DeviceAddress, MessageId, MAX_BATCH_SIZE};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Device address to messages, iterated in address order
#[derive(Debug, Default)]
pub struct Worklist {
    entries: Mutex<BTreeMap<DeviceAddress, Vec<MessageId>>>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message for a device. Duplicates are kept.
    pub fn push(&self, address: &DeviceAddress, message: MessageId) {
        self.entries
            .lock()
            .entry(address.clone())
            .or_default()
            .push(message);
    }

    /// Append several messages for a device
    pub fn extend(&self, address: &DeviceAddress, messages: &[MessageId]) {
        if messages.is_empty() {
            return;
        }
        self.entries
            .lock()
            .entry(address.clone())
            .or_default()
            .extend_from_slice(messages);
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<(DeviceAddress, Vec<MessageId>)> {
        self.entries
            .lock()
            .iter()
            .map(|(address, messages)| (address.clone(), messages.clone()))
            .collect()
    }

    /// Remove and return everything
    pub fn take(&self) -> Vec<(DeviceAddress, Vec<MessageId>)> {
        std::mem::take(&mut *self.entries.lock()).into_iter().collect()
    }

    pub fn messages_for(&self, address: &DeviceAddress) -> Vec<MessageId> {
        self.entries
            .lock()
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of queued messages across all devices
    pub fn len(&self) -> usize {
        self.entries.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn device_count(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Split a message list into read batches of at most `max_batch_size`
///
/// The size is clamped to `1..=MAX_BATCH_SIZE`.
pub fn batches(messages: &[MessageId], max_batch_size: usize) -> std::slice::Chunks<'_, MessageId> {
    messages.chunks(max_batch_size.clamp(1, MAX_BATCH_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<u16>) -> Vec<MessageId> {
        range.map(MessageId::new).collect()
    }

    #[test]
    fn test_push_keeps_duplicates_and_order() {
        let worklist = Worklist::new();
        let address = DeviceAddress::new("20.00.00");
        worklist.push(&address, MessageId::new(0x4235));
        worklist.push(&address, MessageId::new(0x406E));
        worklist.push(&address, MessageId::new(0x4235));

        assert_eq!(
            worklist.messages_for(&address),
            vec![MessageId::new(0x4235), MessageId::new(0x406E), MessageId::new(0x4235)]
        );
        assert_eq!(worklist.len(), 3);
        assert_eq!(worklist.device_count(), 1);
    }

    #[test]
    fn test_snapshot_leaves_contents_take_drains() {
        let worklist = Worklist::new();
        worklist.extend(&DeviceAddress::new("B"), &ids(1..3));
        worklist.extend(&DeviceAddress::new("A"), &ids(5..6));

        let snapshot = worklist.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].0.as_str(), "a");
        assert_eq!(worklist.len(), 3);

        let taken = worklist.take();
        assert_eq!(taken, snapshot);
        assert!(worklist.is_empty());
        assert_eq!(worklist.device_count(), 0);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_pushes() {
        let worklist = Worklist::new();
        let address = DeviceAddress::new("A");
        worklist.push(&address, MessageId::new(1));

        let snapshot = worklist.snapshot();
        worklist.push(&address, MessageId::new(2));

        assert_eq!(snapshot[0].1, vec![MessageId::new(1)]);
        assert_eq!(worklist.messages_for(&address).len(), 2);
    }

    #[test]
    fn test_batches_split_at_limit() {
        let messages = ids(1..38);
        let sizes: Vec<usize> = batches(&messages, 10).map(<[MessageId]>::len).collect();
        assert_eq!(sizes, vec![10, 10, 10, 7]);
    }

    #[test]
    fn test_batches_clamp_size() {
        let messages = ids(0..25);
        assert_eq!(batches(&messages, 0).count(), 25);
        assert_eq!(batches(&messages, 50).count(), 3);
        assert_eq!(batches(&[], 10).count(), 0);
    }
}
