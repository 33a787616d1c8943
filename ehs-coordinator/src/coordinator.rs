//! Polling coordinator
//!
//! Most values on the NASA bus arrive unsolicited, but some are only ever
//! sent in answer to a read. Entities declare those when they attach; the
//! coordinator reads them back every cycle in batches of at most ten per
//! device, one request at a time since the bus is half-duplex.
//!
//! A separate bootstrap worklist holds configuration values that only need
//! reading once, on the first cycle that finds the transport connected.

use nasa_client::{AttributeValue, DataType, DeviceAddress, DeviceRegistry, MessageId, NasaTransport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::CoordinatorConfig;
use crate::error::{CoordinatorError, Result};
use crate::worklist::{batches, Worklist};

/// Lifecycle of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
    /// No refresh has run yet
    Uninitialized,
    /// Bootstrap reads are still pending
    Bootstrapping,
    /// Bootstrap done; every cycle re-reads the read worklist
    SteadyState,
}

/// What a successful refresh did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The transport was down and could not be reconnected; nothing was sent
    Skipped,
    /// All batches were sent
    Completed {
        /// Read requests issued this cycle
        batches: usize,
        /// Messages covered by those requests
        attributes: usize,
    },
}

/// Counters kept across refresh cycles
#[derive(Debug, Clone, Default)]
pub struct CoordinatorStats {
    pub cycles: u64,
    pub skipped_cycles: u64,
    pub failed_cycles: u64,
    pub batches_sent: u64,
    pub attributes_read: u64,
    pub last_update_success: bool,
    pub last_refresh: Option<SystemTime>,
}

#[derive(Debug, Default)]
struct CycleTally {
    batches: usize,
    attributes: usize,
}

impl CycleTally {
    fn record(&mut self, batch_len: usize) {
        self.batches += 1;
        self.attributes += batch_len;
    }
}

/// Drives periodic attribute reads against one transport
pub struct PollingCoordinator {
    transport: Arc<dyn NasaTransport>,
    config: CoordinatorConfig,
    read_worklist: Worklist,
    bootstrap_worklist: Worklist,
    phase: Mutex<CoordinatorPhase>,
    stats: Mutex<CoordinatorStats>,
}

impl PollingCoordinator {
    pub fn new(transport: Arc<dyn NasaTransport>, config: CoordinatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::unchecked(transport, config))
    }

    /// Coordinator with the default 15 second interval
    pub fn with_defaults(transport: Arc<dyn NasaTransport>) -> Self {
        Self::unchecked(transport, CoordinatorConfig::default())
    }

    fn unchecked(transport: Arc<dyn NasaTransport>, config: CoordinatorConfig) -> Self {
        Self {
            transport,
            config,
            read_worklist: Worklist::new(),
            bootstrap_worklist: Worklist::new(),
            phase: Mutex::new(CoordinatorPhase::Uninitialized),
            stats: Mutex::new(CoordinatorStats::default()),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn NasaTransport> {
        &self.transport
    }

    /// The transport's device registry
    pub fn devices(&self) -> &DeviceRegistry {
        self.transport.devices()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn phase(&self) -> CoordinatorPhase {
        *self.phase.lock()
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.stats.lock().clone()
    }

    /// Whether the most recent refresh succeeded (false before the first one)
    pub fn last_update_success(&self) -> bool {
        self.stats.lock().last_update_success
    }

    /// Copy of the read worklist
    pub fn read_worklist(&self) -> Vec<(DeviceAddress, Vec<MessageId>)> {
        self.read_worklist.snapshot()
    }

    /// Number of bootstrap reads not yet performed
    pub fn bootstrap_pending(&self) -> usize {
        self.bootstrap_worklist.len()
    }

    /// Ask for a message to be read by the coordinator
    ///
    /// Continuous registrations are re-read every cycle. Bootstrap-only ones
    /// are read once; after bootstrap has completed they are ignored.
    /// Nothing is read until the next refresh.
    pub fn register_polled_attribute(
        &self,
        device: &DeviceAddress,
        attribute: MessageId,
        bootstrap_only: bool,
    ) {
        if !bootstrap_only {
            self.read_worklist.push(device, attribute);
            tracing::debug!("Polling {} on {} every cycle", attribute, device);
            return;
        }

        let phase = self.phase.lock();
        if *phase == CoordinatorPhase::SteadyState {
            tracing::warn!(
                "Ignoring bootstrap read of {} on {}: bootstrap already completed",
                attribute,
                device
            );
            return;
        }
        self.bootstrap_worklist.push(device, attribute);
        tracing::debug!("Queued bootstrap read of {} on {}", attribute, device);
    }

    /// Forward a single write to the transport
    pub async fn write_attribute(
        &self,
        device: &DeviceAddress,
        attribute: MessageId,
        request_kind: DataType,
        value: AttributeValue,
    ) -> Result<()> {
        tracing::debug!("Writing {} ({}) on {}: {:?}", attribute, request_kind, device, value);
        self.transport
            .write_attribute(device, attribute, value, request_kind)
            .await
            .map_err(CoordinatorError::from)
    }

    /// Run one polling cycle
    ///
    /// A transport that cannot be reconnected is not an error: the cycle is
    /// skipped and the next one tries again. Read failures propagate.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        {
            let mut phase = self.phase.lock();
            if *phase == CoordinatorPhase::Uninitialized {
                *phase = CoordinatorPhase::Bootstrapping;
                tracing::info!("Coordinator starting bootstrap");
            }
        }

        let result = self.run_cycle().await;

        let mut stats = self.stats.lock();
        stats.cycles += 1;
        stats.last_refresh = Some(SystemTime::now());
        match &result {
            Ok(RefreshOutcome::Skipped) => {
                stats.skipped_cycles += 1;
                stats.last_update_success = true;
            }
            Ok(RefreshOutcome::Completed { batches, attributes }) => {
                stats.batches_sent += *batches as u64;
                stats.attributes_read += *attributes as u64;
                stats.last_update_success = true;
            }
            Err(_) => {
                stats.failed_cycles += 1;
                stats.last_update_success = false;
            }
        }

        result
    }

    async fn run_cycle(&self) -> Result<RefreshOutcome> {
        if !self.ensure_connected().await {
            return Ok(RefreshOutcome::Skipped);
        }

        let mut tally = CycleTally::default();

        if self.phase() == CoordinatorPhase::Bootstrapping {
            self.run_bootstrap(&mut tally).await?;
        }

        for (address, messages) in self.read_worklist.snapshot() {
            for batch in batches(&messages, self.config.max_batch_size) {
                self.transport.read_attributes(&address, batch).await?;
                tally.record(batch.len());
            }
        }

        tracing::debug!(
            "Refresh sent {} batches covering {} attributes",
            tally.batches,
            tally.attributes
        );

        Ok(RefreshOutcome::Completed {
            batches: tally.batches,
            attributes: tally.attributes,
        })
    }

    /// Returns whether the transport is usable for this cycle
    async fn ensure_connected(&self) -> bool {
        if self.transport.is_connected() {
            return true;
        }

        if !self.config.reconnect_on_refresh {
            tracing::warn!("Transport disconnected and reconnect is disabled, skipping cycle");
            return false;
        }

        tracing::info!("Transport disconnected, reconnecting");
        match self.transport.connect().await {
            Ok(()) if self.transport.is_connected() => true,
            Ok(()) => {
                tracing::warn!("Reconnect returned but transport is still down, skipping cycle");
                false
            }
            Err(e) => {
                tracing::warn!("Reconnect failed, retrying next cycle: {}", e);
                false
            }
        }
    }

    /// Drain the bootstrap worklist until it stays empty, then move to
    /// steady state. On a failed read the unsent batches go back on the list.
    async fn run_bootstrap(&self, tally: &mut CycleTally) -> Result<()> {
        loop {
            let pending = {
                let mut phase = self.phase.lock();
                let pending = self.bootstrap_worklist.take();
                if pending.is_empty() {
                    *phase = CoordinatorPhase::SteadyState;
                    tracing::info!("Bootstrap complete, coordinator in steady state");
                    return Ok(());
                }
                pending
            };

            let requests: Vec<(DeviceAddress, Vec<MessageId>)> = pending
                .iter()
                .flat_map(|(address, messages)| {
                    batches(messages, self.config.max_batch_size)
                        .map(move |batch| (address.clone(), batch.to_vec()))
                })
                .collect();

            for (index, (address, batch)) in requests.iter().enumerate() {
                if let Err(e) = self.transport.read_attributes(address, batch).await {
                    for (address, batch) in &requests[index..] {
                        self.bootstrap_worklist.extend(address, batch);
                    }
                    tracing::warn!(
                        "Bootstrap read on {} failed, {} batches left for next cycle: {}",
                        address,
                        requests.len() - index,
                        e
                    );
                    return Err(e.into());
                }
                tally.record(batch.len());
            }
        }
    }
}

impl std::fmt::Debug for PollingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingCoordinator")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("read_worklist", &self.read_worklist.len())
            .field("bootstrap_pending", &self.bootstrap_pending())
            .finish()
    }
}
