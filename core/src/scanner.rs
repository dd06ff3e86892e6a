//! Scan phases on top of the worker pool.
//!
//! [`probe_addresses`] and [`enrich_devices`] each run one phase over the
//! bounded pool. [`PhaseTracker`] validates and traces the transitions
//! between phases.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use assetscout_common::models::{DomainCredential, ScanPhase, ScannedDevice};
use assetscout_common::ports::LivenessProbe;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::pool::{self, PoolRun};

pub mod enricher;
pub mod neighbor;
pub mod resolver;

use enricher::Enricher;

/// Current phase of one scan, with transition checks.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: ScanPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        trace!(phase = %ScanPhase::Expanding, "scan phase");
        Self {
            phase: ScanPhase::Expanding,
        }
    }

    /// Picks up a scan that already reached `phase`, e.g. from a saved report.
    pub fn resume(phase: ScanPhase) -> Self {
        trace!(%phase, "scan phase resumed");
        Self { phase }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Moves to `next`. Invalid transitions are refused and logged.
    pub fn advance(&mut self, next: ScanPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "refusing invalid scan phase transition");
            return false;
        }
        debug!(from = %self.phase, to = %next, "scan phase");
        self.phase = next;
        true
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Probes every address; the slot of an unprobed address stays `None`.
pub async fn probe_addresses(
    addrs: Vec<IpAddr>,
    prober: Arc<dyn LivenessProbe>,
    workers: usize,
    probe_timeout: Duration,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
) -> PoolRun<ScannedDevice> {
    pool::run_bounded(addrs, workers, deadline, cancel, move |addr: &IpAddr| {
        let prober = Arc::clone(&prober);
        let addr = *addr;
        async move {
            match prober.probe(addr, probe_timeout).await {
                Ok(rtt) => ScannedDevice::alive(addr, u64::try_from(rtt.as_millis()).unwrap_or(u64::MAX)),
                Err(failure) => {
                    trace!(%addr, "probe failed: {failure}");
                    ScannedDevice::unreachable(addr)
                }
            }
        }
    })
    .await
}

/// Enriches alive devices in place; returns true when the run was cut short.
///
/// Devices the pool never reached keep their probe data.
pub async fn enrich_devices(
    devices: &mut [ScannedDevice],
    enricher: Arc<Enricher>,
    credential: Option<DomainCredential>,
    workers: usize,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
) -> bool {
    let alive: Vec<(usize, ScannedDevice)> = devices
        .iter()
        .enumerate()
        .filter(|(_, device)| device.is_alive)
        .map(|(index, device)| (index, device.clone()))
        .collect();

    let credential = Arc::new(credential);
    let run = pool::run_bounded(alive, workers, deadline, cancel, move |(index, device): &(usize, ScannedDevice)| {
        let enricher = Arc::clone(&enricher);
        let credential = Arc::clone(&credential);
        let (index, device) = (*index, device.clone());
        async move { (index, enricher.enrich(device, (*credential).as_ref()).await) }
    })
    .await;

    let interrupted = run.interrupted;
    for (index, device) in run.slots.into_iter().flatten() {
        devices[index] = device;
    }
    interrupted
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
