//! # Network Discovery Service
//!
//! Implements the "scan network" use case: expand the target, probe every
//! address, enrich and classify the hosts that answered.

use std::sync::Arc;

use assetscout_common::config::ScanConfig;
use assetscout_common::error::ScanError;
use assetscout_common::models::{ScanPhase, ScanReport};
use assetscout_common::network::target::ScanRequest;
use assetscout_common::ports::{HostnameResolver, LivenessProbe, NeighborTable, RemoteInventory, VendorRepository};
use assetscout_common::{info, success, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::classifier;
use crate::network::tcp::TcpConnectProber;
use crate::scanner::enricher::Enricher;
use crate::scanner::neighbor::SystemNeighborTable;
use crate::scanner::resolver::DnsResolver;
use crate::scanner::{self, PhaseTracker};
use crate::inventory::WinRmInventory;
use crate::vendors::MacOuiRepo;

/// Application service for network discovery.
///
/// Holds the collaborators of every phase. Nothing survives between scans
/// except these read-only handles.
pub struct DiscoveryService {
    config: ScanConfig,
    prober: Arc<dyn LivenessProbe>,
    enricher: Arc<Enricher>,
}

impl DiscoveryService {
    pub fn new(config: ScanConfig, prober: Arc<dyn LivenessProbe>, enricher: Enricher) -> Self {
        Self {
            config,
            prober,
            enricher: Arc::new(enricher),
        }
    }

    /// Wires the system adapters: TCP probing, resolv.conf DNS, the kernel
    /// neighbor cache, the OUI database and WinRM.
    pub fn with_system_adapters(config: ScanConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let prober: Arc<dyn LivenessProbe> = Arc::new(TcpConnectProber::new(config.probe_ports.clone()));
        let neighbors: Arc<dyn NeighborTable> = Arc::new(SystemNeighborTable);
        let vendors: Arc<dyn VendorRepository> = Arc::new(MacOuiRepo);
        let inventory: Arc<dyn RemoteInventory> = Arc::new(WinRmInventory::new()?);

        let mut enricher = Enricher::new(neighbors, vendors, config.enrich_timeout).with_inventory(inventory);
        if !config.no_dns {
            match DnsResolver::from_system(config.enrich_timeout) {
                Ok(resolver) => {
                    let resolver: Arc<dyn HostnameResolver> = Arc::new(resolver);
                    enricher = enricher.with_resolver(resolver);
                }
                Err(e) => warn!("Reverse DNS disabled: {e:#}"),
            }
        }

        Ok(Self::new(config, prober, enricher))
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs one scan pass.
    ///
    /// Only an invalid or oversized target is an error. Deadline expiry and
    /// cancellation yield a report in `PartialResults` holding every address
    /// that was probed.
    pub async fn scan_network(&self, request: ScanRequest, cancel: &CancellationToken) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        let deadline = self.config.deadline.map(|limit| started + limit);
        let mut tracker = PhaseTracker::new();

        let addrs = tracing::info_span!("expand", target = ?request.target)
            .in_scope(|| request.target.expand(self.config.max_hosts))?;
        let expanded = addrs.len();

        tracker.advance(ScanPhase::Probing);
        let probed = scanner::probe_addresses(
            addrs,
            Arc::clone(&self.prober),
            self.config.workers,
            self.config.probe_timeout,
            deadline,
            cancel,
        )
        .instrument(tracing::info_span!("probe", hosts = expanded))
        .await;

        let mut devices: Vec<_> = probed.slots.into_iter().flatten().collect();
        let unresolved = expanded - devices.len();
        let alive = devices.iter().filter(|d| d.is_alive).count();
        info!("{alive} of {} probed hosts answered", devices.len());

        let mut partial = probed.interrupted;
        if partial {
            tracker.advance(ScanPhase::PartialResults);
        } else {
            tracker.advance(ScanPhase::Enriching);
            partial = scanner::enrich_devices(
                &mut devices,
                Arc::clone(&self.enricher),
                request.credential,
                self.config.workers,
                deadline,
                cancel,
            )
            .instrument(tracing::info_span!("enrich", hosts = alive))
            .await;
            tracker.advance(if partial { ScanPhase::PartialResults } else { ScanPhase::Classified });
        }

        for device in devices.iter_mut().filter(|d| d.is_alive) {
            device.category = Some(classifier::classify(device));
        }

        let report = ScanReport::new(devices, tracker.phase(), unresolved);
        if report.is_partial() {
            warn!(
                "Scan stopped early after {:?}: {} addresses reported, {unresolved} never probed",
                started.elapsed(),
                report.count
            );
        } else {
            success!("Scan finished in {:?}: {} hosts, {alive} alive", started.elapsed(), report.count);
        }
        Ok(report)
    }
}
