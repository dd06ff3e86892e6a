//! Scripted implementations of the engine ports.

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use assetscout_common::config::ScanConfig;
use assetscout_common::error::{CreateError, EnrichmentFailure, ProbeFailure};
use assetscout_common::models::{DomainCredential, EquipmentPayload, RecordId};
use assetscout_common::ports::{
    EquipmentStore, HostInventory, HostnameResolver, LivenessProbe, MacAddr, NeighborTable, RemoteInventory,
    VendorRepository,
};
use assetscout_core::DiscoveryService;
use assetscout_core::scanner::enricher::Enricher;
use tokio::time::Instant;

pub fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// Answers for the addresses in `alive` after a per-address delay, and
/// remembers when every probe started.
#[derive(Default)]
pub struct ScriptedProber {
    alive: HashSet<IpAddr>,
    delays: HashMap<IpAddr, Duration>,
    default_delay: Duration,
    pub calls: AtomicUsize,
    pub started: Mutex<Vec<(IpAddr, Instant)>>,
}

impl ScriptedProber {
    pub fn alive(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            alive: addrs.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, addr: IpAddr, delay: Duration) -> Self {
        self.delays.insert(addr, delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn start_times(&self) -> Vec<(IpAddr, Instant)> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LivenessProbe for ScriptedProber {
    async fn probe(&self, addr: IpAddr, probe_timeout: Duration) -> Result<Duration, ProbeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.lock().unwrap().push((addr, Instant::now()));

        let delay = self.delays.get(&addr).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;
        if self.alive.contains(&addr) {
            Ok(delay)
        } else {
            Err(ProbeFailure::HostUnreachable(probe_timeout))
        }
    }
}

#[derive(Default)]
pub struct StaticNeighbors(pub HashMap<IpAddr, MacAddr>);

#[async_trait::async_trait]
impl NeighborTable for StaticNeighbors {
    async fn lookup_mac(&self, addr: IpAddr) -> Option<MacAddr> {
        self.0.get(&addr).copied()
    }
}

pub struct PrefixVendors;

impl VendorRepository for PrefixVendors {
    fn get_vendor(&self, mac: MacAddr) -> Option<String> {
        (mac.0 == 0x3c && mac.1 == 0xd9 && mac.2 == 0x2b).then(|| "Hewlett Packard".to_string())
    }
}

#[derive(Default)]
pub struct StaticResolver(pub HashMap<IpAddr, String>);

#[async_trait::async_trait]
impl HostnameResolver for StaticResolver {
    async fn reverse_lookup(
        &self,
        addr: IpAddr,
        _credential: Option<&DomainCredential>,
    ) -> Result<Option<String>, EnrichmentFailure> {
        Ok(self.0.get(&addr).cloned())
    }
}

/// Names every host `host-<last octet>`, after `delay`.
pub struct SlowResolver {
    pub delay: Duration,
}

#[async_trait::async_trait]
impl HostnameResolver for SlowResolver {
    async fn reverse_lookup(
        &self,
        addr: IpAddr,
        _credential: Option<&DomainCredential>,
    ) -> Result<Option<String>, EnrichmentFailure> {
        tokio::time::sleep(self.delay).await;
        let last = match addr {
            IpAddr::V4(v4) => v4.octets()[3].to_string(),
            IpAddr::V6(v6) => format!("{:x}", v6.segments()[7]),
        };
        Ok(Some(format!("host-{last}")))
    }
}

/// Workstation inventory for every host, except the ones that reject the credential.
#[derive(Default)]
pub struct RejectingInventory {
    pub rejecting: HashSet<IpAddr>,
    pub queries: AtomicUsize,
}

#[async_trait::async_trait]
impl RemoteInventory for RejectingInventory {
    async fn query(
        &self,
        addr: IpAddr,
        _hostname: Option<&str>,
        _credential: &DomainCredential,
        _timeout: Duration,
    ) -> Result<HostInventory, EnrichmentFailure> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.rejecting.contains(&addr) {
            return Err(EnrichmentFailure::AuthenticationRejected(addr.to_string()));
        }
        Ok(HostInventory {
            os: Some("Microsoft Windows 11 Pro".into()),
            os_version: Some("10.0.22631".into()),
            cpu: Some("Intel(R) Core(TM) i5-10500 CPU @ 3.10GHz".into()),
            ram: Some("16.0 GB".into()),
            hdd: Some("120.5 GB free of 476.3 GB".into()),
            domain: Some("corp.example".into()),
            manufacturer: Some("Dell Inc.".into()),
            model: Some("OptiPlex 7080".into()),
        })
    }
}

pub fn config(workers: usize) -> ScanConfig {
    ScanConfig {
        workers,
        ..ScanConfig::default()
    }
}

pub fn bare_enricher() -> Enricher {
    Enricher::new(
        Arc::new(StaticNeighbors::default()),
        Arc::new(PrefixVendors),
        Duration::from_secs(3),
    )
}

pub fn service(config: ScanConfig, prober: Arc<ScriptedProber>, enricher: Enricher) -> DiscoveryService {
    DiscoveryService::new(config, prober, enricher)
}

/// In-memory store that fails for chosen addresses and tracks concurrency.
#[derive(Default)]
pub struct FlakyStore {
    pub failing: HashSet<String>,
    pub created: Mutex<Vec<EquipmentPayload>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

#[async_trait::async_trait]
impl EquipmentStore for FlakyStore {
    async fn create_equipment(&self, payload: &EquipmentPayload) -> Result<RecordId, CreateError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&payload.ip_address) {
            return Err(CreateError::Persistence("connection reset by peer".into()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(payload.clone());
        Ok(format!("rec-{}", created.len()))
    }
}
