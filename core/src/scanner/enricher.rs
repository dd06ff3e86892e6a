use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use assetscout_common::error::EnrichmentFailure;
use assetscout_common::models::{DomainCredential, ScannedDevice};
use assetscout_common::ports::{HostInventory, HostnameResolver, NeighborTable, RemoteInventory, VendorRepository};
use tracing::debug;

use super::neighbor::normalize_mac;

/// Fills in the metadata of alive hosts.
///
/// Steps run in order (name, hardware address, remote inventory) and fail
/// independently; a failed step leaves its fields empty and records why.
/// A host DNS cannot name may still be named by the neighbor table.
pub struct Enricher {
    resolver: Option<Arc<dyn HostnameResolver>>,
    neighbors: Arc<dyn NeighborTable>,
    vendors: Arc<dyn VendorRepository>,
    inventory: Option<Arc<dyn RemoteInventory>>,
    step_timeout: Duration,
}

impl Enricher {
    pub fn new(
        neighbors: Arc<dyn NeighborTable>,
        vendors: Arc<dyn VendorRepository>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            resolver: None,
            neighbors,
            vendors,
            inventory: None,
            step_timeout,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn HostnameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn RemoteInventory>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub async fn enrich(&self, mut device: ScannedDevice, credential: Option<&DomainCredential>) -> ScannedDevice {
        if !device.is_alive {
            return device;
        }
        let addr = device.ip;

        if let Some(resolver) = &self.resolver {
            match self.step(resolver.reverse_lookup(addr, credential)).await {
                Ok(hostname) => device.hostname = hostname,
                Err(failure) => record(&mut device, "reverse lookup", failure),
            }
        }

        let lookup = self.neighbors.lookup_mac(addr);
        match tokio::time::timeout(self.step_timeout, lookup).await {
            Ok(Some(mac)) => {
                device.mac = Some(normalize_mac(mac));
                device.vendor = self.vendors.get_vendor(mac);
            }
            Ok(None) => {}
            Err(_) => record(&mut device, "neighbor lookup", EnrichmentFailure::QueryTimeout),
        }

        // Only with reverse DNS enabled, since the neighbor tooling resolves names too.
        if self.resolver.is_some() && device.hostname.is_none() {
            let lookup = self.neighbors.lookup_hostname(addr);
            if let Ok(Some(name)) = tokio::time::timeout(self.step_timeout, lookup).await {
                device.hostname = Some(name);
            }
        }

        if let (Some(inventory), Some(credential)) = (&self.inventory, credential) {
            let query = inventory.query(addr, device.hostname.as_deref(), credential, self.step_timeout);
            match self.step(query).await {
                Ok(found) => merge_inventory(&mut device, found),
                Err(failure) => record(&mut device, "remote inventory", failure),
            }
        }

        device
    }

    /// Runs one step under the per-step timeout.
    async fn step<T>(&self, fut: impl Future<Output = Result<T, EnrichmentFailure>>) -> Result<T, EnrichmentFailure> {
        tokio::time::timeout(self.step_timeout, fut)
            .await
            .unwrap_or(Err(EnrichmentFailure::QueryTimeout))
    }
}

fn record(device: &mut ScannedDevice, step: &str, failure: EnrichmentFailure) {
    debug!(ip = %device.ip, step, "enrichment step failed: {failure}");
    device.failures.push(failure);
}

fn merge_inventory(device: &mut ScannedDevice, found: HostInventory) {
    let HostInventory {
        os,
        os_version,
        cpu,
        ram,
        hdd,
        domain,
        manufacturer,
        model,
    } = found;
    device.os = os.or(device.os.take());
    device.os_version = os_version.or(device.os_version.take());
    device.cpu = cpu;
    device.ram = ram;
    device.hdd = hdd;
    device.domain = domain;
    device.manufacturer = manufacturer;
    device.model = model;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
