//! Credentialed host inventory over WinRM (WS-Management on HTTP 5985).

use std::net::IpAddr;
use std::time::Duration;

use assetscout_common::error::EnrichmentFailure;
use assetscout_common::models::DomainCredential;
use assetscout_common::ports::{HostInventory, RemoteInventory};
use assetscout_protocols::wsman::{self, WmiClass};
use reqwest::StatusCode;
use tracing::debug;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const SYSTEM_DRIVE: &str = "C:";
/// The operating system request, then the other classes side by side. The
/// third share is slack so the caller's own timeout never cuts a reply short.
const REQUEST_ROUNDS: u32 = 3;

pub struct WinRmInventory {
    client: reqwest::Client,
    port: u16,
}

impl WinRmInventory {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            port: wsman::WSMAN_HTTP_PORT,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn endpoint(&self, addr: IpAddr) -> String {
        wsman::endpoint_url(addr, self.port)
    }

    async fn enumerate(
        &self,
        endpoint: &str,
        class: WmiClass,
        credential: &DomainCredential,
        timeout: Duration,
    ) -> Result<String, EnrichmentFailure> {
        let envelope = wsman::enumerate_envelope(endpoint, class, &message_id(), timeout.as_secs().max(1));

        let response = self
            .client
            .post(endpoint)
            .basic_auth(credential.qualified_username(), Some(credential.password()))
            .header(reqwest::header::CONTENT_TYPE, wsman::SOAP_CONTENT_TYPE)
            .timeout(timeout)
            .body(envelope)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EnrichmentFailure::AuthenticationRejected(endpoint.to_string()));
        }

        let body = response.text().await.map_err(transport_failure)?;
        if let Some(fault) = wsman::extract_fault(&body) {
            if fault.to_lowercase().contains("access is denied") {
                return Err(EnrichmentFailure::AuthenticationRejected(endpoint.to_string()));
            }
            return Err(EnrichmentFailure::UnsupportedHost(fault));
        }
        if !status.is_success() {
            return Err(EnrichmentFailure::UnsupportedHost(format!("WinRM answered HTTP {status}")));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl RemoteInventory for WinRmInventory {
    async fn query(
        &self,
        addr: IpAddr,
        hostname: Option<&str>,
        credential: &DomainCredential,
        timeout: Duration,
    ) -> Result<HostInventory, EnrichmentFailure> {
        let endpoint = self.endpoint(addr);
        let per_request = timeout / REQUEST_ROUNDS;
        let mut inventory = HostInventory::default();

        // The first class decides whether the host speaks WinRM to us at all.
        let body = self
            .enumerate(&endpoint, WmiClass::OperatingSystem, credential, per_request)
            .await?;
        apply_class(&mut inventory, WmiClass::OperatingSystem, &body);

        let (system, processor, disk) = tokio::join!(
            self.enumerate(&endpoint, WmiClass::ComputerSystem, credential, per_request),
            self.enumerate(&endpoint, WmiClass::Processor, credential, per_request),
            self.enumerate(&endpoint, WmiClass::LogicalDisk, credential, per_request),
        );
        for (class, reply) in [
            (WmiClass::ComputerSystem, system),
            (WmiClass::Processor, processor),
            (WmiClass::LogicalDisk, disk),
        ] {
            match reply {
                Ok(body) => apply_class(&mut inventory, class, &body),
                Err(failure) => debug!(%addr, hostname, class = class.name(), "WMI class skipped: {failure}"),
            }
        }

        if inventory.is_empty() {
            return Err(EnrichmentFailure::UnsupportedHost(format!("{addr} returned no WMI data")));
        }
        Ok(inventory)
    }
}

/// Copies the fields of one class reply into `inventory`.
pub fn apply_class(inventory: &mut HostInventory, class: WmiClass, xml: &str) {
    let items = wsman::extract_items(xml, class);
    match class {
        WmiClass::OperatingSystem => {
            if let Some(os) = items.first() {
                inventory.os = wsman::extract_xml_value(os, "Caption");
                inventory.os_version = wsman::extract_xml_value(os, "Version");
            }
        }
        WmiClass::ComputerSystem => {
            if let Some(system) = items.first() {
                inventory.manufacturer = wsman::extract_xml_value(system, "Manufacturer");
                inventory.model = wsman::extract_xml_value(system, "Model");
                inventory.ram = wsman::extract_xml_value(system, "TotalPhysicalMemory")
                    .and_then(|bytes| bytes.parse::<u64>().ok())
                    .map(format_memory);
                let joined = wsman::extract_xml_value(system, "PartOfDomain").is_some_and(|v| v == "true");
                if joined {
                    inventory.domain = wsman::extract_xml_value(system, "Domain");
                }
            }
        }
        WmiClass::Processor => {
            inventory.cpu = items
                .first()
                .and_then(|cpu| wsman::extract_xml_value(cpu, "Name"))
                .map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        WmiClass::LogicalDisk => {
            inventory.hdd = items
                .iter()
                .find(|disk| wsman::extract_xml_value(disk, "DeviceID").as_deref() == Some(SYSTEM_DRIVE))
                .and_then(|disk| {
                    let size = wsman::extract_xml_value(disk, "Size")?.parse::<u64>().ok()?;
                    let free = wsman::extract_xml_value(disk, "FreeSpace")?.parse::<u64>().ok()?;
                    Some(format_disk(free, size))
                });
        }
    }
}

pub fn format_memory(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / GIB)
}

pub fn format_disk(free: u64, total: u64) -> String {
    format!("{:.1} GB free of {:.1} GB", free as f64 / GIB, total as f64 / GIB)
}

fn transport_failure(e: reqwest::Error) -> EnrichmentFailure {
    if e.is_timeout() {
        EnrichmentFailure::QueryTimeout
    } else {
        EnrichmentFailure::Network(e.without_url().to_string())
    }
}

fn message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
