use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::EnrichmentFailure;
use crate::models::{EquipmentCategory, ScanPhase};

/// Everything learned about one address during a scan pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedDevice {
    pub ip: IpAddr,
    pub is_alive: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hdd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    /// Best-guess category. Absent for hosts that did not answer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<EquipmentCategory>,
    /// Diagnostics of failed enrichment steps. Never leaves the process.
    #[serde(skip)]
    pub failures: Vec<EnrichmentFailure>,
}

impl ScannedDevice {
    pub fn alive(ip: IpAddr, response_time_ms: u64) -> Self {
        Self {
            is_alive: true,
            response_time_ms: Some(response_time_ms),
            ..Self::unreachable(ip)
        }
    }

    pub fn unreachable(ip: IpAddr) -> Self {
        Self {
            ip,
            is_alive: false,
            hostname: None,
            mac: None,
            vendor: None,
            response_time_ms: None,
            os: None,
            os_version: None,
            cpu: None,
            ram: None,
            hdd: None,
            domain: None,
            manufacturer: None,
            model: None,
            category: None,
            failures: Vec::new(),
        }
    }

    pub fn has_hardware_metrics(&self) -> bool {
        self.cpu.is_some() || self.ram.is_some() || self.hdd.is_some()
    }

    /// True when the remote inventory query filled in anything.
    pub fn has_extended_fields(&self) -> bool {
        self.has_hardware_metrics()
            || self.os.is_some()
            || self.os_version.is_some()
            || self.domain.is_some()
            || self.manufacturer.is_some()
            || self.model.is_some()
    }
}

/// Output of one scan pass, in ascending address order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub devices: Vec<ScannedDevice>,
    pub count: usize,
    /// `Classified` for a complete pass, `PartialResults` when the deadline cut it short.
    pub phase: ScanPhase,
    /// Addresses from the expansion that never received a probe result.
    #[serde(default)]
    pub unresolved: usize,
}

impl ScanReport {
    pub fn new(devices: Vec<ScannedDevice>, phase: ScanPhase, unresolved: usize) -> Self {
        Self {
            count: devices.len(),
            devices,
            phase,
            unresolved,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.phase == ScanPhase::PartialResults
    }

    pub fn alive(&self) -> impl Iterator<Item = &ScannedDevice> {
        self.devices.iter().filter(|device| device.is_alive)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn device_serializes_camel_case_without_failures() {
        let mut device = ScannedDevice::alive(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 12);
        device.os_version = Some("10.0.19045".into());
        device.failures.push(EnrichmentFailure::QueryTimeout);

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["isAlive"], true);
        assert_eq!(json["responseTimeMs"], 12);
        assert_eq!(json["osVersion"], "10.0.19045");
        assert!(json.get("failures").is_none());
        assert!(json.get("cpu").is_none());
    }

    #[test]
    fn report_count_matches_devices() {
        let devices = vec![
            ScannedDevice::unreachable(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            ScannedDevice::alive(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), 3),
        ];
        let report = ScanReport::new(devices, ScanPhase::Classified, 0);
        assert_eq!(report.count, 2);
        assert_eq!(report.alive().count(), 1);
        assert!(!report.is_partial());
    }
}
