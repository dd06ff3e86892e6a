//! Best-guess equipment category of a scanned device.
//!
//! An ordered rule table is walked top to bottom and the first matching rule
//! wins. Keyword matching is case-insensitive substring matching on the
//! hostname and, where a rule says so, the vendor.

use assetscout_common::models::{EquipmentCategory, ScannedDevice};

const PRINTER_HOST_KEYWORDS: &[&str] = &["printer", "print", "laserjet", "officejet", "deskjet", "mfp"];
const PRINTER_VENDORS: &[&str] = &["canon", "epson", "brother", "kyocera", "xerox", "ricoh", "lexmark"];
const SERVER_HOST_KEYWORDS: &[&str] = &["server", "srv", "dc", "domain"];
const NETWORK_HOST_KEYWORDS: &[&str] = &["router", "switch", "gateway", "access-point"];
const NETWORK_VENDORS: &[&str] = &[
    "cisco", "netgear", "mikrotik", "ubiquiti", "juniper", "aruba", "tp-link", "d-link",
];
const MONITOR_HOST_KEYWORDS: &[&str] = &["monitor", "display"];

pub struct Rule {
    pub name: &'static str,
    pub category: EquipmentCategory,
    pub matches: fn(&Facts) -> bool,
}

/// Lowercased view of the fields rules look at.
pub struct Facts {
    hostname: String,
    vendor: String,
    has_hardware_metrics: bool,
}

impl Facts {
    pub fn of(device: &ScannedDevice) -> Self {
        Self {
            hostname: device.hostname.as_deref().unwrap_or_default().to_lowercase(),
            vendor: device.vendor.as_deref().unwrap_or_default().to_lowercase(),
            has_hardware_metrics: device.has_hardware_metrics(),
        }
    }

    fn hostname_has(&self, keywords: &[&str]) -> bool {
        contains_any(&self.hostname, keywords)
    }

    fn host_or_vendor_has(&self, host_keywords: &[&str], vendors: &[&str]) -> bool {
        contains_any(&self.hostname, host_keywords)
            || contains_any(&self.vendor, host_keywords)
            || contains_any(&self.vendor, vendors)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    !haystack.is_empty() && needles.iter().any(|needle| haystack.contains(needle))
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "printer keywords",
        category: EquipmentCategory::Printer,
        matches: |f| f.host_or_vendor_has(PRINTER_HOST_KEYWORDS, PRINTER_VENDORS),
    },
    Rule {
        name: "server keywords",
        category: EquipmentCategory::Server,
        matches: |f| f.hostname_has(SERVER_HOST_KEYWORDS),
    },
    Rule {
        name: "network keywords",
        category: EquipmentCategory::Network,
        matches: |f| f.host_or_vendor_has(NETWORK_HOST_KEYWORDS, NETWORK_VENDORS),
    },
    Rule {
        name: "monitor keywords",
        category: EquipmentCategory::Monitor,
        matches: |f| f.hostname_has(MONITOR_HOST_KEYWORDS),
    },
    Rule {
        name: "hardware metrics",
        category: EquipmentCategory::Computer,
        matches: |f| f.has_hardware_metrics,
    },
];

pub fn classify(device: &ScannedDevice) -> EquipmentCategory {
    matching_rule(device).map_or(EquipmentCategory::Computer, |rule| rule.category)
}

/// The rule that decided the category, `None` when the default applied.
pub fn matching_rule(device: &ScannedDevice) -> Option<&'static Rule> {
    let facts = Facts::of(device);
    RULES.iter().find(|rule| (rule.matches)(&facts))
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
    use std::net::{IpAddr, Ipv4Addr};

    fn device(hostname: Option<&str>, vendor: Option<&str>) -> ScannedDevice {
        let mut device = ScannedDevice::alive(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9)), 1);
        device.hostname = hostname.map(str::to_string);
        device.vendor = vendor.map(str::to_string);
        device
    }

    #[test]
    fn laserjet_hostname_is_a_printer() {
        assert_eq!(classify(&device(Some("HP-LaserJet-3F"), None)), EquipmentCategory::Printer);
    }

    #[test]
    fn printer_vendor_without_hostname() {
        assert_eq!(classify(&device(None, Some("Kyocera Corporation"))), EquipmentCategory::Printer);
    }

    #[test]
    fn server_keywords() {
        assert_eq!(classify(&device(Some("srv-files-01"), None)), EquipmentCategory::Server);
        assert_eq!(classify(&device(Some("dc01.corp.local"), None)), EquipmentCategory::Server);
    }

    #[test]
    fn switch_hostname_is_network() {
        assert_eq!(classify(&device(Some("core-switch-1"), None)), EquipmentCategory::Network);
        assert_eq!(classify(&device(None, Some("Cisco Systems, Inc"))), EquipmentCategory::Network);
    }

    #[test]
    fn monitor_keywords() {
        assert_eq!(classify(&device(Some("lobby-display"), None)), EquipmentCategory::Monitor);
    }

    #[test]
    fn hardware_metrics_mean_computer() {
        let mut pc = device(None, None);
        pc.cpu = Some("Intel(R) Core(TM) i5".into());
        pc.ram = Some("16.0 GB".into());
        assert_eq!(matching_rule(&pc).map(|rule| rule.name), Some("hardware metrics"));
        assert_eq!(classify(&pc), EquipmentCategory::Computer);
    }

    #[test]
    fn nothing_known_defaults_to_computer() {
        let unknown = device(None, None);
        assert!(matching_rule(&unknown).is_none());
        assert_eq!(classify(&unknown), EquipmentCategory::Computer);
    }

    #[test]
    fn earlier_rules_win() {
        // Both printer and server keywords: printer is checked first.
        assert_eq!(classify(&device(Some("print-server"), None)), EquipmentCategory::Printer);
        // Network vendor, server hostname: server is checked first.
        assert_eq!(classify(&device(Some("srv-edge"), Some("Juniper Networks"))), EquipmentCategory::Server);
    }
}
