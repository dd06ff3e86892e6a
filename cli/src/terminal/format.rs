use std::net::{IpAddr, Ipv6Addr};

use assetscout_common::models::ScannedDevice;
use colored::*;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(ipv6_addr) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    "IPv6"
}

// 2000::/3
fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn ip_to_detail(ip: &IpAddr) -> Detail {
    match ip {
        IpAddr::V4(ipv4_addr) => (String::from("IPv4"), ipv4_addr.to_string().color(colors::IPV4_ADDR)),
        IpAddr::V6(ipv6_addr) => (
            String::from(ipv6_to_type_str(ipv6_addr)),
            ipv6_addr.to_string().color(colors::IPV6_ADDR),
        ),
    }
}

/// Every known field of a device, in display order. Unknown fields are left out.
pub fn device_details(device: &ScannedDevice) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![ip_to_detail(&device.ip)];

    let mut push = |key: &str, value: Option<ColoredString>| {
        if let Some(value) = value {
            details.push((key.to_string(), value));
        }
    };

    push("MAC", device.mac.as_deref().map(|mac| mac.color(colors::MAC_ADDR)));
    push("Vendor", device.vendor.as_deref().map(|v| v.normal()));
    push("Category", device.category.map(|c| c.as_str().color(colors::CATEGORY)));
    push("RTT", device.response_time_ms.map(|ms| format!("{ms} ms").normal()));
    push("OS", os_line(device).map(|os| os.normal()));
    push("CPU", device.cpu.as_deref().map(|v| v.normal()));
    push("RAM", device.ram.as_deref().map(|v| v.normal()));
    push("Disk", device.hdd.as_deref().map(|v| v.normal()));
    push("Domain", device.domain.as_deref().map(|v| v.normal()));
    push("Model", model_line(device).map(|m| m.normal()));

    details
}

pub fn display_name(device: &ScannedDevice) -> &str {
    device.hostname.as_deref().unwrap_or("No hostname")
}

fn os_line(device: &ScannedDevice) -> Option<String> {
    match (&device.os, &device.os_version) {
        (Some(os), Some(version)) => Some(format!("{os} ({version})")),
        (Some(os), None) => Some(os.clone()),
        (None, Some(version)) => Some(version.clone()),
        (None, None) => None,
    }
}

fn model_line(device: &ScannedDevice) -> Option<String> {
    match (&device.manufacturer, &device.model) {
        (Some(make), Some(model)) => Some(format!("{make} {model}")),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
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
