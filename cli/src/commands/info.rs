use assetscout_common::config::{
    DEFAULT_ENRICH_TIMEOUT, DEFAULT_INVENTORY_PREFIX, DEFAULT_MAX_HOSTS, DEFAULT_ONBOARDING_CONCURRENCY,
    DEFAULT_PROBE_PORTS, DEFAULT_PROBE_TIMEOUT, DEFAULT_WORKERS,
};
use assetscout_common::network::interface;
use colored::*;
use pnet::ipnetwork::IpNetwork;

use crate::mprint;
use crate::terminal::{colors, format, print};

pub fn info(quiet: u8) -> anyhow::Result<()> {
    print::print(&format!(
        "{}",
        "Assetscout finds the devices on a network and turns them into inventory records."
            .color(colors::TEXT_DEFAULT)
    ));
    mprint!();

    print_policy(quiet);
    mprint!();
    print_lan(quiet);
    mprint!();
    print_interfaces(quiet);
    Ok(())
}

fn print_policy(quiet: u8) {
    print::header("scan policy", quiet);
    print::aligned_line("Host ceiling", DEFAULT_MAX_HOSTS.to_string());
    print::aligned_line("Workers", DEFAULT_WORKERS.to_string());
    print::aligned_line("Probe timeout", format!("{} ms", DEFAULT_PROBE_TIMEOUT.as_millis()));
    print::aligned_line("Enrichment timeout", format!("{} ms", DEFAULT_ENRICH_TIMEOUT.as_millis()));
    let ports: Vec<String> = DEFAULT_PROBE_PORTS.iter().map(u16::to_string).collect();
    print::aligned_line("Probe ports", ports.join(", "));
    print::aligned_line("Onboarding workers", DEFAULT_ONBOARDING_CONCURRENCY.to_string());
    print::aligned_line("Inventory prefix", DEFAULT_INVENTORY_PREFIX);
}

fn print_lan(quiet: u8) {
    print::header("local network", quiet);
    match interface::get_lan_network() {
        Ok(Some(network)) => {
            let address = network.network().to_string().color(colors::IPV4_ADDR);
            let prefix = network.prefix().to_string().color(colors::ACCENT);
            print::aligned_line("LAN", format!("{address}/{prefix}").color(colors::SEPARATOR));
            print::aligned_line("Hosts to scan", network.size().saturating_sub(2).to_string());
        }
        Ok(None) => print::aligned_line("LAN", "no private IPv4 network".color(colors::MISSING)),
        Err(e) => print::aligned_line("LAN", e.to_string().color(colors::MISSING)),
    }
}

fn print_interfaces(quiet: u8) {
    print::header("interfaces", quiet);
    let interfaces = interface::get_prioritized_interfaces();
    if interfaces.is_empty() {
        print::print_status("No active interfaces");
        return;
    }

    for (idx, iface) in interfaces.iter().enumerate() {
        print::tree_head(idx, &iface.name);
        let mut details: Vec<format::Detail> = iface
            .ips
            .iter()
            .map(|net| match net {
                IpNetwork::V4(v4) => (String::from("IPv4"), v4.to_string().color(colors::IPV4_ADDR)),
                IpNetwork::V6(v6) => (
                    String::from(format::ipv6_to_type_str(&v6.ip())),
                    v6.to_string().color(colors::IPV6_ADDR),
                ),
            })
            .collect();
        if let Some(mac) = iface.mac {
            details.push((String::from("MAC"), mac.to_string().color(colors::MAC_ADDR)));
        }
        print::tree(details);
        if idx + 1 != interfaces.len() {
            mprint!();
        }
    }
}
