//! Lookups in the kernel neighbor (ARP/NDP) cache.
//!
//! Sources are tried in order: `/proc/net/arp`, `ip neighbor show`, then
//! `arp -n` / `arp -a`. Entries that are incomplete or all-zero are ignored.
//! `arp -a` also names the host, which serves as a last resort when reverse
//! DNS knows nothing.

use std::net::IpAddr;
use std::str::FromStr;

use assetscout_common::ports::NeighborTable;
use pnet::datalink::MacAddr;
use tokio::process::Command;
use tracing::trace;

const PROC_NET_ARP: &str = "/proc/net/arp";

pub struct SystemNeighborTable;

impl SystemNeighborTable {
    async fn from_proc(addr: IpAddr) -> Option<MacAddr> {
        let content = tokio::fs::read_to_string(PROC_NET_ARP).await.ok()?;
        parse_proc_arp(&content, addr)
    }

    async fn from_ip_neighbor(addr: IpAddr) -> Option<MacAddr> {
        let output = run(Command::new("ip").args(["neighbor", "show", &addr.to_string()])).await?;
        parse_ip_neighbor(&output, addr)
    }

    async fn from_arp(addr: IpAddr) -> Option<MacAddr> {
        for flag in ["-n", "-a"] {
            if let Some(output) = run(Command::new("arp").args([flag, &addr.to_string()])).await
                && let Some(mac) = parse_arp_output(&output, addr)
            {
                return Some(mac);
            }
        }
        None
    }
}

#[async_trait::async_trait]
impl NeighborTable for SystemNeighborTable {
    async fn lookup_mac(&self, addr: IpAddr) -> Option<MacAddr> {
        if let Some(mac) = Self::from_proc(addr).await {
            return Some(mac);
        }
        if let Some(mac) = Self::from_ip_neighbor(addr).await {
            return Some(mac);
        }
        Self::from_arp(addr).await
    }

    async fn lookup_hostname(&self, addr: IpAddr) -> Option<String> {
        let output = run(Command::new("arp").args(["-a", &addr.to_string()])).await?;
        parse_arp_hostname(&output, addr)
    }
}

async fn run(command: &mut Command) -> Option<String> {
    let output = command.kill_on_drop(true).output().await.ok()?;
    if !output.status.success() {
        trace!(status = ?output.status, "neighbor command failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Upper-case, colon-separated form (`AA:BB:CC:DD:EE:FF`).
pub fn normalize_mac(mac: MacAddr) -> String {
    mac.to_string().to_uppercase()
}

/// Parses `aa:bb:..`, `AA-BB-..` and the short BSD form `0:1b:2:..`.
pub fn parse_mac(value: &str) -> Option<MacAddr> {
    let value = value.trim().replace('-', ":");
    if value.split(':').count() != 6 {
        return None;
    }
    MacAddr::from_str(&value).ok().filter(|mac| !mac.is_zero() && !mac.is_broadcast())
}

/// `IP address  HW type  Flags  HW address  Mask  Device`
fn parse_proc_arp(content: &str, addr: IpAddr) -> Option<MacAddr> {
    let wanted = addr.to_string();
    content.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [ip, _hw_type, _flags, mac, ..] if *ip == wanted => parse_mac(mac),
            _ => None,
        }
    })
}

/// `10.0.0.1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE`
fn parse_ip_neighbor(output: &str, addr: IpAddr) -> Option<MacAddr> {
    let wanted = addr.to_string();
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != wanted {
            return None;
        }
        let mut fields = fields.skip_while(|field| *field != "lladdr");
        fields.next()?;
        parse_mac(fields.next()?)
    })
}

/// Handles the Linux (`arp -n`), BSD/macOS (`arp -a`) and Windows (`arp -a`) layouts.
fn parse_arp_output(output: &str, addr: IpAddr) -> Option<MacAddr> {
    let wanted = addr.to_string();
    let bracketed = format!("({wanted})");
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !fields.iter().any(|field| *field == wanted || *field == bracketed) {
            return None;
        }
        fields.iter().find_map(|field| parse_mac(field))
    })
}

/// `pc-07.corp.local (10.0.0.7) at 00:1b:44:aa:bb:cc [ether] on eth0`
///
/// Unnamed entries start with `?`.
fn parse_arp_hostname(output: &str, addr: IpAddr) -> Option<String> {
    let bracketed = format!("({addr})");
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        if fields.next()? != bracketed || name == "?" || name.contains('(') {
            return None;
        }
        Some(name.trim_end_matches('.').to_lowercase())
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
