//! # Scan Target Model
//!
//! Defines the possible inputs for a network scan and turns them into the
//! ordered list of addresses to probe.
//!
//! A target is exactly one of:
//! * A single IP address (host).
//! * An IPv4 range (e.g., `192.168.1.1-192.168.1.50` or `192.168.1.1-50`).
//! * A CIDR subnet (e.g., `192.168.1.0/24`).
//! * The local LAN (detected automatically).

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ScanError;
use crate::models::DomainCredential;
use crate::network::interface;
use crate::network::range::{self, Ipv4Range};
use crate::{info, warn};

/// Represents the single target of a scan request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanTarget {
    /// The primary private network of this machine.
    Lan,
    /// A CIDR block. Only its usable hosts are scanned.
    Subnet { network: Ipv4Addr, prefix: u8 },
    /// An explicit inclusive range.
    Range { ipv4_range: Ipv4Range },
    /// A single host.
    Host { target_addr: IpAddr },
}

/// A validated scan request.
#[derive(Clone, Debug)]
pub struct ScanRequest {
    pub target: ScanTarget,
    pub credential: Option<DomainCredential>,
}

impl ScanRequest {
    pub fn new(target: ScanTarget) -> Self {
        Self {
            target,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: DomainCredential) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Builds a credential only when both a user and a password are given.
///
/// A user without a password is dropped with a warning and the scan runs
/// unauthenticated.
pub fn credential_from_parts(
    user: Option<String>,
    password: Option<String>,
    server: Option<String>,
) -> Option<DomainCredential> {
    let user = user.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    let server = server.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    match password {
        Some(password) if !password.is_empty() => Some(DomainCredential::new(user, password, server)),
        _ => {
            warn!("Domain user given without a password, skipping credentialed enrichment");
            None
        }
    }
}

/// Scan request as sent by the presentation layer.
///
/// Exactly one target form must be present: `subnet`, `startIp` + `endIp`,
/// `startIp` alone (single address or `A.B.C.D-E`), or `singleIp`.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanParams {
    pub subnet: Option<String>,
    pub start_ip: Option<String>,
    pub end_ip: Option<String>,
    pub single_ip: Option<String>,
    pub domain_user: Option<String>,
    pub domain_password: Option<String>,
    pub domain_server: Option<String>,
}

impl TryFrom<ScanParams> for ScanRequest {
    type Error = ScanError;

    fn try_from(params: ScanParams) -> Result<Self, Self::Error> {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let subnet = present(&params.subnet);
        let start_ip = present(&params.start_ip);
        let end_ip = present(&params.end_ip);
        let single_ip = present(&params.single_ip);

        let forms = [subnet.is_some(), start_ip.is_some(), single_ip.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count();

        if forms != 1 {
            return Err(ScanError::InvalidTarget(
                "exactly one of subnet, startIp/endIp or singleIp must be set".to_string(),
            ));
        }

        let target = match (subnet, start_ip, end_ip, single_ip) {
            (Some(cidr), None, None, None) => parse_cidr_range(&cidr)?.ok_or_else(|| {
                ScanError::InvalidTarget(format!("subnet is not in CIDR form: {cidr}"))
            })?,
            (None, Some(start), Some(end), None) => parse_explicit_range(&start, &end)?,
            (None, Some(start), None, None) => match parse_ip_range(&start)? {
                Some(target) => target,
                None => parse_host(&start).ok_or_else(|| {
                    ScanError::InvalidTarget(format!("invalid IP address: {start}"))
                })?,
            },
            (None, None, None, Some(single)) => parse_host(&single).ok_or_else(|| {
                ScanError::InvalidTarget(format!("invalid IP address: {single}"))
            })?,
            _ => {
                return Err(ScanError::InvalidTarget(
                    "endIp requires startIp and cannot be combined with other targets".to_string(),
                ));
            }
        };

        let credential = credential_from_parts(params.domain_user, params.domain_password, params.domain_server);
        Ok(ScanRequest { target, credential })
    }
}

impl FromStr for ScanTarget {
    type Err = ScanError;

    /// Parses a string into a `ScanTarget`.
    ///
    /// Supported formats:
    /// * **Keyword**: "lan" (case-insensitive).
    /// * **Host**: Single IPv4/IPv6 address (e.g., "192.168.1.5").
    /// * **Range**: "Start-End" (e.g., "192.168.1.1-50", "192.168.1.1-192.168.1.50").
    /// * **CIDR**: "Network/Prefix" (e.g., "192.168.1.0/24").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("lan") {
            return Ok(ScanTarget::Lan);
        }

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if let Some(target) = parse_ip_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_cidr_range(s)? {
            return Ok(target);
        }

        Err(ScanError::InvalidTarget(format!("invalid target: {s}")))
    }
}

impl ScanTarget {
    /// Number of addresses this target expands to, computed without enumerating.
    pub fn address_count(&self) -> Result<u64, ScanError> {
        match self {
            ScanTarget::Lan => self.resolve()?.address_count(),
            ScanTarget::Subnet { network, prefix } => Ok(usable_range(*network, *prefix)?.len()),
            ScanTarget::Range { ipv4_range } => Ok(ipv4_range.len()),
            ScanTarget::Host { .. } => Ok(1),
        }
    }

    /// Expands the target into ascending, duplicate-free addresses.
    ///
    /// Fails with [`ScanError::RangeTooLarge`] before enumerating anything when
    /// the expansion would exceed `limit`.
    pub fn expand(&self, limit: usize) -> Result<Vec<IpAddr>, ScanError> {
        let target = self.resolve()?;
        let requested = target.address_count()?;
        if requested > limit as u64 {
            return Err(ScanError::RangeTooLarge { requested, limit });
        }

        let addrs: Vec<IpAddr> = match target {
            ScanTarget::Subnet { network, prefix } => usable_range(network, prefix)?.to_iter().collect(),
            ScanTarget::Range { ipv4_range } => ipv4_range.to_iter().collect(),
            ScanTarget::Host { target_addr } => vec![target_addr],
            ScanTarget::Lan => Vec::new(),
        };

        let len = addrs.len();
        let unit = if len == 1 { "address" } else { "addresses" };
        info!("{len} {unit} queued for probing");
        Ok(addrs)
    }

    /// Replaces `Lan` with the subnet of the primary local interface.
    fn resolve(&self) -> Result<ScanTarget, ScanError> {
        match self {
            ScanTarget::Lan => {
                let network = interface::get_lan_network()
                    .map_err(|e| ScanError::InvalidTarget(e.to_string()))?
                    .ok_or_else(|| {
                        ScanError::InvalidTarget("no private IPv4 network on the LAN interface".to_string())
                    })?;
                info!("Resolved LAN target to {}/{}", network.network(), network.prefix());
                Ok(ScanTarget::Subnet {
                    network: network.network(),
                    prefix: network.prefix(),
                })
            }
            other => Ok(other.clone()),
        }
    }
}

fn usable_range(network: Ipv4Addr, prefix: u8) -> Result<Ipv4Range, ScanError> {
    range::usable_host_range(network, prefix).map_err(|e| ScanError::InvalidTarget(e.to_string()))
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<ScanTarget> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| ScanTarget::Host { target_addr })
}

fn parse_explicit_range(start: &str, end: &str) -> Result<ScanTarget, ScanError> {
    let start_addr = start
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::InvalidTarget(format!("Invalid start IP '{start}': {e}")))?;
    let end_addr = end
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::InvalidTarget(format!("Invalid end IP '{end}': {e}")))?;
    checked_range(start_addr, end_addr)
}

fn checked_range(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Result<ScanTarget, ScanError> {
    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    if ipv4_range.is_empty() {
        return Err(ScanError::InvalidTarget(format!(
            "range start {start_addr} is after range end {end_addr}"
        )));
    }
    Ok(ScanTarget::Range { ipv4_range })
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<ScanTarget>, ScanError> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start_addr = start_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::InvalidTarget(format!("Invalid start IP in range '{start_str}': {e}")))?;

    let end_addr = parse_range_end_addr(end_str.trim(), &start_addr, s)
        .map_err(ScanError::InvalidTarget)?;

    checked_range(start_addr, end_addr).map(Some)
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {original_s}"));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24". Host bits are ignored.
fn parse_cidr_range(s: &str) -> Result<Option<ScanTarget>, ScanError> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::InvalidTarget(format!("Invalid IP in CIDR '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .trim()
        .parse::<u8>()
        .map_err(|e| ScanError::InvalidTarget(format!("Invalid prefix in CIDR '{prefix_str}': {e}")))?;

    let block = range::cidr_range(ipv4_addr, prefix).map_err(|e| ScanError::InvalidTarget(e.to_string()))?;

    Ok(Some(ScanTarget::Subnet {
        network: block.start_addr,
        prefix,
    }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
