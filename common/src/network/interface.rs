//! Local interface inspection used to resolve the `lan` scan target.

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[cfg(not(target_os = "linux"))]
use fallback_impl::{is_physical, is_wireless};
#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback or virtual interface.
    NotPhysical,
    /// The interface does not support broadcast.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 network.
    NoPrivateIpv4,
}

/// Finds the primary LAN network of this machine.
pub fn get_lan_network() -> anyhow::Result<Option<Ipv4Network>> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces()
        .into_iter()
        .filter(|interface| is_viable_lan_interface(interface, is_physical).is_ok())
        .collect();

    let Some(interface) = select_best_lan_interface(interfaces, is_wired) else {
        anyhow::bail!("No interfaces available for LAN discovery");
    };

    Ok(private_ipv4_network(&interface))
}

/// Returns the up, non-loopback interfaces, wired ones first.
pub fn get_prioritized_interfaces() -> Vec<NetworkInterface> {
    let mut interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces()
        .into_iter()
        .filter(|i| i.is_up() && !i.is_loopback() && !i.ips.is_empty())
        .collect();
    interfaces.sort_by_key(|i| if is_wired(i) { 0 } else { 1 });
    interfaces
}

pub fn private_ipv4_network(interface: &NetworkInterface) -> Option<Ipv4Network> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if v4.ip().is_private() => Some(*v4),
        _ => None,
    })
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if private_ipv4_network(interface).is_none() {
        return Err(ViabilityError::NoPrivateIpv4);
    }
    Ok(())
}

fn select_best_lan_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    interfaces
        .iter()
        .find(|interface| is_wired(interface))
        .or_else(|| interfaces.first())
        .cloned()
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        interface.mac.is_some_and(|mac| !mac.is_zero())
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        interface.name.starts_with("wl")
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
    use pnet::datalink::MacAddr;
    use std::net::Ipv4Addr;

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;
    const IFF_POINTTOPOINT: u32 = 1 << 4;

    fn ni(name: &str, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.into(),
            description: "".into(),
            index: 2,
            mac: Some(MacAddr::new(0xa8, 0xa1, 0x59, 0x13, 0x41, 0x46)),
            ips: ips.to_vec(),
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
    }

    #[test]
    fn viable_lan_interface_is_accepted() {
        let eth = ni("eth0", &[v4(192, 168, 0, 32, 24)], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&eth, |_| true), Ok(()));
    }

    #[test]
    fn loopback_and_vpn_are_rejected() {
        let lo = ni("lo", &[v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK);
        assert_eq!(
            is_viable_lan_interface(&lo, |_| true),
            Err(ViabilityError::NotPhysical)
        );

        let tun = ni("tun0", &[v4(10, 8, 0, 2, 24)], IFF_UP | IFF_POINTTOPOINT);
        assert_eq!(
            is_viable_lan_interface(&tun, |_| true),
            Err(ViabilityError::NotBroadcast)
        );
    }

    #[test]
    fn public_only_interface_has_no_lan() {
        let eth = ni("eth1", &[v4(203, 0, 113, 9, 24)], IFF_UP | IFF_BROADCAST);
        assert_eq!(
            is_viable_lan_interface(&eth, |_| true),
            Err(ViabilityError::NoPrivateIpv4)
        );
    }

    #[test]
    fn wired_interface_wins_selection() {
        let wlan = ni("wlan0", &[v4(192, 168, 1, 20, 24)], IFF_UP | IFF_BROADCAST);
        let eth = ni("eth0", &[v4(10, 0, 0, 20, 24)], IFF_UP | IFF_BROADCAST);
        let selected = select_best_lan_interface(vec![wlan, eth.clone()], |i| i.name == "eth0");
        assert_eq!(selected, Some(eth));
    }
}
