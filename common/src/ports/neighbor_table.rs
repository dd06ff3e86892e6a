use std::net::IpAddr;

use pnet::datalink::MacAddr;

/// Read access to the local IP-to-MAC neighbor cache.
#[async_trait::async_trait]
pub trait NeighborTable: Send + Sync {
    /// Hardware address of `addr`, if this machine has seen it on the link.
    async fn lookup_mac(&self, addr: IpAddr) -> Option<MacAddr>;

    /// Name the neighbor cache tooling reports for `addr`, if any.
    async fn lookup_hostname(&self, _addr: IpAddr) -> Option<String> {
        None
    }
}
