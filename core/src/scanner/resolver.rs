use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Context;
use assetscout_common::error::EnrichmentFailure;
use assetscout_common::models::DomainCredential;
use assetscout_common::ports::HostnameResolver;
use assetscout_protocols::dns::{self, PtrAnswer};
use tokio::net::UdpSocket;
use tracing::debug;

const DNS_PORT: u16 = 53;
const RESOLV_CONF: &str = "/etc/resolv.conf";
const MAX_DNS_PACKET: usize = 1232;

/// Reverse resolution over plain UDP DNS.
///
/// One lookup never takes longer than `lookup_timeout`. The budget is split
/// evenly across the servers asked, so a silent first server leaves time for
/// the next one.
pub struct DnsResolver {
    nameservers: Vec<SocketAddr>,
    lookup_timeout: Duration,
    id_counter: AtomicU16,
}

impl DnsResolver {
    pub fn new(nameservers: Vec<IpAddr>, lookup_timeout: Duration) -> Self {
        let nameservers = nameservers.into_iter().map(|ip| SocketAddr::new(ip, DNS_PORT)).collect();
        Self::with_server_addrs(nameservers, lookup_timeout)
    }

    /// Nameservers that listen somewhere other than port 53.
    pub fn with_server_addrs(nameservers: Vec<SocketAddr>, lookup_timeout: Duration) -> Self {
        Self {
            nameservers,
            lookup_timeout,
            id_counter: AtomicU16::new(rand::random()),
        }
    }

    /// Uses the nameservers configured for this machine.
    pub fn from_system(lookup_timeout: Duration) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(RESOLV_CONF).with_context(|| format!("reading {RESOLV_CONF}"))?;
        let nameservers = parse_resolv_conf(&content);
        anyhow::ensure!(!nameservers.is_empty(), "no nameserver entries in {RESOLV_CONF}");
        Ok(Self::new(nameservers, lookup_timeout))
    }

    pub fn nameservers(&self) -> &[SocketAddr] {
        &self.nameservers
    }

    /// Directory server first when it is given as an address, then the system resolvers.
    fn servers_for(&self, credential: Option<&DomainCredential>) -> Vec<SocketAddr> {
        let directory = credential
            .and_then(|c| c.directory_server.as_deref())
            .and_then(|server| server.parse::<IpAddr>().ok())
            .map(|ip| SocketAddr::new(ip, DNS_PORT));

        let mut servers: Vec<SocketAddr> = directory.into_iter().collect();
        for server in &self.nameservers {
            if !servers.contains(server) {
                servers.push(*server);
            }
        }
        servers
    }

    async fn exchange_with(
        &self,
        server: SocketAddr,
        addr: IpAddr,
        timeout: Duration,
    ) -> Result<PtrAnswer, EnrichmentFailure> {
        let id = self.id_counter.fetch_add(1, Ordering::Relaxed);
        let packet = dns::create_ptr_packet(&addr, id).map_err(|e| EnrichmentFailure::Network(e.to_string()))?;

        let bind_addr: SocketAddr = match server.ip() {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| EnrichmentFailure::Network(e.to_string()))?;
        socket
            .connect(server)
            .await
            .map_err(|e| EnrichmentFailure::Network(e.to_string()))?;
        socket
            .send(&packet)
            .await
            .map_err(|e| EnrichmentFailure::Network(e.to_string()))?;

        let exchange = async {
            let mut buffer = vec![0u8; MAX_DNS_PACKET];
            loop {
                let len = socket
                    .recv(&mut buffer)
                    .await
                    .map_err(|e| EnrichmentFailure::Network(e.to_string()))?;
                match dns::parse_ptr_reply(&buffer[..len], id) {
                    Ok(answer) => return Ok(answer),
                    Err(e) => debug!(%server, "ignoring DNS datagram: {e}"),
                }
            }
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| EnrichmentFailure::QueryTimeout)?
    }
}

#[async_trait::async_trait]
impl HostnameResolver for DnsResolver {
    async fn reverse_lookup(
        &self,
        addr: IpAddr,
        credential: Option<&DomainCredential>,
    ) -> Result<Option<String>, EnrichmentFailure> {
        let servers = self.servers_for(credential);
        let per_server = self.lookup_timeout / servers.len().max(1) as u32;
        let mut last_failure = EnrichmentFailure::UnsupportedHost("no nameserver configured".to_string());

        for server in servers {
            match self.exchange_with(server, addr, per_server).await {
                Ok(PtrAnswer::Name(name)) => return Ok(normalize_hostname(&name)),
                Ok(PtrAnswer::NoName) => return Ok(None),
                Ok(PtrAnswer::ServerError(rcode)) => {
                    debug!(%server, %addr, rcode, "nameserver failed the PTR query");
                    last_failure = EnrichmentFailure::UnsupportedHost(format!("{server} answered rcode {rcode}"));
                }
                Err(failure) => {
                    debug!(%server, %addr, "PTR query failed: {failure}");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}

/// Lowercases and strips the trailing root dot. Empty names become `None`.
pub fn normalize_hostname(name: &str) -> Option<String> {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Extracts `nameserver` addresses, in file order.
pub fn parse_resolv_conf(content: &str) -> Vec<IpAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => fields.next(),
                _ => None,
            }
        })
        // Drop a zone index such as `fe80::1%eth0`.
        .filter_map(|value| value.split('%').next()?.parse::<IpAddr>().ok())
        .collect()
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

    /// Answers every PTR query with `name`.
    async fn spawn_fake_nameserver(name: &'static str) -> SocketAddr {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let local = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buffer = [0u8; 512];
            while let Ok((len, peer)) = socket.recv_from(&mut buffer).await {
                let mut reply = buffer[..len].to_vec();
                reply[2] |= 0x80;
                reply[7] = 1;
                reply.extend_from_slice(&[0xC0, 0x0C, 0, 12, 0, 1, 0, 0, 0, 60]);
                let mut rdata = Vec::new();
                for label in name.split('.') {
                    rdata.push(label.len() as u8);
                    rdata.extend_from_slice(label.as_bytes());
                }
                rdata.push(0);
                reply.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
                reply.extend_from_slice(&rdata);
                let _ = socket.send_to(&reply, peer).await;
            }
        });
        local
    }

    #[test]
    fn resolv_conf_is_parsed_in_order() {
        let content = "# generated\nsearch corp.local\nnameserver 10.0.0.53\n; old\nnameserver fe80::1%eth0\nnameserver bogus\noptions ndots:1\n";
        assert_eq!(
            parse_resolv_conf(content),
            vec![
                "10.0.0.53".parse::<IpAddr>().unwrap(),
                "fe80::1".parse::<IpAddr>().unwrap()
            ]
        );
    }

    #[test]
    fn hostnames_are_normalized() {
        assert_eq!(normalize_hostname("PC-07.Corp.Local."), Some("pc-07.corp.local".into()));
        assert_eq!(normalize_hostname("."), None);
    }

    #[test]
    fn directory_server_is_asked_first() {
        let resolver = DnsResolver::new(
            vec!["10.0.0.53".parse().unwrap(), "10.0.0.10".parse().unwrap()],
            Duration::from_millis(100),
        );
        let credential = DomainCredential::new("svc", "pw", Some("10.0.0.10".into()));
        assert_eq!(
            resolver.servers_for(Some(&credential)),
            vec![
                "10.0.0.10:53".parse::<SocketAddr>().unwrap(),
                "10.0.0.53:53".parse().unwrap()
            ]
        );

        let by_name = DomainCredential::new("svc", "pw", Some("dc01.corp.local".into()));
        assert_eq!(resolver.servers_for(Some(&by_name)), resolver.nameservers().to_vec());
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        // Bound but never read from.
        let silent = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let server = silent.local_addr().unwrap();
        let resolver = DnsResolver::with_server_addrs(vec![server], Duration::from_millis(100));
        let answer = resolver
            .exchange_with(server, "10.0.0.1".parse().unwrap(), Duration::from_millis(100))
            .await;
        assert_eq!(answer, Err(EnrichmentFailure::QueryTimeout));
    }

    #[tokio::test]
    async fn fake_nameserver_round_trip() {
        let server = spawn_fake_nameserver("Printer-2F.corp.local").await;
        let resolver = DnsResolver::with_server_addrs(vec![server], Duration::from_secs(1));
        let answer = resolver
            .exchange_with(server, "10.0.0.9".parse().unwrap(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(answer, PtrAnswer::Name("Printer-2F.corp.local".into()));
    }

    #[tokio::test]
    async fn silent_first_server_leaves_time_for_the_next() {
        let silent = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let answering = spawn_fake_nameserver("ws-014.corp.local").await;
        let budget = Duration::from_millis(600);
        let resolver = DnsResolver::with_server_addrs(vec![silent.local_addr().unwrap(), answering], budget);

        // The enricher wraps every step in the same budget.
        let lookup = resolver.reverse_lookup("10.0.0.14".parse().unwrap(), None);
        let answer = tokio::time::timeout(budget + Duration::from_millis(50), lookup)
            .await
            .expect("lookup overran its budget");
        assert_eq!(answer, Ok(Some("ws-014.corp.local".into())));
    }
}
