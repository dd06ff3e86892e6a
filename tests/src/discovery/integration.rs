use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use assetscout_common::models::{ScanPhase, ScanReport};
use assetscout_common::network::range::Ipv4Range;
use assetscout_common::network::target::{ScanRequest, ScanTarget};
use assetscout_core::DiscoveryService;
use assetscout_core::network::tcp::TcpConnectProber;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::support::{bare_enricher, config};

async fn loopback_service() -> (DiscoveryService, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let prober = Arc::new(TcpConnectProber::new(vec![port]));
    (DiscoveryService::new(config(4), prober, bare_enricher()), listener)
}

/// This test verifies that a real TCP probe sees the local listener.
#[tokio::test]
async fn discovery_single_loopback() {
    let (service, _listener) = loopback_service().await;
    let localhost = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    let report: ScanReport = service
        .scan_network(
            ScanRequest::new(ScanTarget::Host { target_addr: localhost }),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(report.phase, ScanPhase::Classified);
    let device = &report.devices[0];
    assert_eq!(device.ip, localhost);
    assert!(device.is_alive, "localhost did not answer the probe");
    assert!(device.response_time_ms.is_some());
}

/// The rest of 127/8 refuses the connection, which still proves liveness.
#[tokio::test]
#[cfg(target_os = "linux")]
async fn discovery_range_loopback() {
    let (service, _listener) = loopback_service().await;
    let range = Ipv4Range::new(Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(127, 0, 0, 3));

    let report = service
        .scan_network(
            ScanRequest::new(ScanTarget::Range { ipv4_range: range }),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.count, 3, "found incorrect amount of hosts");
    assert_eq!(report.alive().count(), 3);
}

/// Scans the machine's own LAN with the system adapters.
#[tokio::test]
#[ignore = "needs a LAN interface and sends traffic"]
async fn discovery_lan_with_system_adapters() {
    let service = DiscoveryService::with_system_adapters(config(64)).unwrap();
    let report = service
        .scan_network(ScanRequest::new(ScanTarget::Lan), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.count <= service.config().max_hosts);
    assert!(report.devices.windows(2).all(|pair| pair[0].ip < pair[1].ip));
}
