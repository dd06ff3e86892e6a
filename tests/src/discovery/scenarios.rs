use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use assetscout_common::error::{EnrichmentFailure, ScanError};
use assetscout_common::models::{DomainCredential, EquipmentCategory, ScanPhase};
use assetscout_common::network::range::Ipv4Range;
use assetscout_common::network::target::{ScanRequest, ScanTarget};
use assetscout_common::ports::MacAddr;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::support::{
    RejectingInventory, ScriptedProber, SlowResolver, StaticNeighbors, StaticResolver, bare_enricher, config,
    service, v4,
};

fn range(start: Ipv4Addr, end: Ipv4Addr) -> ScanRequest {
    ScanRequest::new(ScanTarget::Range {
        ipv4_range: Ipv4Range::new(start, end),
    })
}

#[tokio::test]
async fn oversized_target_fails_without_probing() {
    let prober = Arc::new(ScriptedProber::default());
    let service = service(config(64), Arc::clone(&prober), bare_enricher());
    let request = ScanRequest::new(ScanTarget::Subnet {
        network: Ipv4Addr::new(10, 0, 0, 0),
        prefix: 8,
    });

    let err = service
        .scan_network(request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ScanError::RangeTooLarge {
            requested: 16_777_214,
            limit: 4096
        }
    );
    assert_eq!(prober.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn report_order_ignores_completion_order() {
    // Later addresses answer first.
    let addrs: Vec<IpAddr> = (1..=20).map(|d| v4(10, 0, 0, d)).collect();
    let mut prober = ScriptedProber::alive(addrs.iter().copied().filter(|ip| ip != &v4(10, 0, 0, 7)));
    for (i, addr) in addrs.iter().enumerate() {
        prober = prober.with_delay(*addr, Duration::from_millis(500 - 20 * i as u64));
    }
    let prober = Arc::new(prober);
    let service = service(config(8), Arc::clone(&prober), bare_enricher());

    let report = service
        .scan_network(
            range(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 20)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let reported: Vec<IpAddr> = report.devices.iter().map(|d| d.ip).collect();
    assert_eq!(reported, addrs);
    assert_eq!(report.count, report.devices.len());
    assert_eq!(report.count, 20);
    assert_eq!(report.unresolved, 0);
    assert_eq!(report.phase, ScanPhase::Classified);
    assert_eq!(prober.calls(), 20);

    let unique: HashSet<IpAddr> = reported.iter().copied().collect();
    assert_eq!(unique.len(), 20);

    let silent = &report.devices[6];
    assert!(!silent.is_alive);
    assert!(silent.category.is_none());
    assert!(report.devices.iter().filter(|d| d.is_alive).all(|d| d.category.is_some()));
}

#[tokio::test]
async fn auth_rejection_stays_with_its_host() {
    let hosts = [v4(10, 1, 0, 1), v4(10, 1, 0, 2), v4(10, 1, 0, 3)];
    let prober = Arc::new(ScriptedProber::alive(hosts));
    let inventory = Arc::new(RejectingInventory {
        rejecting: HashSet::from([hosts[1]]),
        ..RejectingInventory::default()
    });
    let names = HashMap::from([
        (hosts[0], "ws-001".to_string()),
        (hosts[1], "ws-002".to_string()),
        (hosts[2], "ws-003".to_string()),
    ]);
    let enricher = bare_enricher()
        .with_resolver(Arc::new(StaticResolver(names)))
        .with_inventory(inventory.clone());

    let request = range(Ipv4Addr::new(10, 1, 0, 1), Ipv4Addr::new(10, 1, 0, 3))
        .with_credential(DomainCredential::new("svc-scan", "s3cret", Some("dc01.corp.example".into())));
    let report = service(config(4), prober, enricher)
        .scan_network(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.phase, ScanPhase::Classified);
    assert_eq!(inventory.queries.load(Ordering::SeqCst), 3);

    let rejected = &report.devices[1];
    assert!(rejected.is_alive);
    assert_eq!(rejected.hostname.as_deref(), Some("ws-002"));
    assert!(!rejected.has_extended_fields());
    assert!(rejected.failures.iter().any(EnrichmentFailure::is_auth));

    for device in [&report.devices[0], &report.devices[2]] {
        assert_eq!(device.ram.as_deref(), Some("16.0 GB"));
        assert_eq!(device.domain.as_deref(), Some("corp.example"));
        assert_eq!(device.category, Some(EquipmentCategory::Computer));
        assert!(device.failures.is_empty());
    }
}

#[tokio::test]
async fn inventory_is_not_queried_without_credential() {
    let host = v4(10, 2, 0, 1);
    let inventory = Arc::new(RejectingInventory::default());
    let enricher = bare_enricher().with_inventory(inventory.clone());
    let report = service(config(4), Arc::new(ScriptedProber::alive([host])), enricher)
        .scan_network(ScanRequest::new(ScanTarget::Host { target_addr: host }), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(inventory.queries.load(Ordering::SeqCst), 0);
    assert!(!report.devices[0].has_extended_fields());
}

#[tokio::test(start_paused = true)]
async fn deadline_returns_partial_results() {
    let prober = Arc::new(ScriptedProber::alive((1..=100).map(|d| v4(10, 3, 0, d))).with_default_delay(Duration::from_secs(1)));
    let mut cfg = config(4);
    cfg.deadline = Some(Duration::from_millis(2500));
    let service = service(cfg, Arc::clone(&prober), bare_enricher());

    let started = Instant::now();
    let report = service
        .scan_network(
            range(Ipv4Addr::new(10, 3, 0, 1), Ipv4Addr::new(10, 3, 0, 100)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.phase, ScanPhase::PartialResults);
    assert!(report.count <= 100);
    assert_eq!(report.count, 8);
    assert_eq!(report.count + report.unresolved, 100);

    let reported: Vec<IpAddr> = report.devices.iter().map(|d| d.ip).collect();
    let expected: Vec<IpAddr> = (1..=8).map(|d| v4(10, 3, 0, d)).collect();
    assert_eq!(reported, expected);

    let deadline = started + Duration::from_millis(2500);
    assert!(prober.start_times().iter().all(|(_, at)| *at < deadline));
    assert_eq!(prober.calls(), 12);
}

#[tokio::test(start_paused = true)]
async fn deadline_during_enrichment_keeps_probe_results() {
    let hosts: Vec<IpAddr> = (1..=4).map(|d| v4(10, 5, 0, d)).collect();
    let prober = Arc::new(ScriptedProber::alive(hosts.iter().copied()));
    let enricher = bare_enricher().with_resolver(Arc::new(SlowResolver {
        delay: Duration::from_secs(2),
    }));
    let mut cfg = config(2);
    cfg.deadline = Some(Duration::from_secs(3));

    let report = service(cfg, Arc::clone(&prober), enricher)
        .scan_network(
            range(Ipv4Addr::new(10, 5, 0, 1), Ipv4Addr::new(10, 5, 0, 4)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.phase, ScanPhase::PartialResults);
    assert_eq!(report.count, 4);
    assert_eq!(report.unresolved, 0);
    assert_eq!(prober.calls(), 4);

    let reported: Vec<IpAddr> = report.devices.iter().map(|d| d.ip).collect();
    assert_eq!(reported, hosts);
    assert!(report.devices.iter().all(|d| d.is_alive && d.response_time_ms.is_some()));
    assert!(report.devices.iter().all(|d| d.category.is_some()));

    // Two workers finish the first pair at 2s; the second pair is cut at 3s.
    let names: Vec<Option<&str>> = report.devices.iter().map(|d| d.hostname.as_deref()).collect();
    assert_eq!(names, [Some("host-1"), Some("host-2"), None, None]);
}

#[tokio::test]
async fn cancelled_scan_dispatches_nothing() {
    let prober = Arc::new(ScriptedProber::alive([v4(10, 4, 0, 1)]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = service(config(4), Arc::clone(&prober), bare_enricher())
        .scan_network(range(Ipv4Addr::new(10, 4, 0, 1), Ipv4Addr::new(10, 4, 0, 10)), &cancel)
        .await
        .unwrap();

    assert_eq!(report.phase, ScanPhase::PartialResults);
    assert_eq!(report.count, 0);
    assert_eq!(report.unresolved, 10);
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn neighbor_mac_drives_vendor_and_printer_category() {
    let host = v4(192, 168, 1, 40);
    let neighbors = StaticNeighbors(HashMap::from([(host, MacAddr::new(0x3c, 0xd9, 0x2b, 0x01, 0x02, 0x03))]));
    let enricher = assetscout_core::scanner::enricher::Enricher::new(
        Arc::new(neighbors),
        Arc::new(crate::support::PrefixVendors),
        Duration::from_secs(1),
    )
    .with_resolver(Arc::new(StaticResolver(HashMap::from([(
        host,
        "HP-LaserJet-3F".to_string(),
    )]))));

    let report = service(config(2), Arc::new(ScriptedProber::alive([host])), enricher)
        .scan_network(ScanRequest::new(ScanTarget::Host { target_addr: host }), &CancellationToken::new())
        .await
        .unwrap();

    let device = &report.devices[0];
    assert_eq!(device.mac.as_deref(), Some("3C:D9:2B:01:02:03"));
    assert_eq!(device.vendor.as_deref(), Some("Hewlett Packard"));
    assert_eq!(device.category, Some(EquipmentCategory::Printer));
}
