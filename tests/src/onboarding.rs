use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use assetscout_common::config::OnboardingConfig;
use assetscout_common::error::OnboardingError;
use assetscout_common::models::{
    EquipmentCategory, EquipmentStatus, OnboardingDefaults, OnboardingDevice, OnboardingRequest,
};
use assetscout_core::OnboardingEngine;
use assetscout_core::store::MemoryEquipmentStore;

use crate::support::FlakyStore;

fn device(ip: &str, hostname: Option<&str>) -> OnboardingDevice {
    OnboardingDevice {
        hostname: hostname.map(str::to_string),
        ..OnboardingDevice::new(ip)
    }
}

#[tokio::test]
async fn one_invalid_device_does_not_sink_the_batch() {
    let store = Arc::new(MemoryEquipmentStore::new());
    let engine = OnboardingEngine::new(store.clone(), OnboardingConfig::default());
    let request = OnboardingRequest {
        devices: vec![
            device("192.168.10.11", Some("pc-accounting-1.corp.example")),
            device("192.168.10.12", None),
            device("192.168.10.300", Some("broken")),
            device("192.168.10.14", Some("hp-laserjet-2f")),
            device("192.168.10.15", None),
        ],
        defaults: OnboardingDefaults {
            category: EquipmentCategory::Computer,
            status: EquipmentStatus::InUse,
            department: Some("Accounting".into()),
            room: Some("2.14".into()),
            manufacturer: None,
        },
    };

    let result = engine.bulk_create_equipment(request).await.unwrap();

    assert_eq!(result.created, 4);
    assert_eq!(result.errors, 1);
    assert_eq!(result.total(), 5);
    assert_eq!(result.error_details.len(), 1);
    assert_eq!(result.error_details[0].ip, "192.168.10.300");

    assert_eq!(store.len(), 4);
    for ip in ["192.168.10.11", "192.168.10.12", "192.168.10.14", "192.168.10.15"] {
        assert!(store.contains_ip(ip), "{ip} missing from store");
    }

    let records = store.records();
    let first = records
        .iter()
        .find(|(_, payload)| payload.ip_address == "192.168.10.11")
        .map(|(_, payload)| payload)
        .unwrap();
    assert_eq!(first.name, "Pc-accounting-1");
    assert!(first.inventory_number.starts_with("NET-192168010-011-"));
    assert_eq!(first.status, EquipmentStatus::InUse);
    assert_eq!(first.location_department.as_deref(), Some("Accounting"));

    let unnamed = records
        .iter()
        .find(|(_, payload)| payload.ip_address == "192.168.10.12")
        .map(|(_, payload)| payload)
        .unwrap();
    assert_eq!(unnamed.name, "Network device 192.168.10.12");
}

#[tokio::test]
async fn store_failures_are_reported_per_device() {
    let store = Arc::new(FlakyStore {
        failing: HashSet::from(["10.9.0.2".to_string()]),
        ..FlakyStore::default()
    });
    let engine = OnboardingEngine::new(store.clone(), OnboardingConfig::default());
    let request = OnboardingRequest {
        devices: (1..=3).map(|d| device(&format!("10.9.0.{d}"), None)).collect(),
        defaults: OnboardingDefaults::default(),
    };

    let result = engine.bulk_create_equipment(request).await.unwrap();

    assert_eq!((result.created, result.errors), (2, 1));
    assert_eq!(result.error_details[0].ip, "10.9.0.2");
    assert!(result.error_details[0].error_message.contains("connection reset"));
    let mut created_ips: Vec<&str> = result.created_records.iter().map(|r| r.ip.as_str()).collect();
    created_ips.sort();
    assert_eq!(created_ips, ["10.9.0.1", "10.9.0.3"]);
}

#[tokio::test]
async fn calls_in_flight_stay_under_the_limit() {
    let store = Arc::new(FlakyStore::default());
    let config = OnboardingConfig {
        concurrency: 2,
        ..OnboardingConfig::default()
    };
    let engine = OnboardingEngine::new(store.clone(), config);
    let request = OnboardingRequest {
        devices: (1..=10).map(|d| device(&format!("10.8.0.{d}"), None)).collect(),
        defaults: OnboardingDefaults::default(),
    };

    let result = engine.bulk_create_equipment(request).await.unwrap();

    assert_eq!(result.created, 10);
    assert!(store.max_in_flight.load(Ordering::SeqCst) <= 2);
    assert_eq!(store.created.lock().unwrap().len(), 10);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let engine = OnboardingEngine::new(Arc::new(MemoryEquipmentStore::new()), OnboardingConfig::default());
    let request = OnboardingRequest {
        devices: Vec::new(),
        defaults: OnboardingDefaults::default(),
    };

    assert_eq!(
        engine.bulk_create_equipment(request).await.unwrap_err(),
        OnboardingError::EmptyRequest
    );
}
