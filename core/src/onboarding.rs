//! # Bulk Onboarding
//!
//! Turns a selection of scanned devices into equipment records. Every device
//! is validated, built and created on its own; one bad entry never affects
//! the rest of the batch and no transaction spans it.

use std::net::IpAddr;
use std::sync::Arc;

use assetscout_common::config::OnboardingConfig;
use assetscout_common::error::{CreateError, OnboardingError};
use assetscout_common::models::{
    DeviceSpecifications, EquipmentCategory, EquipmentPayload, EquipmentStatus, OnboardingDefaults,
    OnboardingDevice, OnboardingRequest, OnboardingResult, RecordId,
};
use assetscout_common::ports::EquipmentStore;
use assetscout_common::{info, success, warn};
use futures::stream::{self, StreamExt};
use tracing::{Instrument, debug};

use crate::scanner::neighbor::{normalize_mac, parse_mac};

pub struct OnboardingEngine {
    store: Arc<dyn EquipmentStore>,
    config: OnboardingConfig,
}

impl OnboardingEngine {
    pub fn new(store: Arc<dyn EquipmentStore>, config: OnboardingConfig) -> Self {
        Self { store, config }
    }

    /// Creates one record per device and reports each outcome.
    ///
    /// `created + errors` always equals the number of devices. An empty
    /// device list is the only request-level failure.
    pub async fn bulk_create_equipment(&self, request: OnboardingRequest) -> Result<OnboardingResult, OnboardingError> {
        if request.devices.is_empty() {
            return Err(OnboardingError::EmptyRequest);
        }

        let total = request.devices.len();
        let suffix = timestamp_suffix(chrono::Utc::now().timestamp_millis());
        let suffix = suffix.as_str();
        let defaults = &request.defaults;
        info!("Onboarding {total} devices into category {} by default", defaults.category);

        let outcomes = stream::iter(request.devices)
            .map(|device| {
                let ip = device.ip.clone();
                async move {
                    let outcome = self.onboard_one(device, defaults, suffix).await;
                    (ip, outcome)
                }
            })
            .buffer_unordered(self.config.concurrency.max(1));

        let result = outcomes
            .fold(OnboardingResult::default(), |result, (ip, outcome)| async move {
                match outcome {
                    Ok(record_id) => {
                        debug!(%ip, %record_id, "equipment created");
                        result.record_success(ip, record_id)
                    }
                    Err(e) => {
                        warn!("Could not onboard {ip}: {e}");
                        result.record_failure(ip, e.to_string())
                    }
                }
            })
            .instrument(tracing::info_span!("onboard", devices = total))
            .await;

        success!("Onboarding finished: {} created, {} failed", result.created, result.errors);
        Ok(result)
    }

    async fn onboard_one(
        &self,
        device: OnboardingDevice,
        defaults: &OnboardingDefaults,
        suffix: &str,
    ) -> Result<RecordId, CreateError> {
        let payload = build_payload(&device, defaults, &self.config.inventory_prefix, suffix)?;
        self.store.create_equipment(&payload).await
    }
}

/// Validates one device and merges it with the batch defaults.
pub fn build_payload(
    device: &OnboardingDevice,
    defaults: &OnboardingDefaults,
    prefix: &str,
    suffix: &str,
) -> Result<EquipmentPayload, CreateError> {
    let ip: IpAddr = device
        .ip
        .trim()
        .parse()
        .map_err(|_| CreateError::Validation(format!("invalid IP address '{}'", device.ip)))?;

    let mac = match present(&device.mac) {
        Some(raw) => Some(
            parse_mac(raw)
                .map(normalize_mac)
                .ok_or_else(|| CreateError::Validation(format!("invalid MAC address '{raw}'")))?,
        ),
        None => None,
    };

    let category = match present(&device.category) {
        Some(raw) => raw.parse::<EquipmentCategory>().map_err(CreateError::Validation)?,
        None => defaults.category,
    };
    let status = match present(&device.status) {
        Some(raw) => raw.parse::<EquipmentStatus>().map_err(CreateError::Validation)?,
        None => defaults.status,
    };

    let hostname = present(&device.hostname).map(str::to_string);
    let name = present(&device.name)
        .map(str::to_string)
        .unwrap_or_else(|| device_name(hostname.as_deref(), ip));
    let inventory_number = present(&device.inventory_number)
        .map(str::to_string)
        .unwrap_or_else(|| inventory_number(prefix, ip, suffix));

    Ok(EquipmentPayload {
        name,
        inventory_number,
        category,
        status,
        location_department: defaults.department.clone(),
        location_room: defaults.room.clone(),
        manufacturer: defaults.manufacturer.clone(),
        ip_address: ip.to_string(),
        specifications: DeviceSpecifications { hostname, mac },
    })
}

/// First hostname label with an upper-case initial, or `Network device <ip>`.
pub fn device_name(hostname: Option<&str>, ip: IpAddr) -> String {
    let label = hostname.and_then(|h| h.split('.').next()).filter(|l| !l.is_empty());
    match label {
        Some(label) => {
            let mut chars = label.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => format!("Network device {ip}"),
            }
        }
        None => format!("Network device {ip}"),
    }
}

/// `<prefix>-<network part>-<host part>-<suffix>`.
///
/// For IPv4 the network part is the first three octets, each padded to three
/// digits, and the host part is the last octet padded the same way
/// (`192.168.1.5` -> `NET-192168001-005-123456`). IPv6 uses the first three
/// segments padded to four hex digits, then the last segment.
pub fn inventory_number(prefix: &str, ip: IpAddr, suffix: &str) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{prefix}-{a:03}{b:03}{c:03}-{d:03}-{suffix}")
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            format!(
                "{prefix}-{:04x}{:04x}{:04x}-{:04x}-{suffix}",
                segments[0], segments[1], segments[2], segments[7]
            )
        }
    }
}

/// Last six digits of a millisecond timestamp.
pub fn timestamp_suffix(millis: i64) -> String {
    format!("{:06}", millis.rem_euclid(1_000_000))
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
