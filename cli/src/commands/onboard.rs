use std::sync::Arc;

use anyhow::Context;
use assetscout_common::config::OnboardingConfig;
use assetscout_common::models::{
    OnboardingDevice, OnboardingRequest, OnboardingResult, ScanPhase, ScanReport, ScannedDevice,
};
use assetscout_common::ports::EquipmentStore;
use assetscout_common::warn;
use assetscout_core::OnboardingEngine;
use assetscout_core::scanner::PhaseTracker;
use assetscout_core::store::{HttpEquipmentStore, MemoryEquipmentStore};
use colored::*;
use tracing::Instrument;

use crate::commands::OnboardArgs;
use crate::terminal::{colors, print};

pub async fn onboard(args: OnboardArgs, quiet: u8) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (mut request, scan_phase) =
        parse_input(&raw).with_context(|| format!("parsing {}", args.input.display()))?;
    let mut tracker = PhaseTracker::resume(scan_phase);
    if scan_phase != ScanPhase::AwaitingSelection {
        tracker.advance(ScanPhase::AwaitingSelection);
    }
    select_devices(&mut request, &args);
    apply_defaults(&mut request, &args);

    let store: Arc<dyn EquipmentStore> = match (&args.endpoint, args.dry_run) {
        (_, true) => Arc::new(MemoryEquipmentStore::new()),
        (Some(endpoint), false) => Arc::new(HttpEquipmentStore::new(endpoint.as_str(), args.token.clone())?),
        (None, false) => anyhow::bail!("--endpoint is required unless --dry-run is set"),
    };
    let config = OnboardingConfig {
        concurrency: args.concurrency,
        inventory_prefix: args.inventory_prefix.clone(),
    };

    tracker.advance(ScanPhase::Onboarding);
    let span = tracing::info_span!("onboarding", indicatif.pb_show = true);
    let result = OnboardingEngine::new(store, config)
        .bulk_create_equipment(request)
        .instrument(span)
        .await?;
    tracker.advance(ScanPhase::Done);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, args.dry_run, quiet);
    }
    Ok(())
}

/// Accepts either a saved scan report or a ready onboarding request, and
/// tells which scan phase the input stands for.
///
/// From a report only the hosts that answered are taken, with their
/// classified category.
fn parse_input(raw: &str) -> anyhow::Result<(OnboardingRequest, ScanPhase)> {
    if let Ok(report) = serde_json::from_str::<ScanReport>(raw) {
        let request = OnboardingRequest {
            devices: report.alive().map(onboarding_device).collect(),
            defaults: Default::default(),
        };
        return Ok((request, report.phase));
    }
    let request = serde_json::from_str::<OnboardingRequest>(raw)?;
    Ok((request, ScanPhase::AwaitingSelection))
}

fn onboarding_device(device: &ScannedDevice) -> OnboardingDevice {
    OnboardingDevice {
        hostname: device.hostname.clone(),
        mac: device.mac.clone(),
        category: device.category.map(|category| category.as_str().to_string()),
        ..OnboardingDevice::new(device.ip.to_string())
    }
}

fn select_devices(request: &mut OnboardingRequest, args: &OnboardArgs) {
    if !args.select.is_empty() {
        for ip in &args.select {
            if !request.devices.iter().any(|device| device.ip.trim() == ip.trim()) {
                warn!("Selected address {ip} is not in the input");
            }
        }
        request
            .devices
            .retain(|device| args.select.iter().any(|ip| ip.trim() == device.ip.trim()));
    }

    if let Some(only) = args.only_category {
        request
            .devices
            .retain(|device| device.category.as_deref() == Some(only.as_str()));
    }
}

/// Flags replace the request defaults. `--category` also drops the
/// per-device categories, which would otherwise win over the default.
fn apply_defaults(request: &mut OnboardingRequest, args: &OnboardArgs) {
    if args.category.is_some() {
        for device in &mut request.devices {
            device.category = None;
        }
    }

    let defaults = &mut request.defaults;
    if let Some(category) = args.category {
        defaults.category = category;
    }
    if let Some(status) = args.status {
        defaults.status = status;
    }
    if args.department.is_some() {
        defaults.department = args.department.clone();
    }
    if args.room.is_some() {
        defaults.room = args.room.clone();
    }
    if args.manufacturer.is_some() {
        defaults.manufacturer = args.manufacturer.clone();
    }
}

fn print_result(result: &OnboardingResult, dry_run: bool, quiet: u8) {
    print::header(if dry_run { "Onboarding (dry run)" } else { "Onboarding" }, quiet);

    if quiet < 2 {
        for record in &result.created_records {
            print::print_status(format!(
                "{} {} {}",
                record.ip.color(colors::IPV4_ADDR),
                "->".color(colors::SEPARATOR),
                record.record_id.color(colors::ACCENT)
            ));
        }
        for failure in &result.error_details {
            print::print_status(format!(
                "{} {}",
                failure.ip.color(colors::IPV4_ADDR),
                failure.error_message.red()
            ));
        }
    }

    let created: ColoredString = format!("{} created", result.created).bold().green();
    let failed: ColoredString = if result.errors > 0 {
        format!("{} failed", result.errors).bold().red()
    } else {
        format!("{} failed", result.errors).normal()
    };
    let output = format!("Onboarding Complete: {created}, {failed}");
    match quiet {
        0 => {
            print::rule();
            print::centerln(&output);
        }
        _ => print::print_status(&output),
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
