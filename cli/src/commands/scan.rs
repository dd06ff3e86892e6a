use std::time::{Duration, Instant};

use anyhow::Context;
use assetscout_common::config::{DEFAULT_PROBE_PORTS, ScanConfig};
use assetscout_common::models::{ScanReport, ScannedDevice};
use assetscout_common::network::target::{ScanParams, ScanRequest, ScanTarget, credential_from_parts};
use assetscout_common::success;
use assetscout_core::DiscoveryService;
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::commands::ScanArgs;
use crate::mprint;
use crate::terminal::input::InputHandle;
use crate::terminal::spinner::{self, SpinnerHandle};
use crate::terminal::{colors, format, print};

pub async fn scan(args: ScanArgs, quiet: u8) -> anyhow::Result<()> {
    let config = scan_config(&args);
    let request = scan_request(&args)?;
    let service = DiscoveryService::with_system_adapters(config).context("setting up the scanner")?;

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let span = info_span!("scan", indicatif.pb_show = true);
    let spinner_handle = SpinnerHandle::start(span.clone());
    if let Ok(count) = request.target.address_count() {
        spinner::report_phase(&spinner_handle, "Scanning", count as usize);
    }

    let start_time = Instant::now();
    let outcome = {
        let _input = InputHandle::start(cancel.clone());
        service.scan_network(request, &cancel).instrument(span).await
    };
    spinner_handle.stop();
    ctrl_c.abort();

    let mut report = outcome?;
    if args.alive_only {
        report = only_alive(report);
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing report to {}", path.display()))?;
        success!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        scan_ends(&report, start_time.elapsed(), quiet);
    }
    Ok(())
}

fn scan_config(args: &ScanArgs) -> ScanConfig {
    ScanConfig {
        max_hosts: args.max_hosts,
        workers: args.workers,
        probe_timeout: Duration::from_millis(args.probe_timeout_ms),
        enrich_timeout: Duration::from_millis(args.enrich_timeout_ms),
        deadline: args.deadline_secs.map(Duration::from_secs),
        probe_ports: DEFAULT_PROBE_PORTS.to_vec(),
        no_dns: args.no_dns,
    }
}

/// Flag-style targets go through the same validation as API requests. A
/// positional target (or none, meaning the LAN) is already parsed by clap.
fn scan_request(args: &ScanArgs) -> anyhow::Result<ScanRequest> {
    if args.subnet.is_some() || args.start_ip.is_some() || args.single_ip.is_some() {
        let params = ScanParams {
            subnet: args.subnet.clone(),
            start_ip: args.start_ip.clone(),
            end_ip: args.end_ip.clone(),
            single_ip: args.single_ip.clone(),
            domain_user: args.domain_user.clone(),
            domain_password: args.domain_password.clone(),
            domain_server: args.domain_server.clone(),
        };
        return Ok(ScanRequest::try_from(params)?);
    }

    let target = args.target.clone().unwrap_or(ScanTarget::Lan);
    let request = ScanRequest::new(target);
    let credential = credential_from_parts(
        args.domain_user.clone(),
        args.domain_password.clone(),
        args.domain_server.clone(),
    );
    Ok(match credential {
        Some(credential) => request.with_credential(credential),
        None => request,
    })
}

fn only_alive(report: ScanReport) -> ScanReport {
    let devices: Vec<ScannedDevice> = report.devices.into_iter().filter(|d| d.is_alive).collect();
    ScanReport::new(devices, report.phase, report.unresolved)
}

fn scan_ends(report: &ScanReport, total_time: Duration, quiet: u8) {
    if report.devices.is_empty() {
        print::header("zero hosts detected", quiet);
        print::no_results();
        return;
    }

    print::header("Network Discovery", quiet);
    if quiet < 2 {
        print_devices(&report.devices);
    }
    print_summary(report, total_time, quiet);
}

fn print_devices(devices: &[ScannedDevice]) {
    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, format::display_name(device));
        print::tree(format::device_details(device));
        if idx + 1 != devices.len() {
            mprint!();
        }
    }
}

fn print_summary(report: &ScanReport, total_time: Duration, quiet: u8) {
    let alive = report.alive().count();
    let active_hosts: ColoredString = format!("{alive} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Discovery Complete: {active_hosts} of {} in {total_time}", report.count)
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match quiet {
        0 => {
            print::rule();
            print::centerln(&output);
        }
        _ => print::print_status(&output),
    }

    if report.is_partial() {
        print::print_status(format!(
            "{} {} addresses were never probed",
            "Partial results:".yellow().bold(),
            report.unresolved
        ));
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
