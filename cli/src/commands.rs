pub mod info;
pub mod onboard;
pub mod scan;

use std::path::PathBuf;

use assetscout_common::config::{
    DEFAULT_ENRICH_TIMEOUT, DEFAULT_INVENTORY_PREFIX, DEFAULT_MAX_HOSTS, DEFAULT_ONBOARDING_CONCURRENCY,
    DEFAULT_PROBE_TIMEOUT, DEFAULT_WORKERS,
};
use assetscout_common::models::{EquipmentCategory, EquipmentStatus};
use assetscout_common::network::target::ScanTarget;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "assetscout")]
#[command(version, about = "Discover network assets and onboard them into inventory.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output (-q hides headers, -qq hides per-device details)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the effective scan policy and the detected LAN
    #[command(alias = "i")]
    Info,
    /// Discover and describe the hosts of a target
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Create inventory records for scanned devices
    #[command(alias = "o")]
    Onboard(OnboardArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// lan, an address, a range (A.B.C.D-E) or a CIDR block. Defaults to lan.
    #[arg(conflicts_with_all = ["subnet", "start_ip", "single_ip"])]
    pub target: Option<ScanTarget>,

    /// CIDR block to scan
    #[arg(long)]
    pub subnet: Option<String>,

    /// First address of a range, or an abbreviated range
    #[arg(long)]
    pub start_ip: Option<String>,

    /// Last address of a range
    #[arg(long, requires = "start_ip")]
    pub end_ip: Option<String>,

    #[arg(long)]
    pub single_ip: Option<String>,

    /// Domain account for remote inventory queries
    #[arg(long)]
    pub domain_user: Option<String>,

    #[arg(long, env = "ASSETSCOUT_DOMAIN_PASSWORD", hide_env_values = true)]
    pub domain_password: Option<String>,

    /// Directory server (domain controller), IP or FQDN
    #[arg(long)]
    pub domain_server: Option<String>,

    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    pub probe_timeout_ms: u64,

    /// Timeout of each enrichment step, per host
    #[arg(long, default_value_t = DEFAULT_ENRICH_TIMEOUT.as_millis() as u64)]
    pub enrich_timeout_ms: u64,

    /// Stop the whole scan after this many seconds and keep what was found
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_MAX_HOSTS)]
    pub max_hosts: usize,

    /// Skip reverse DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Leave hosts that did not answer out of the output
    #[arg(long)]
    pub alive_only: bool,

    /// Print the report as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OnboardArgs {
    /// Scan report or onboarding request (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Only onboard these addresses
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Only onboard devices classified into this category
    #[arg(long)]
    pub only_category: Option<EquipmentCategory>,

    /// Category for every onboarded device, replacing the classified one
    #[arg(long)]
    pub category: Option<EquipmentCategory>,

    #[arg(long)]
    pub status: Option<EquipmentStatus>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub room: Option<String>,

    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Base URL of the inventory API
    #[arg(long, env = "ASSETSCOUT_ENDPOINT", required_unless_present = "dry_run")]
    pub endpoint: Option<String>,

    #[arg(long, env = "ASSETSCOUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Create records in memory only
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, default_value_t = DEFAULT_ONBOARDING_CONCURRENCY)]
    pub concurrency: usize,

    #[arg(long, default_value = DEFAULT_INVENTORY_PREFIX)]
    pub inventory_prefix: String,

    #[arg(long)]
    pub json: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
