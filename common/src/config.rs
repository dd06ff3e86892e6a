use std::time::Duration;

/// Upper bound on the number of addresses a single scan may expand to.
pub const DEFAULT_MAX_HOSTS: usize = 4096;
/// Fixed size of the probing and enrichment worker pools.
pub const DEFAULT_WORKERS: usize = 64;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(800);
pub const DEFAULT_ENRICH_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_ONBOARDING_CONCURRENCY: usize = 4;
pub const DEFAULT_INVENTORY_PREFIX: &str = "NET";

/// Ports tried by the TCP liveness probe. A refused connection proves the host is up.
pub const DEFAULT_PROBE_PORTS: &[u16] = &[80, 443, 22, 445, 139, 135, 3389, 9100, 631, 515, 8080, 53];

/// Policy constants for one scan pass.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_hosts: usize,
    pub workers: usize,
    pub probe_timeout: Duration,
    /// Timeout applied to each enrichment step of each host.
    pub enrich_timeout: Duration,
    /// Scan-wide deadline. `None` waits for every host.
    pub deadline: Option<Duration>,
    pub probe_ports: Vec<u16>,
    /// Disables reverse name resolution.
    pub no_dns: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_hosts: DEFAULT_MAX_HOSTS,
            workers: DEFAULT_WORKERS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            enrich_timeout: DEFAULT_ENRICH_TIMEOUT,
            deadline: None,
            probe_ports: DEFAULT_PROBE_PORTS.to_vec(),
            no_dns: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.workers >= 1, "worker pool needs at least one worker");
        anyhow::ensure!(self.max_hosts >= 1, "host ceiling must be at least 1");
        anyhow::ensure!(!self.probe_ports.is_empty(), "no probe ports configured");
        anyhow::ensure!(!self.probe_timeout.is_zero(), "probe timeout must be positive");
        Ok(())
    }
}

/// Policy constants for one bulk onboarding batch.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Number of `create equipment` calls in flight at once.
    pub concurrency: usize,
    pub inventory_prefix: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_ONBOARDING_CONCURRENCY,
            inventory_prefix: DEFAULT_INVENTORY_PREFIX.to_string(),
        }
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
