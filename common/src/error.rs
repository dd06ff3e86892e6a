//! # Error Taxonomy
//!
//! Only [`ScanError`] and [`OnboardingError`] ever reach the caller as errors.
//! Everything else is per-host or per-device and is folded into the result
//! structures (`ScannedDevice`, `OnboardingResult`).

use std::time::Duration;

/// Request-level failures of a scan. Raised before any probe is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("range too large: {requested} addresses requested, limit is {limit}")]
    RangeTooLarge { requested: u64, limit: usize },
}

/// Why a single host did not answer the liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeFailure {
    #[error("host unreachable after {0:?}")]
    HostUnreachable(Duration),
}

/// Why one enrichment step produced nothing for one host.
///
/// Kept on the device for diagnostics only; never serialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentFailure {
    #[error("authentication rejected by {0}")]
    AuthenticationRejected(String),

    #[error("query timed out")]
    QueryTimeout,

    #[error("host does not support the query: {0}")]
    UnsupportedHost(String),

    #[error("network failure: {0}")]
    Network(String),
}

impl EnrichmentFailure {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationRejected(_))
    }
}

/// Failure of one `create equipment` call. Recorded per device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("duplicate inventory key: {0}")]
    DuplicateInventoryKey(String),

    #[error("persistence failed: {0}")]
    Persistence(String),
}

/// Structurally invalid onboarding requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("onboarding request contains no devices")]
    EmptyRequest,
}
