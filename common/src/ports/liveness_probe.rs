use std::net::IpAddr;
use std::time::Duration;

use crate::error::ProbeFailure;

#[async_trait::async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Checks whether `addr` answers within `timeout`.
    ///
    /// Returns the measured round trip on success.
    async fn probe(&self, addr: IpAddr, timeout: Duration) -> Result<Duration, ProbeFailure>;
}
