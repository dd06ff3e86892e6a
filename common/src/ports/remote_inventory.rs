use std::net::IpAddr;
use std::time::Duration;

use crate::error::EnrichmentFailure;
use crate::models::DomainCredential;

/// Fields a credentialed remote query can fill in. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInventory {
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub hdd: Option<String>,
    pub domain: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

impl HostInventory {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[async_trait::async_trait]
pub trait RemoteInventory: Send + Sync {
    /// Queries OS and hardware details of a host with a domain credential.
    ///
    /// `hostname` is the reverse-resolved name, when one is known. `timeout`
    /// bounds the whole query; classes that answered in time are returned
    /// even when later ones did not.
    async fn query(
        &self,
        addr: IpAddr,
        hostname: Option<&str>,
        credential: &DomainCredential,
        timeout: Duration,
    ) -> Result<HostInventory, EnrichmentFailure>;
}
