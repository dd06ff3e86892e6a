use std::net::IpAddr;

use crate::error::EnrichmentFailure;
use crate::models::DomainCredential;

#[async_trait::async_trait]
pub trait HostnameResolver: Send + Sync {
    /// Reverse lookup of `addr`.
    ///
    /// `Ok(None)` means the resolvers answered but know no name. When a
    /// credential names a directory server, implementations may ask it first.
    async fn reverse_lookup(
        &self,
        addr: IpAddr,
        credential: Option<&DomainCredential>,
    ) -> Result<Option<String>, EnrichmentFailure>;
}
