//! Availability backends.
//!
//! Every backend exposes one capability: given a domain, say whether it can
//! be registered. Exactly one backend is active per run, chosen from the
//! configuration by [`from_backend`].

/// DNS lookups (NXDOMAIN means available)
pub mod dns;

/// GoDaddy domains API
pub mod godaddy;

/// Namecheap XML API
pub mod namecheap;

pub use dns::DnsSource;
pub use godaddy::GoDaddySource;
pub use namecheap::NamecheapSource;

use crate::config::Backend;
use crate::error::DomainrError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to registrar HTTP calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A backend that can answer "is this domain available?".
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Check one domain.
    ///
    /// Errors are backend-specific: connectivity, unparseable responses and
    /// explicit API errors are all surfaced, never mapped to "available".
    async fn is_available(&self, domain: &str) -> Result<bool, DomainrError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build the source for the selected backend.
pub fn from_backend(backend: &Backend) -> Result<Arc<dyn AvailabilitySource>, DomainrError> {
    let source: Arc<dyn AvailabilitySource> = match backend {
        Backend::Dns(config) => Arc::new(DnsSource::new(config)?),
        Backend::Namecheap(config) => Arc::new(NamecheapSource::new(config)?),
        Backend::GoDaddy(config) => Arc::new(GoDaddySource::new(config)?),
    };
    Ok(source)
}

pub(crate) fn http_client() -> Result<reqwest::Client, DomainrError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("domainr/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DomainrError::internal(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DnsConfig, GoDaddyConfig, NamecheapConfig};

    #[tokio::test]
    async fn test_factory_picks_matching_source() {
        let dns = from_backend(&Backend::Dns(DnsConfig::default())).unwrap();
        assert_eq!(dns.name(), "dns");

        let nc = from_backend(&Backend::Namecheap(NamecheapConfig::default())).unwrap();
        assert_eq!(nc.name(), "namecheap");

        let gd = from_backend(&Backend::GoDaddy(GoDaddyConfig::default())).unwrap();
        assert_eq!(gd.name(), "godaddy");
    }
}
