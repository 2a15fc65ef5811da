//! Cache-first availability checks.
//!
//! [`CachingChecker`] puts the expiring cache in front of the active
//! backend. A live cache record answers immediately; otherwise the backend
//! is asked and a successful answer is stored for the configured TTL.
//! Backend errors are never cached.

use crate::cache::AvailabilityCache;
use crate::error::DomainrError;
use crate::sources::AvailabilitySource;
use crate::types::{AvailabilityResult, DEFAULT_CACHE_TTL};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const AVAILABLE: u8 = b't';
const TAKEN: u8 = b'f';

/// Availability checker combining the cache and one backend.
///
/// # Example
///
/// ```rust,no_run
/// use domainr_lib::{AvailabilityCache, CachingChecker, DiskStorage, DnsSource, DnsConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let storage = DiskStorage::open("/tmp/domainr-cache")?;
///     let cache = AvailabilityCache::new(Arc::new(storage));
///     let source = DnsSource::new(&DnsConfig::default())?;
///
///     let checker = CachingChecker::new(cache, Arc::new(source));
///     println!("available: {}", checker.is_available("super.yachts").await?);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CachingChecker {
    cache: AvailabilityCache,
    source: Arc<dyn AvailabilitySource>,
    ttl: Duration,
}

impl CachingChecker {
    /// Create a checker with the default one-day TTL.
    pub fn new(cache: AvailabilityCache, source: Arc<dyn AvailabilitySource>) -> Self {
        Self {
            cache,
            source,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL),
        }
    }

    /// Set how long fresh answers stay cached.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Name of the backend behind the cache.
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Check one domain, answering from the cache when possible.
    pub async fn is_available(&self, domain: &str) -> Result<bool, DomainrError> {
        if let Some(available) = self.cached(domain).await {
            return Ok(available);
        }
        self.fetch(domain).await
    }

    /// Like [`is_available`](Self::is_available), but gives up before
    /// contacting the backend once `cancel` has fired.
    ///
    /// Returns `Ok(None)` when cancelled.
    pub async fn check(
        &self,
        domain: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AvailabilityResult>, DomainrError> {
        let available = match self.cached(domain).await {
            Some(available) => available,
            None if cancel.is_cancelled() => return Ok(None),
            None => self.fetch(domain).await?,
        };
        Ok(Some(AvailabilityResult {
            domain: domain.to_string(),
            available,
        }))
    }

    /// Cached answer, if a live one exists. Storage failures count as a miss.
    async fn cached(&self, domain: &str) -> Option<bool> {
        match self.cache.get(domain).await {
            Ok(payload) => match payload.first() {
                Some(&byte) => {
                    debug!(domain, "cache hit");
                    Some(byte == AVAILABLE)
                }
                None => None,
            },
            Err(e) if e.is_cache_miss() => None,
            Err(e) => {
                warn!(domain, error = %e, "cache read failed, querying source");
                None
            }
        }
    }

    async fn fetch(&self, domain: &str) -> Result<bool, DomainrError> {
        let available = self.source.is_available(domain).await?;

        let payload = [if available { AVAILABLE } else { TAKEN }];
        if let Err(e) = self.cache.save(domain, &payload, self.ttl).await {
            warn!(domain, error = %e, "failed to cache availability");
        }

        Ok(available)
    }
}

impl std::fmt::Debug for CachingChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingChecker")
            .field("source", &self.source.name())
            .field("ttl", &self.ttl)
            .finish()
    }
}
