//! Expiring availability cache.
//!
//! Records carry their own expiry time and are checked lazily: an expired
//! record stays in storage until it is overwritten, but every read treats it
//! as absent. Nothing is ever evicted in the background.
//!
//! # Record format
//!
//! ```text
//! <expiry as decimal unix seconds>:<payload bytes>
//! ```
//!
//! The payload may contain `:`; only the first separator after the digit
//! prefix is significant.

use crate::error::DomainrError;
use crate::storage::Storage;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::trace;

const SEPARATOR: u8 = b':';

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Test helper for exercising expiry without waiting on wall-clock time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Start the clock at `now` unix seconds.
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Move the clock forward by `by`, saturating at `i64::MAX`.
    pub fn advance(&self, by: Duration) {
        let by = seconds(by);
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(by))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Key to payload cache with per-record time-to-live.
#[derive(Clone)]
pub struct AvailabilityCache {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityCache {
    /// Create a cache over `storage` using wall-clock time.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock.
    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Store `payload` under `key` until `ttl` from now, replacing any previous record.
    pub async fn save(&self, key: &str, payload: &[u8], ttl: Duration) -> Result<(), DomainrError> {
        let expires_at = self.clock.now().saturating_add(seconds(ttl));
        let record = encode_record(expires_at, payload);
        self.storage.write(key, &record).await
    }

    /// Fetch the live payload stored under `key`.
    ///
    /// Fails with [`DomainrError::CacheMiss`] when there is no record, the
    /// record cannot be decoded, or it has expired. Storage failures other
    /// than "not found" come back as [`DomainrError::CacheStorage`].
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, DomainrError> {
        let data = self.storage.read(key).await?;

        let Some((expires_at, payload)) = decode_record(&data) else {
            trace!(key, "malformed cache record");
            return Err(DomainrError::cache_miss(key));
        };

        if self.clock.now() >= expires_at {
            trace!(key, expires_at, "cache record expired");
            return Err(DomainrError::cache_miss(key));
        }

        Ok(payload.to_vec())
    }
}

impl std::fmt::Debug for AvailabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityCache").finish_non_exhaustive()
    }
}

/// Whole seconds in `d`, capped at `i64::MAX`.
fn seconds(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}

fn encode_record(expires_at: i64, payload: &[u8]) -> Vec<u8> {
    let stamp = expires_at.to_string();
    let mut record = Vec::with_capacity(stamp.len() + 1 + payload.len());
    record.extend_from_slice(stamp.as_bytes());
    record.push(SEPARATOR);
    record.extend_from_slice(payload);
    record
}

/// Split a record into its expiry and payload.
///
/// The expiry must be a non-empty run of ASCII digits directly followed by
/// the separator.
fn decode_record(data: &[u8]) -> Option<(i64, &[u8])> {
    let digits = data.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || data.get(digits) != Some(&SEPARATOR) {
        return None;
    }

    let expires_at = std::str::from_utf8(&data[..digits]).ok()?.parse().ok()?;
    Some((expires_at, &data[digits + 1..]))
}
