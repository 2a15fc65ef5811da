//! Core data types for domain searches.
//!
//! This module defines the search request handed in by the caller, the
//! options that size the worker pool and cache, and the events a running
//! search streams back.

use crate::error::DomainrError;
use crate::tlds::validate_tlds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default lifetime of a cached availability answer: one day.
pub const DEFAULT_CACHE_TTL: u64 = 86_400;

/// Default number of concurrent workers.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Upper bound on the worker pool regardless of configuration.
pub const MAX_CONCURRENCY: usize = 100;

/// Parameters for one search invocation.
///
/// Built fresh from the caller's current input every time a search starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Leading word parts; must not be empty
    pub first_parts: Vec<String>,

    /// Trailing word parts, concatenated after each first part; may be empty
    pub second_parts: Vec<String>,

    /// TLDs appended to every base name
    pub tlds: Vec<String>,

    /// Also reinterpret base-name endings that match a known TLD
    pub tld_substitution: bool,
}

impl SearchRequest {
    /// Create a request from the three part lists.
    pub fn new(first_parts: Vec<String>, second_parts: Vec<String>, tlds: Vec<String>) -> Self {
        Self {
            first_parts,
            second_parts,
            tlds,
            tld_substitution: false,
        }
    }

    /// Enable or disable TLD substitution.
    pub fn with_tld_substitution(mut self, enabled: bool) -> Self {
        self.tld_substitution = enabled;
        self
    }

    /// Check that the required fields are populated.
    ///
    /// `first_parts` may never be empty. `tlds` may only be empty when TLD
    /// substitution is on, and every TLD given must be a known one.
    pub fn validate(&self) -> Result<(), DomainrError> {
        if self.first_parts.is_empty() {
            return Err(DomainrError::validation(
                "\"Parts 1\" cannot be empty! Please enter a space separated list of domain parts.",
            ));
        }

        if self.tlds.is_empty() && !self.tld_substitution {
            return Err(DomainrError::validation(
                "\"TLDs\" cannot be empty! Please enter a space separated list of TLDs to scan.",
            ));
        }

        validate_tlds(&self.tlds)
    }
}

/// Answer for a single candidate domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// The candidate that was checked (e.g., "super.yachts")
    pub domain: String,

    /// Whether the domain can be registered
    pub available: bool,
}

/// Options that size a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Number of concurrent workers pulling from the candidate queue.
    /// Default: 16, Range: 1-100
    pub concurrency: usize,

    /// How long a fresh answer stays in the cache.
    /// Default: 86400 seconds
    pub cache_ttl: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL),
        }
    }
}

impl SearchOptions {
    /// Set the worker count, capped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Set the cache lifetime of fresh answers.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Workers to spawn for `candidates` pending checks.
    ///
    /// Never more workers than candidates, never fewer than one.
    pub fn pool_size(&self, candidates: usize) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY).min(candidates).max(1)
    }
}

/// Counts reported when a search finishes cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Number of candidates handed to the pool
    pub scanned: usize,

    /// Number of candidates found available
    pub found: usize,
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Search complete: Scanned {} domain(s) - {} domain(s) available",
            self.scanned, self.found
        )
    }
}

/// Progress notifications streamed from a running search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The complete, sorted list of available domains found so far.
    Found(Vec<String>),

    /// Every worker finished without a source error.
    Completed(SearchSummary),

    /// At least one worker hit a source error; carries the first one recorded.
    Failed(DomainrError),

    /// The search was superseded or cancelled before it finished.
    Cancelled,
}

impl SearchEvent {
    /// Whether no further events follow this one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchEvent::Found(_))
    }
}

/// Lifecycle of the searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No search has run yet
    Idle,

    /// Workers are checking candidates
    Running,

    /// The last search finished without errors
    Completed,

    /// The last search recorded a source error
    Failed,

    /// The last search was cancelled
    Cancelled,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchState::Idle => write!(f, "Idle"),
            SearchState::Running => write!(f, "Running"),
            SearchState::Completed => write!(f, "Completed"),
            SearchState::Failed => write!(f, "Failed"),
            SearchState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_requires_first_parts() {
        let request = SearchRequest::new(vec![], vec![], strings(&["com"]));
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("Parts 1"));
    }

    #[test]
    fn test_validate_requires_tlds_without_substitution() {
        let request = SearchRequest::new(strings(&["super"]), vec![], vec![]);
        assert!(request.validate().is_err());

        let request = request.with_tld_substitution(true);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_tld() {
        let request = SearchRequest::new(strings(&["super"]), vec![], strings(&["com", "nope"]));
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid TLD: nope");
    }

    #[test]
    fn test_concurrency_is_capped() {
        assert_eq!(SearchOptions::default().with_concurrency(0).concurrency, 1);
        assert_eq!(SearchOptions::default().with_concurrency(500).concurrency, 100);
    }

    #[test]
    fn test_pool_size_bounded_by_candidates() {
        let options = SearchOptions::default().with_concurrency(8);
        assert_eq!(options.pool_size(3), 3);
        assert_eq!(options.pool_size(1000), 8);
        assert_eq!(options.pool_size(0), 1);
    }

    #[test]
    fn test_summary_display() {
        let summary = SearchSummary {
            scanned: 6,
            found: 2,
        };
        assert_eq!(
            summary.to_string(),
            "Search complete: Scanned 6 domain(s) - 2 domain(s) available"
        );
    }

    #[test]
    fn test_terminal_events() {
        assert!(!SearchEvent::Found(vec![]).is_terminal());
        assert!(SearchEvent::Cancelled.is_terminal());
        assert!(SearchEvent::Completed(SearchSummary {
            scanned: 0,
            found: 0
        })
        .is_terminal());
    }
}
