//! # Domainr Library
//!
//! Search for available domain names built from combinations of word parts
//! and TLDs.
//!
//! The library turns word parts into candidate domains, checks each one
//! against a single configured backend (DNS, Namecheap or GoDaddy) behind an
//! expiring on-disk cache, and streams the growing list of available
//! domains back while a bounded pool of workers runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domainr_lib::{
//!     build_request, from_backend, AvailabilityCache, CachingChecker, Config, DiskStorage,
//!     Paths, SearchEvent, SearchRequest, Searcher,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = Paths::default_location()?;
//!     let config = Config::load(&paths.config_file)?;
//!     let source = from_backend(&config.active_backend()?)?;
//!
//!     let cache = AvailabilityCache::new(Arc::new(DiskStorage::open(&paths.data_dir)?));
//!     let searcher = Searcher::new(CachingChecker::new(cache, source), config.search_options());
//!
//!     let request = SearchRequest::new(
//!         vec!["super".into(), "mega".into()],
//!         vec!["yachts".into()],
//!         vec!["com".into()],
//!     );
//!     request.validate()?;
//!
//!     let (found, outcome) = searcher.search(build_request(&request)).finish().await;
//!     if let SearchEvent::Completed(summary) = outcome {
//!         println!("{}\n{}", found.join("\n"), summary);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Query building**: word part combinations with optional TLD substitution
//! - **Expiring cache**: lazy TTL records over pluggable key/value storage
//! - **Pluggable backends**: DNS, Namecheap or GoDaddy behind one trait
//! - **Bounded concurrency**: shared-queue worker pool with cancellation
//! - **Sessions**: save and restore searches as JSON

// Re-export main public API types and functions
// This makes them available as domainr_lib::TypeName
pub use cache::{AvailabilityCache, Clock, ManualClock, SystemClock};
pub use checker::CachingChecker;
pub use config::{
    bootstrap, Backend, Config, DnsConfig, GoDaddyConfig, NamecheapConfig, Paths, SearchSection,
    BASE_DIR_NAME, DEFAULT_CONFIG,
};
pub use error::DomainrError;
pub use query::{build_query, build_request, parse_parts};
pub use search::{SearchHandle, Searcher};
pub use session::Session;
pub use sources::{
    from_backend, AvailabilitySource, DnsSource, GoDaddySource, NamecheapSource,
};
pub use storage::{DiskStorage, MemoryStorage, Storage};
pub use tlds::{is_known_tld, known_tlds, validate_tlds};
pub use types::{
    AvailabilityResult, SearchEvent, SearchOptions, SearchRequest, SearchState, SearchSummary,
    DEFAULT_CACHE_TTL, DEFAULT_CONCURRENCY, MAX_CONCURRENCY,
};

// Public modules
pub mod sources;

// Internal modules - these are not part of the public API
mod cache;
mod checker;
mod config;
mod error;
mod query;
mod search;
mod session;
mod storage;
mod tlds;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainrError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
