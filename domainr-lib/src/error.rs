//! Error handling for domain searches.
//!
//! One error type covers the whole pipeline: request validation, the cache,
//! the availability backends, configuration and session files.

use thiserror::Error;

/// Main error type for domainr operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainrError {
    /// Search parameters are incomplete or invalid; detected before any work starts.
    #[error("{message}")]
    Validation { message: String },

    /// No usable cache record for the key. This is a control-flow signal, not a failure.
    #[error("cache miss for '{key}'")]
    CacheMiss { key: String },

    /// The cache storage could not be read or written.
    #[error("cache storage error for '{key}': {message}")]
    CacheStorage { key: String, message: String },

    /// The backend could not be reached or did not answer.
    #[error("Couldn't connect to API: {message}")]
    SourceConnectivity { message: String },

    /// The backend answered with something that could not be decoded.
    #[error("Couldn't parse API response: {message}")]
    SourceParse { message: String },

    /// The backend answered with an explicit error message.
    #[error("{message}")]
    SourceApi { message: String },

    /// DNS resolution failed for a reason other than a non-existent domain.
    #[error("DNS lookup for '{domain}' failed: {message}")]
    Dns { domain: String, message: String },

    /// Configuration is missing, malformed or has no enabled backend.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A session file could not be read, parsed or written.
    #[error("{message}: {path}")]
    Session { path: String, message: String },

    /// Anything that does not fit the categories above.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainrError {
    /// Create a new validation error.
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache miss signal.
    pub fn cache_miss<K: Into<String>>(key: K) -> Self {
        Self::CacheMiss { key: key.into() }
    }

    /// Create a new cache storage error.
    pub fn cache_storage<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::CacheStorage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new connectivity error.
    pub fn connectivity<M: Into<String>>(message: M) -> Self {
        Self::SourceConnectivity {
            message: message.into(),
        }
    }

    /// Create a new response parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::SourceParse {
            message: message.into(),
        }
    }

    /// Create a new API error carrying the backend's own message.
    pub fn api<M: Into<String>>(message: M) -> Self {
        Self::SourceApi {
            message: message.into(),
        }
    }

    /// Create a new DNS error.
    pub fn dns<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::Dns {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new session file error.
    pub fn session<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Session {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this is the "go to the source" signal rather than a failure.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }

    /// Whether this error came from an availability backend.
    ///
    /// Source errors stop the worker that hit them; they are reported once
    /// the whole pool has finished.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceConnectivity { .. }
                | Self::SourceParse { .. }
                | Self::SourceApi { .. }
                | Self::Dns { .. }
        )
    }
}

impl From<std::io::Error> for DomainrError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<serde_json::Error> for DomainrError {
    fn from(err: serde_json::Error) -> Self {
        Self::SourceParse {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for DomainrError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("invalid TOML: {}", err),
        }
    }
}

impl From<reqwest::Error> for DomainrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(err.to_string())
        } else {
            Self::connectivity(err.to_string())
        }
    }
}
