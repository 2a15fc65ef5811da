//! Configuration file loading and first-run setup.
//!
//! domainr keeps its state under one base directory (default `~/.domainr`):
//!
//! ```text
//! ~/.domainr/
//! ├── config    TOML, one section per backend plus [search]
//! └── data/     availability cache, one file per domain
//! ```
//!
//! The configuration is read once at startup into a [`Config`] value that is
//! passed down explicitly; nothing here is global.

use crate::error::DomainrError;
use crate::types::{SearchOptions, DEFAULT_CACHE_TTL, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Name of the base directory inside the user's home.
pub const BASE_DIR_NAME: &str = ".domainr";

/// Default configuration written on first run.
pub const DEFAULT_CONFIG: &str = r#"[search]
concurrency = 16
cache_ttl = 86400

[dns]
enabled = false
nameserver = ""
timeout = 5

[namecheap]
api_user = ""
api_token = ""
user_name = ""
client_ip = ""
sandbox = false
enabled = false

[godaddy]
key = ""
secret = ""
api_url = ""
enabled = false
"#;

/// Complete configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub namecheap: NamecheapConfig,

    #[serde(default)]
    pub godaddy: GoDaddyConfig,
}

/// Worker pool and cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Concurrent workers, 1-100
    pub concurrency: usize,

    /// Seconds a fresh answer stays cached
    pub cache_ttl: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// DNS backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    pub enabled: bool,

    /// Resolver IP; empty means the public default resolver
    pub nameserver: String,

    /// Per-query timeout in seconds
    pub timeout: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            nameserver: String::new(),
            timeout: 5,
        }
    }
}

/// Namecheap API credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamecheapConfig {
    pub api_user: String,
    pub api_token: String,
    pub user_name: String,

    /// Whitelisted client IP the API expects with every call
    pub client_ip: String,

    /// Use the sandbox endpoint
    pub sandbox: bool,
    pub enabled: bool,
}

/// GoDaddy API credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoDaddyConfig {
    pub key: String,
    pub secret: String,

    /// API base URL; empty means production (set the OTE URL to test)
    pub api_url: String,
    pub enabled: bool,
}

/// The backend selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Dns(DnsConfig),
    Namecheap(NamecheapConfig),
    GoDaddy(GoDaddyConfig),
}

impl Backend {
    /// Short name used in logs and output.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Dns(_) => "dns",
            Backend::Namecheap(_) => "namecheap",
            Backend::GoDaddy(_) => "godaddy",
        }
    }
}

impl Config {
    /// Read and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DomainrError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainrError::config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::parse(&content).map_err(|e| match e {
            DomainrError::Config { message } => {
                DomainrError::config(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, DomainrError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DomainrError> {
        if self.search.concurrency == 0 || self.search.concurrency > MAX_CONCURRENCY {
            return Err(DomainrError::config(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            )));
        }

        if self.dns.enabled && !self.dns.nameserver.trim().is_empty() {
            self.dns
                .nameserver
                .trim()
                .parse::<std::net::IpAddr>()
                .map_err(|_| {
                    DomainrError::config(format!("Invalid DNS nameserver '{}'", self.dns.nameserver))
                })?;
        }

        Ok(())
    }

    /// Pick the backend for this run: dns, then namecheap, then godaddy.
    ///
    /// The first enabled section wins. No enabled section is fatal.
    pub fn active_backend(&self) -> Result<Backend, DomainrError> {
        if self.dns.enabled {
            Ok(Backend::Dns(self.dns.clone()))
        } else if self.namecheap.enabled {
            Ok(Backend::Namecheap(self.namecheap.clone()))
        } else if self.godaddy.enabled {
            Ok(Backend::GoDaddy(self.godaddy.clone()))
        } else {
            Err(DomainrError::config(
                "No search source enabled. Enable one of [dns], [namecheap] or [godaddy]",
            ))
        }
    }

    /// Worker pool and cache options derived from the `[search]` section.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_concurrency(self.search.concurrency)
            .with_cache_ttl(Duration::from_secs(self.search.cache_ttl))
    }

    /// Apply `DOMAINR_CONCURRENCY` and `DOMAINR_CACHE_TTL` overrides.
    ///
    /// Invalid values are logged and ignored.
    pub fn apply_env(mut self) -> Self {
        if let Ok(val) = env::var("DOMAINR_CONCURRENCY") {
            match val.parse::<usize>() {
                Ok(concurrency) if (1..=MAX_CONCURRENCY).contains(&concurrency) => {
                    debug!(concurrency, "using DOMAINR_CONCURRENCY");
                    self.search.concurrency = concurrency;
                }
                _ => warn!(value = %val, "ignoring invalid DOMAINR_CONCURRENCY, must be 1-100"),
            }
        }

        if let Ok(val) = env::var("DOMAINR_CACHE_TTL") {
            match val.parse::<u64>() {
                Ok(ttl) => {
                    debug!(ttl, "using DOMAINR_CACHE_TTL");
                    self.search.cache_ttl = ttl;
                }
                Err(_) => warn!(value = %val, "ignoring invalid DOMAINR_CACHE_TTL"),
            }
        }

        self
    }
}

/// Locations of the config file and cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Paths {
    /// Paths rooted at an explicit base directory.
    pub fn under<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            config_file: base_dir.join("config"),
            data_dir: base_dir.join("data"),
            base_dir,
        }
    }

    /// Default paths under `$HOME/.domainr`.
    pub fn default_location() -> Result<Self, DomainrError> {
        let home = env::var_os("HOME")
            .ok_or_else(|| DomainrError::config("HOME is not set; cannot locate ~/.domainr"))?;
        Ok(Self::under(Path::new(&home).join(BASE_DIR_NAME)))
    }
}

/// Create the base and data directories and write a default config if none exists.
///
/// Returns `true` when a new config file was written; the caller should ask
/// the user to fill it in, since no backend is enabled yet.
pub fn bootstrap(paths: &Paths) -> Result<bool, DomainrError> {
    create_private_dir(&paths.base_dir)?;
    create_private_dir(&paths.data_dir)?;

    if paths.config_file.exists() {
        return Ok(false);
    }

    std::fs::write(&paths.config_file, DEFAULT_CONFIG).map_err(|e| {
        DomainrError::config(format!(
            "Failed to create config file '{}': {}",
            paths.config_file.display(),
            e
        ))
    })?;
    debug!(path = %paths.config_file.display(), "wrote default config");

    Ok(true)
}

fn create_private_dir(dir: &Path) -> Result<(), DomainrError> {
    if dir.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        DomainrError::config(format!("Failed to create directory '{}': {}", dir.display(), e))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
