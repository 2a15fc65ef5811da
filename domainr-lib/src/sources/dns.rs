//! DNS-based availability checks.
//!
//! A TXT query is sent for the domain. NXDOMAIN means nobody registered it;
//! any answer (even an empty NOERROR) means the name exists. Every other
//! resolver failure is reported as an error, not guessed as available.

use crate::config::DnsConfig;
use crate::error::DomainrError;
use crate::sources::AvailabilitySource;
use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, instrument};

/// Availability source backed by a DNS resolver.
pub struct DnsSource {
    resolver: TokioAsyncResolver,
}

impl DnsSource {
    /// Create a resolver from the `[dns]` section.
    ///
    /// An empty nameserver uses Google's public resolvers.
    pub fn new(config: &DnsConfig) -> Result<Self, DomainrError> {
        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_secs(config.timeout.max(1));
        opts.attempts = 2;
        opts.use_hosts_file = false;

        let nameserver = config.nameserver.trim();
        let resolver_config = if nameserver.is_empty() {
            ResolverConfig::google()
        } else {
            let ip: IpAddr = nameserver.parse().map_err(|_| {
                DomainrError::config(format!("Invalid DNS nameserver '{}'", nameserver))
            })?;

            let mut resolver_config = ResolverConfig::new();
            resolver_config
                .add_name_server(NameServerConfig::new(SocketAddr::new(ip, 53), Protocol::Udp));
            resolver_config
        };

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        })
    }
}

#[async_trait]
impl AvailabilitySource for DnsSource {
    #[instrument(skip(self), fields(source = "dns"))]
    async fn is_available(&self, domain: &str) -> Result<bool, DomainrError> {
        // Fully qualified, so no search domains get appended
        let fqdn = if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        };

        match self.resolver.txt_lookup(fqdn).await {
            Ok(_) => Ok(false),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    debug!(%response_code, "no TXT records");
                    availability_from_code(*response_code).ok_or_else(|| {
                        DomainrError::dns(domain, format!("resolver returned {}", response_code))
                    })
                }
                _ => Err(DomainrError::dns(domain, e.to_string())),
            },
        }
    }

    fn name(&self) -> &'static str {
        "dns"
    }
}

/// Availability implied by an empty answer's response code.
fn availability_from_code(code: ResponseCode) -> Option<bool> {
    match code {
        ResponseCode::NXDomain => Some(true),
        ResponseCode::NoError => Some(false),
        _ => None,
    }
}
