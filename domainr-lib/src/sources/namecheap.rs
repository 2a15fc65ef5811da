//! Namecheap XML API backend.
//!
//! Uses the `namecheap.domains.check` command. Credentials travel as query
//! parameters; the answer is an XML document with either a
//! `DomainCheckResult` element or one or more `Error` elements.

use crate::config::NamecheapConfig;
use crate::error::DomainrError;
use crate::sources::{http_client, AvailabilitySource};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument};

/// Production API endpoint.
pub const NAMECHEAP_API_URL: &str = "https://api.namecheap.com/xml.response";

/// Sandbox API endpoint.
pub const NAMECHEAP_SANDBOX_URL: &str = "https://api.sandbox.namecheap.com/xml.response";

lazy_static::lazy_static! {
    static ref ERROR_RE: Regex = Regex::new(r"<Error\b[^>]*>([^<]*)</Error>").unwrap();
    static ref RESULT_RE: Regex =
        Regex::new(r#"<DomainCheckResult\b[^>]*\bAvailable="(true|false)""#).unwrap();
}

/// Availability source backed by the Namecheap API.
pub struct NamecheapSource {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: NamecheapConfig,
}

impl NamecheapSource {
    /// Create a client for the production or sandbox API, per `config.sandbox`.
    pub fn new(config: &NamecheapConfig) -> Result<Self, DomainrError> {
        let endpoint = if config.sandbox {
            NAMECHEAP_SANDBOX_URL
        } else {
            NAMECHEAP_API_URL
        };
        Self::with_endpoint(config, endpoint)
    }

    /// Create a client for an explicit endpoint URL.
    pub fn with_endpoint(config: &NamecheapConfig, endpoint: &str) -> Result<Self, DomainrError> {
        Ok(Self {
            http_client: http_client()?,
            endpoint: endpoint.to_string(),
            credentials: config.clone(),
        })
    }
}

#[async_trait]
impl AvailabilitySource for NamecheapSource {
    #[instrument(skip(self), fields(source = "namecheap"))]
    async fn is_available(&self, domain: &str) -> Result<bool, DomainrError> {
        let creds = &self.credentials;
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("ApiUser", creds.api_user.as_str()),
                ("ApiKey", creds.api_token.as_str()),
                ("UserName", creds.user_name.as_str()),
                ("ClientIp", creds.client_ip.as_str()),
                ("Command", "namecheap.domains.check"),
                ("DomainList", domain),
            ])
            .send()
            .await?;

        let body = response
            .text()
            .await
            .map_err(|e| DomainrError::connectivity(format!("Couldn't read API response: {}", e)))?;

        parse_check_response(&body)
    }

    fn name(&self) -> &'static str {
        "namecheap"
    }
}

/// Decode a `namecheap.domains.check` response for a single domain.
fn parse_check_response(body: &str) -> Result<bool, DomainrError> {
    let errors: Vec<&str> = ERROR_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|message| !message.is_empty())
        .collect();

    if !errors.is_empty() {
        debug!(count = errors.len(), "API returned errors");
        return Err(DomainrError::api(errors.join("; ")));
    }

    match RESULT_RE.captures(body).and_then(|caps| caps.get(1)) {
        Some(m) => Ok(m.as_str() == "true"),
        None => Err(DomainrError::parse("missing DomainCheckResult element")),
    }
}
