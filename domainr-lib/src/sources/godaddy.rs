//! GoDaddy domains API backend.
//!
//! `GET /v1/domains/available?domain=<name>` authenticated with an
//! `sso-key KEY:SECRET` header. Successful answers carry `available`;
//! failures carry `code` and `message`.

use crate::config::GoDaddyConfig;
use crate::error::DomainrError;
use crate::sources::{http_client, AvailabilitySource};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Production API endpoint.
pub const GODADDY_API_URL: &str = "https://api.godaddy.com";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AvailabilityResponse {
    available: bool,
    domain: String,
    definitive: bool,
    price: Option<u64>,
    currency: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// Availability source backed by the GoDaddy API.
pub struct GoDaddySource {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl GoDaddySource {
    /// Create a client for the configured API URL, production by default.
    pub fn new(config: &GoDaddyConfig) -> Result<Self, DomainrError> {
        let base_url = match config.api_url.trim() {
            "" => GODADDY_API_URL,
            url => url,
        };
        Self::with_base_url(config, base_url)
    }

    /// Create a client for a different endpoint (OTE or a test server).
    pub fn with_base_url(config: &GoDaddyConfig, base_url: &str) -> Result<Self, DomainrError> {
        Ok(Self {
            http_client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("sso-key {}:{}", config.key, config.secret),
        })
    }
}

#[async_trait]
impl AvailabilitySource for GoDaddySource {
    #[instrument(skip(self), fields(source = "godaddy"))]
    async fn is_available(&self, domain: &str) -> Result<bool, DomainrError> {
        let url = format!("{}/v1/domains/available", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("domain", domain)])
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainrError::connectivity(format!("Couldn't read API response: {}", e)))?;

        let parsed: AvailabilityResponse =
            serde_json::from_str(&body).map_err(|e| DomainrError::parse(e.to_string()))?;

        if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
            debug!(%status, code = parsed.code.as_deref().unwrap_or(""), "API error");
            return Err(DomainrError::api(message));
        }

        debug!(
            checked = %parsed.domain,
            available = parsed.available,
            definitive = parsed.definitive,
            price = ?parsed.price,
            currency = ?parsed.currency,
            "availability answer"
        );
        Ok(parsed.available)
    }

    fn name(&self) -> &'static str {
        "godaddy"
    }
}
