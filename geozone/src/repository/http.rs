//! Zone repository backed by an HTTP endpoint.
//!
//! Fetches the zone table as a JSON array. When an API key is configured it
//! is sent both as an `apikey` header and as a bearer token, which is what
//! PostgREST-style gateways expect.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use super::error::RepositoryError;
use super::record::parse_zones;
use super::ZoneRepository;
use crate::zone::ZoneSet;

/// Fetches zone records over HTTP.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a request
/// timeout.
#[derive(Debug, Clone)]
pub struct HttpZoneRepository {
    http: reqwest::Client,
    url: String,
}

impl HttpZoneRepository {
    /// Create a repository for `url`.
    ///
    /// Fails if the API key is not a valid header value or the HTTP client
    /// cannot be built.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| RepositoryError::Unavailable(format!("invalid API key: {}", e)))?;
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| RepositoryError::Unavailable(format!("invalid API key: {}", e)))?;
            bearer.set_sensitive(true);
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ZoneRepository for HttpZoneRepository {
    async fn load_zones(&self) -> Result<ZoneSet, RepositoryError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        let parsed = parse_zones(&bytes)?;

        tracing::debug!(
            url = %self.url,
            bytes = bytes.len(),
            zones = parsed.zones.len(),
            skipped = parsed.skipped.len(),
            "Zone table fetched"
        );

        Ok(parsed.zones)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
