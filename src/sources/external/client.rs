//! External job API client
//!
//! HTTP transport for the external provider. Every request is bounded by the
//! connect and request timeouts configured on the client.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::ExternalSourceConfig;
use crate::error::SourceError;
use crate::models::JobSearchCriteria;

const JOBS_PATH: &str = "jobs";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Transport collaborator of the external source
#[async_trait]
pub trait ExternalJobsTransport: Send + Sync {
    /// Raw provider payload for `criteria`
    async fn fetch_raw_payload(&self, criteria: &JobSearchCriteria) -> Result<String, SourceError>;

    /// Whether the provider currently answers
    async fn probe_availability(&self) -> bool;
}

/// External job API client
pub struct HttpExternalJobsClient {
    http: Client,
    base_url: Url,
}

impl HttpExternalJobsClient {
    /// Create a client for `base_url` with explicit timeouts
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl {
                url: base_url.to_string(),
                reason: "expected an http(s) base URL".to_string(),
            });
        }

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Create a client from the external source configuration
    pub fn from_config(config: &ExternalSourceConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.read_timeout_ms),
        )
    }

    /// `<base>/jobs` without any query
    fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), JOBS_PATH);
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Search URL with criteria mapped onto the provider's parameter names.
    ///
    /// title → `name`, country → `country`, min → `salary_min`,
    /// max → `salary_max`; blank or absent criteria are omitted.
    pub fn jobs_url(&self, criteria: &JobSearchCriteria) -> Url {
        let mut url = self.endpoint();
        {
            let mut query = url.query_pairs_mut();
            if let Some(title) = criteria.title_filter() {
                query.append_pair("name", title);
            }
            if let Some(country) = criteria.country_filter() {
                query.append_pair("country", country);
            }
            if let Some(min) = criteria.min_salary {
                query.append_pair("salary_min", &min.to_string());
            }
            if let Some(max) = criteria.max_salary {
                query.append_pair("salary_max", &max.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }
}

#[async_trait]
impl ExternalJobsTransport for HttpExternalJobsClient {
    async fn fetch_raw_payload(&self, criteria: &JobSearchCriteria) -> Result<String, SourceError> {
        let url = self.jobs_url(criteria);
        tracing::debug!(url = %url, "Calling external API");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(length = body.len(), "External API response received");
        Ok(body)
    }

    async fn probe_availability(&self) -> bool {
        match self.http.get(self.endpoint()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("External API health check: OK");
                true
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "External API health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "External API health check failed");
                false
            }
        }
    }
}
