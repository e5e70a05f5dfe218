//! External API JobSource implementation

use async_trait::async_trait;
use std::sync::Arc;

use super::client::ExternalJobsTransport;
use super::normalize::ExternalResponseAdapter;
use crate::error::SourceError;
use crate::models::{Job, JobSearchCriteria, SOURCE_EXTERNAL_API};
use crate::sources::JobSource;

/// Job source backed by the external job API
pub struct ExternalJobSource {
    transport: Arc<dyn ExternalJobsTransport>,
    adapter: ExternalResponseAdapter,
}

impl ExternalJobSource {
    pub fn new(transport: Arc<dyn ExternalJobsTransport>, adapter: ExternalResponseAdapter) -> Self {
        Self { transport, adapter }
    }

    /// Create with the default adapter
    pub fn with_transport(transport: Arc<dyn ExternalJobsTransport>) -> Self {
        Self::new(transport, ExternalResponseAdapter::default())
    }
}

#[async_trait]
impl JobSource for ExternalJobSource {
    async fn search(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError> {
        tracing::debug!(?criteria, "Searching external jobs");

        let raw = match self.transport.fetch_raw_payload(criteria).await {
            Ok(raw) => raw,
            Err(e) => {
                // Degrade to no results so the other sources still answer
                tracing::error!(error = %e, "Error fetching from external source");
                return Ok(Vec::new());
            }
        };

        let jobs: Vec<Job> = self
            .adapter
            .adapt(Some(&raw))
            .into_iter()
            .map(|normalized| normalized.into_job(self.name()))
            .collect();

        tracing::debug!(count = jobs.len(), "Found jobs from external source");
        Ok(jobs)
    }

    fn name(&self) -> &str {
        SOURCE_EXTERNAL_API
    }

    async fn is_available(&self) -> Result<bool, SourceError> {
        Ok(self.transport.probe_availability().await)
    }
}
