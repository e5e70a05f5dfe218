//! Composite job source
//!
//! Fans a search out to every registered source concurrently and merges the
//! partial results into one deduplicated list. A source that errors, reports
//! itself unavailable, panics or overruns the per-source timeout contributes
//! nothing; it never fails the aggregate search.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tokio::time::timeout;

use crate::dedup::deduplicate;
use crate::error::SourceError;
use crate::models::{Job, JobSearchCriteria};
use crate::sources::JobSource;

pub const SOURCE_NAME: &str = "COMPOSITE";
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Aggregates an ordered list of job sources
pub struct CompositeJobSource {
    sources: Vec<Arc<dyn JobSource>>,
    source_timeout: Duration,
}

impl CompositeJobSource {
    /// Register `sources` in order. Nested composites are dropped.
    pub fn new(sources: Vec<Arc<dyn JobSource>>) -> Self {
        let sources: Vec<_> = sources
            .into_iter()
            .filter(|source| {
                if source.is_composite() {
                    tracing::warn!(source = %source.name(), "Ignoring nested composite source");
                    false
                } else {
                    true
                }
            })
            .collect();

        tracing::info!(
            count = sources.len(),
            sources = ?sources.iter().map(|s| s.name().to_string()).collect::<Vec<_>>(),
            "Composite job source initialized"
        );

        Self {
            sources,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, source_timeout: Duration) -> Self {
        self.source_timeout = source_timeout;
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    /// Search with possibly absent criteria; absent criteria match nothing
    pub async fn search_optional(&self, criteria: Option<&JobSearchCriteria>) -> Vec<Job> {
        match criteria {
            Some(criteria) => self.aggregate(criteria).await,
            None => {
                tracing::warn!("Search criteria absent, returning no jobs");
                Vec::new()
            }
        }
    }

    async fn aggregate(&self, criteria: &JobSearchCriteria) -> Vec<Job> {
        tracing::debug!(sources = self.sources.len(), "Aggregating job search");

        let tasks = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let criteria = criteria.clone();
            let limit = self.source_timeout;
            tokio::spawn(async move { query_source(source, criteria, limit).await })
        });

        let partials = join_in_order(tasks.collect()).await;

        let mut combined = Vec::new();
        for (source, partial) in self.sources.iter().zip(partials) {
            match partial {
                Ok(jobs) => combined.extend(jobs),
                Err(e) => {
                    tracing::error!(source = %source.name(), error = %e, "Source task aborted");
                }
            }
        }

        let fetched = combined.len();
        let jobs = deduplicate(combined);
        tracing::info!(
            fetched,
            unique = jobs.len(),
            "Aggregated jobs from all sources"
        );
        jobs
    }
}

/// Aborts every task still running when dropped, so a caller that abandons
/// the search does not leave source calls behind.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Await `handles` and return their outcomes in registration order,
/// regardless of completion order.
async fn join_in_order<T>(handles: Vec<JoinHandle<T>>) -> Vec<Result<T, JoinError>> {
    let _guard = AbortOnDrop(handles.iter().map(JoinHandle::abort_handle).collect());
    join_all(handles).await
}

async fn query_source(
    source: Arc<dyn JobSource>,
    criteria: JobSearchCriteria,
    limit: Duration,
) -> Vec<Job> {
    let name = source.name().to_string();

    let attempt = async {
        match source.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(source = %name, "Source not available, skipping");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(source = %name, error = %e, "Availability check failed, skipping");
                return Vec::new();
            }
        }

        match source.search(&criteria).await {
            Ok(jobs) => {
                tracing::debug!(source = %name, count = jobs.len(), "Source returned jobs");
                jobs
            }
            Err(e) => {
                tracing::error!(source = %name, error = %e, "Error searching source");
                Vec::new()
            }
        }
    };

    match timeout(limit, attempt).await {
        Ok(jobs) => jobs,
        Err(_) => {
            tracing::warn!(
                source = %name,
                timeout_ms = limit.as_millis() as u64,
                "Source timed out"
            );
            Vec::new()
        }
    }
}

#[async_trait]
impl JobSource for CompositeJobSource {
    async fn search(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError> {
        Ok(self.aggregate(criteria).await)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn is_available(&self) -> Result<bool, SourceError> {
        let probes = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let limit = self.source_timeout;
            tokio::spawn(async move {
                matches!(timeout(limit, source.is_available()).await, Ok(Ok(true)))
            })
        });

        Ok(join_in_order(probes.collect())
            .await
            .into_iter()
            .any(|probe| matches!(probe, Ok(true))))
    }

    fn is_composite(&self) -> bool {
        true
    }
}
