//! Internal store JobSource implementation

use async_trait::async_trait;
use std::sync::Arc;

use super::repository::JobRepository;
use crate::error::SourceError;
use crate::models::{Job, JobSearchCriteria, SOURCE_INTERNAL};
use crate::sources::JobSource;

/// Job source backed by the internal repository
pub struct InternalJobSource {
    repository: Arc<dyn JobRepository>,
}

impl InternalJobSource {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl JobSource for InternalJobSource {
    async fn search(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError> {
        tracing::debug!(?criteria, "Searching internal jobs");

        let jobs = self.repository.find_matching(criteria).await?;

        tracing::debug!(count = jobs.len(), "Found jobs from internal source");
        Ok(jobs)
    }

    fn name(&self) -> &str {
        SOURCE_INTERNAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewJob;
    use crate::sources::internal::InMemoryJobRepository;
    use rust_decimal::Decimal;

    struct BrokenRepository;

    #[async_trait]
    impl JobRepository for BrokenRepository {
        async fn find_matching(&self, _: &JobSearchCriteria) -> Result<Vec<Job>, SourceError> {
            Err(SourceError::persistence("connection refused"))
        }

        async fn save(&self, _: NewJob) -> Result<Job, SourceError> {
            Err(SourceError::persistence("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_search_delegates_to_repository() {
        let repo = Arc::new(InMemoryJobRepository::new());
        repo.save(
            NewJob::new("Platform Engineer", "Acme", "USA", Decimal::from(90_000)).with_skill("Go"),
        )
        .await
        .unwrap();

        let source = InternalJobSource::new(repo);
        let jobs = source
            .search(&JobSearchCriteria::new().with_title("platform"))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 1);
        assert!(jobs.iter().all(|j| j.source == SOURCE_INTERNAL));
        assert_eq!(source.name(), "INTERNAL");
        assert!(source.is_available().await.unwrap());
        assert!(!source.is_composite());
    }

    #[tokio::test]
    async fn test_repository_failure_is_raised_to_the_caller() {
        let source = InternalJobSource::new(Arc::new(BrokenRepository));
        let result = source.search(&JobSearchCriteria::new()).await;
        assert!(matches!(result, Err(SourceError::Persistence { .. })));
    }
}
