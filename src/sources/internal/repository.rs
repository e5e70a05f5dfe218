//! Persistence collaborator for internally owned jobs

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::SourceError;
use crate::models::{Job, JobSearchCriteria, NewJob};

/// Store of internally created jobs
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// All stored jobs matching `criteria` (see [`JobSearchCriteria::matches`])
    async fn find_matching(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError>;

    /// Persist a new job, assigning identity, `INTERNAL` tag and timestamps
    async fn save(&self, job: NewJob) -> Result<Job, SourceError>;
}

/// In-process job store, ordered by insertion
#[derive(Debug)]
pub struct InMemoryJobRepository {
    jobs: RwLock<Vec<Job>>,
    next_id: AtomicI64,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored jobs
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn find_matching(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .iter()
            .filter(|job| criteria.matches(job))
            .cloned()
            .collect())
    }

    async fn save(&self, job: NewJob) -> Result<Job, SourceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = job.into_internal(id, Utc::now());
        self.jobs.write().await.push(stored.clone());
        tracing::debug!(id, title = %stored.title, "Stored internal job");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SOURCE_INTERNAL;
    use rust_decimal::Decimal;

    fn new_job(title: &str, country: &str, salary: i64) -> NewJob {
        NewJob::new(title, "Acme", country, Decimal::from(salary)).with_skill("Rust")
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryJobRepository::new();
        let a = repo.save(new_job("A", "ES", 1)).await.unwrap();
        let b = repo.save(new_job("B", "ES", 1)).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(b.source, SOURCE_INTERNAL);
        assert!(b.external_id.is_none());
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_matching_combines_filters() {
        let repo = InMemoryJobRepository::new();
        repo.save(new_job("Java Developer", "Spain", 40_000)).await.unwrap();
        repo.save(new_job("Rust Developer", "spain", 60_000)).await.unwrap();
        repo.save(new_job("Rust Developer", "France", 60_000)).await.unwrap();

        let criteria = JobSearchCriteria::new()
            .with_title("developer")
            .with_country("SPAIN")
            .with_min_salary(Decimal::from(50_000));
        let found = repo.find_matching(&criteria).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rust Developer");
        assert_eq!(found[0].country, "spain");

        let all = repo.find_matching(&JobSearchCriteria::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
