//! Job service: create internal jobs, then search, sort and page across sources.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::JobError;
use crate::models::{Job, JobSearchCriteria, NewJob};
use crate::sources::internal::JobRepository;
use crate::sources::JobSource;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// PAGING
// =============================================================================

/// Raw paging input as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page; negative or absent means 0
    pub page: Option<i64>,
    /// Absent, non-positive or above [`MAX_PAGE_SIZE`] means [`DEFAULT_PAGE_SIZE`]
    pub size: Option<i64>,
    /// `field[,asc|desc]`
    pub sort: Option<String>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn page_index(&self) -> usize {
        self.page
            .filter(|p| *p > 0)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(0)
    }

    pub fn page_size(&self) -> usize {
        self.size
            .and_then(|s| usize::try_from(s).ok())
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().and_then(SortSpec::parse)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    /// Total items across all pages
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.max(1))
    }
}

// =============================================================================
// SORTING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Company,
    Country,
    Salary,
    CreatedAt,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "company" => Some(Self::Company),
            "country" => Some(Self::Country),
            "salary" => Some(Self::Salary),
            "createdat" | "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn compare(self, a: &Job, b: &Job) -> Ordering {
        match self {
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
            Self::Country => a.country.to_lowercase().cmp(&b.country.to_lowercase()),
            Self::Salary => a.salary.cmp(&b.salary),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl SortSpec {
    /// Parse `field[,asc|desc]`. Unknown fields yield `None`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split(',');
        let field = SortField::parse(parts.next()?)?;
        let descending = parts
            .next()
            .is_some_and(|dir| dir.trim().eq_ignore_ascii_case("desc"));
        Some(Self { field, descending })
    }

    /// Stable sort; equal keys keep source order in both directions
    pub fn apply(&self, jobs: &mut [Job]) {
        let field = self.field;
        if self.descending {
            jobs.sort_by(|a, b| field.compare(b, a));
        } else {
            jobs.sort_by(|a, b| field.compare(a, b));
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct JobService {
    repository: Arc<dyn JobRepository>,
    source: Arc<dyn JobSource>,
}

impl JobService {
    pub fn new(repository: Arc<dyn JobRepository>, source: Arc<dyn JobSource>) -> Self {
        Self { repository, source }
    }

    /// Validate and store a new internal job
    pub async fn create(&self, job: NewJob) -> Result<Job, JobError> {
        job.validate()?;
        let stored = self.repository.save(job).await?;
        tracing::info!(id = ?stored.id, title = %stored.title, "Created internal job");
        Ok(stored)
    }

    /// Search all sources. Absent criteria search without constraints.
    pub async fn search(&self, criteria: Option<JobSearchCriteria>) -> Result<Vec<Job>, JobError> {
        let criteria = criteria.unwrap_or_default();
        criteria.validate()?;

        tracing::debug!(source = %self.source.name(), ?criteria, "Searching jobs");
        let jobs = self.source.search(&criteria).await?;
        tracing::info!(count = jobs.len(), "Job search completed");
        Ok(jobs)
    }

    /// Search, then sort and page the merged result
    pub async fn search_paged(
        &self,
        criteria: Option<JobSearchCriteria>,
        request: PageRequest,
    ) -> Result<Page<Job>, JobError> {
        let mut jobs = self.search(criteria).await?;

        match (request.sort.as_deref(), request.sort_spec()) {
            (_, Some(spec)) => spec.apply(&mut jobs),
            (Some(raw), None) if !raw.trim().is_empty() => {
                tracing::warn!(sort = %raw, "Unknown sort field, keeping source order");
            }
            _ => {}
        }

        let page = request.page_index();
        let size = request.page_size();
        let total = jobs.len();
        let content = jobs
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect();

        Ok(Page {
            content,
            page,
            size,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::sources::internal::{InMemoryJobRepository, InternalJobSource};
    use rust_decimal::Decimal;

    async fn seeded() -> JobService {
        let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
        let source: Arc<dyn JobSource> = Arc::new(InternalJobSource::new(Arc::clone(&repository)));
        let service = JobService::new(repository, source);

        for (title, company, country, salary) in [
            ("Cloud Engineer", "Zeta", "USA", 65_000),
            ("backend engineer", "acme", "Spain", 50_000),
            ("Data Engineer", "Beta", "USA", 80_000),
            ("Architect", "Acme", "Germany", 95_000),
        ] {
            service
                .create(
                    NewJob::new(title, company, country, Decimal::from(salary)).with_skill("Rust"),
                )
                .await
                .unwrap();
        }
        service
    }

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let service = seeded().await;
        let err = service
            .create(NewJob::new("", "Acme", "USA", Decimal::from(1)).with_skill("Go"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobError::Validation(ValidationError::MissingField { field: "title" })
        ));

        let err = service
            .create(NewJob::new("Dev", "Acme", "USA", Decimal::from(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::Validation(ValidationError::NoSkills)));
    }

    #[tokio::test]
    async fn test_search_defaults_and_validates_criteria() {
        let service = seeded().await;
        assert_eq!(service.search(None).await.unwrap().len(), 4);

        let usa = JobSearchCriteria::new().with_country("usa");
        assert_eq!(service.search(Some(usa)).await.unwrap().len(), 2);

        let inverted = JobSearchCriteria::new()
            .with_min_salary(Decimal::from(90_000))
            .with_max_salary(Decimal::from(10_000));
        let err = service.search(Some(inverted)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: minSalary (90000) cannot be greater than maxSalary (10000)"
        );
    }

    #[tokio::test]
    async fn test_sorts_case_insensitively_in_both_directions() {
        let service = seeded().await;

        let page = service
            .search_paged(None, PageRequest::new().with_sort("title"))
            .await
            .unwrap();
        assert_eq!(
            titles(&page.content),
            vec!["Architect", "backend engineer", "Cloud Engineer", "Data Engineer"]
        );

        let page = service
            .search_paged(None, PageRequest::new().with_sort("salary,desc"))
            .await
            .unwrap();
        assert_eq!(
            titles(&page.content),
            vec!["Architect", "Data Engineer", "Cloud Engineer", "backend engineer"]
        );
    }

    #[tokio::test]
    async fn test_sort_is_stable_and_unknown_field_keeps_order() {
        let service = seeded().await;

        let page = service
            .search_paged(None, PageRequest::new().with_sort("company"))
            .await
            .unwrap();
        assert_eq!(
            titles(&page.content),
            vec!["backend engineer", "Architect", "Data Engineer", "Cloud Engineer"]
        );

        let page = service
            .search_paged(None, PageRequest::new().with_sort("rating,desc"))
            .await
            .unwrap();
        assert_eq!(
            titles(&page.content),
            vec!["Cloud Engineer", "backend engineer", "Data Engineer", "Architect"]
        );
    }

    #[tokio::test]
    async fn test_paging() {
        let service = seeded().await;

        let page = service
            .search_paged(None, PageRequest::new().with_page(1).with_size(3))
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.size, 3);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(titles(&page.content), vec!["Architect"]);

        let page = service
            .search_paged(None, PageRequest::new().with_page(9))
            .await
            .unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_page_request_normalization() {
        let request = PageRequest::new().with_page(-3).with_size(0);
        assert_eq!(request.page_index(), 0);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);

        assert_eq!(PageRequest::new().with_size(101).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new().with_size(100).page_size(), 100);
        assert_eq!(PageRequest::new().page_index(), 0);
    }

    #[test]
    fn test_sort_spec_parsing() {
        assert_eq!(
            SortSpec::parse("createdAt,DESC"),
            Some(SortSpec {
                field: SortField::CreatedAt,
                descending: true
            })
        );
        assert_eq!(
            SortSpec::parse(" Country , asc"),
            Some(SortSpec {
                field: SortField::Country,
                descending: false
            })
        );
        assert_eq!(SortSpec::parse("id"), None);
        assert_eq!(SortSpec::parse(""), None);
    }
}
