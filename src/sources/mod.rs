//! JobSource trait and the shipped source implementations
//!
//! Every provider of job records (internal store, external API, and the
//! composite that merges them) implements the same contract, so callers never
//! need to know how many or which concrete sources sit behind a search.

pub mod composite;
pub mod external;
pub mod internal;
pub mod wiring;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{Job, JobSearchCriteria};

/// Trait for pluggable job sources
///
/// # Implementation Notes
///
/// - Degrade transport and parse failures to `Ok(vec![])` wherever possible;
///   an `Err` is reserved for failures the source cannot absorb itself
/// - Keep `is_available` cheap and free of side effects
/// - Bound any I/O with a timeout owned by the source
/// - New providers are added by implementing this trait, never by changing
///   the aggregator
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Search this source for jobs matching `criteria`
    async fn search(&self, criteria: &JobSearchCriteria) -> Result<Vec<Job>, SourceError>;

    /// Stable source name (e.g. "INTERNAL", "EXTERNAL_API")
    fn name(&self) -> &str;

    /// Best-effort availability probe
    async fn is_available(&self) -> Result<bool, SourceError> {
        Ok(true)
    }

    /// Whether this source itself fans out to other sources
    fn is_composite(&self) -> bool {
        false
    }
}
