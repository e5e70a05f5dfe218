//! Deduplication policy for aggregated job records
//!
//! Key precedence, evaluated per record:
//! 1. non-blank `external_id` (stable across fetches and stores)
//! 2. persisted `id` (only internal records have one)
//! 3. content fingerprint of (title, country, salary)
//!
//! On a collision the first-seen record wins, except that an `INTERNAL`
//! record always displaces a non-internal one.

use indexmap::map::Entry;
use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::LazyLock;

use crate::models::Job;

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Transient merge key; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    External(String),
    Persisted(i64),
    Content(String),
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(id) => write!(f, "EXT::{}", id),
            Self::Persisted(id) => write!(f, "ID::{}", id),
            Self::Content(fingerprint) => write!(f, "CNT::{}", fingerprint),
        }
    }
}

/// Derive the merge key for a record
pub fn dedup_key(job: &Job) -> DedupKey {
    if let Some(external_id) = job.external_id() {
        return DedupKey::External(external_id.to_string());
    }
    if let Some(id) = job.id {
        return DedupKey::Persisted(id);
    }
    DedupKey::Content(content_fingerprint(&job.title, &job.country, job.salary))
}

/// `title|country|salary` with title and country normalized
pub fn content_fingerprint(title: &str, country: &str, salary: Decimal) -> String {
    format!(
        "{}|{}|{}",
        normalize_title(title),
        country.trim().to_lowercase(),
        salary
    )
}

/// Lowercase, keep ASCII letters/digits/whitespace, collapse whitespace
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_ALNUM_RE.replace_all(&lowered, " ");
    WHITESPACE_RE
        .replace_all(stripped.trim(), " ")
        .into_owned()
}

/// Single pass, first-seen order preserved.
///
/// A displacing internal record takes over the incumbent's position.
pub fn deduplicate(jobs: Vec<Job>) -> Vec<Job> {
    let mut unique: IndexMap<DedupKey, Job> = IndexMap::with_capacity(jobs.len());

    for job in jobs {
        match unique.entry(dedup_key(&job)) {
            Entry::Vacant(slot) => {
                slot.insert(job);
            }
            Entry::Occupied(mut slot) => {
                if job.is_internal() && !slot.get().is_internal() {
                    tracing::debug!(
                        key = %slot.key(),
                        displaced = %slot.get().source,
                        "Internal record displaces duplicate"
                    );
                    slot.insert(job);
                }
            }
        }
    }

    unique.into_values().collect()
}
