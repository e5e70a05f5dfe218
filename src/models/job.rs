use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::SOURCE_INTERNAL;
use crate::error::ValidationError;

/// Canonical job record produced by every source.
///
/// `source` and `external_id` together describe provenance: records from the
/// internal store never carry an `external_id`, external records always do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Store identity, present only for internally persisted records
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub company: String,
    pub country: String,
    pub city: Option<String>,
    pub salary: Decimal,
    pub skills: BTreeSet<String>,
    /// Origin tag, e.g. `INTERNAL` or `EXTERNAL_API`
    pub source: String,
    /// Stable identity of an external record across fetches
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Case-insensitive check against the internal source tag
    pub fn is_internal(&self) -> bool {
        self.source.eq_ignore_ascii_case(SOURCE_INTERNAL)
    }

    /// External identifier, trimmed, if present and non-blank
    pub fn external_id(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Input for creating an internally stored job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    pub salary: Decimal,
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

impl NewJob {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        country: impl Into<String>,
        salary: Decimal,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            company: company.into(),
            country: country.into(),
            city: None,
            salary,
            skills: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Check required fields before the job reaches the store
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        if self.company.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "company" });
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "country" });
        }
        if self.salary < Decimal::ZERO {
            return Err(ValidationError::NegativeSalary {
                salary: self.salary,
            });
        }
        if self.skills.iter().all(|s| s.trim().is_empty()) {
            return Err(ValidationError::NoSkills);
        }
        Ok(())
    }

    /// Materialize as an internal record with a store-assigned identity
    pub fn into_internal(self, id: i64, now: DateTime<Utc>) -> Job {
        Job {
            id: Some(id),
            title: self.title,
            description: self.description,
            company: self.company,
            country: self.country,
            city: self.city,
            salary: self.salary,
            skills: self
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            source: SOURCE_INTERNAL.to_string(),
            external_id: None,
            created_at: now,
            updated_at: Some(now),
        }
    }
}
