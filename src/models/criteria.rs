use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Job;
use crate::error::ValidationError;

/// Search filter shared by every source.
///
/// Absent (or blank) fields impose no constraint. `skill` is carried through
/// to sources but none of the shipped sources filter on it yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearchCriteria {
    pub title: Option<String>,
    pub country: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub skill: Option<String>,
}

impl JobSearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_min_salary(mut self, min: Decimal) -> Self {
        self.min_salary = Some(min);
        self
    }

    pub fn with_max_salary(mut self, max: Decimal) -> Self {
        self.max_salary = Some(max);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    /// Reject an inverted salary range. Never corrects it silently.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(ValidationError::SalaryRange { min, max });
            }
        }
        Ok(())
    }

    /// Non-blank title filter
    pub fn title_filter(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Non-blank country filter
    pub fn country_filter(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    /// Filter semantics of the persistence contract: case-insensitive title
    /// substring, case-insensitive exact country, inclusive salary bounds,
    /// all combined with AND.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(title) = self.title_filter() {
            if !job.title.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }
        if let Some(country) = self.country_filter() {
            if job.country.to_lowercase() != country.to_lowercase() {
                return false;
            }
        }
        if self.min_salary.is_some_and(|min| job.salary < min) {
            return false;
        }
        if self.max_salary.is_some_and(|max| job.salary > max) {
            return false;
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
