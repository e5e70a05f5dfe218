//! Normalization of the external job API payload
//!
//! Decoding happens in two stages. The envelope is first read as an ordered
//! map of country to a list of raw, still undecoded JSON entries; a broken
//! envelope degrades the whole payload to "no results". Each entry is then
//! decoded and validated on its own as a `[title, salary, skillsMarkup]`
//! tuple, and a bad entry is skipped without touching its neighbours.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use super::skills::SkillsParser;
use crate::models::Job;

/// Company name used because the external contract does not supply one
pub const EXTERNAL_COMPANY_PLACEHOLDER: &str = "External Company";

/// Description used because the external contract does not supply one
pub const EXTERNAL_DESCRIPTION_PLACEHOLDER: &str = "Job from external source";

const TUPLE_ARITY: usize = 3;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Stage one: country → entries, document order preserved. Entries stay raw
/// so an undecodable one (e.g. an out-of-range number) fails on its own.
type RawEnvelope = IndexMap<String, Option<Vec<Box<RawValue>>>>;

#[derive(Debug, Error)]
enum EntryError {
    #[error("entry is not valid JSON: {0}")]
    Undecodable(String),

    #[error("expected an array, got {0}")]
    NotAnArray(&'static str),

    #[error("expected array of 3 elements, got {0}")]
    Arity(usize),

    #[error("title must be text, got {0}")]
    InvalidTitle(&'static str),

    #[error("title is blank")]
    BlankTitle,

    #[error("salary '{0}' is not a decimal number")]
    InvalidSalary(String),

    #[error("salary {0} is negative")]
    NegativeSalary(Decimal),

    #[error("skills markup is null")]
    MissingSkills,
}

/// An external record before its source tag is stamped
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedJob {
    pub title: String,
    pub description: String,
    pub company: String,
    pub country: String,
    pub salary: Decimal,
    pub skills: BTreeSet<String>,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}

impl NormalizedJob {
    /// Stamp the originating source and produce the canonical record
    pub fn into_job(self, source: impl Into<String>) -> Job {
        Job {
            id: None,
            title: self.title,
            description: Some(self.description),
            company: self.company,
            country: self.country,
            city: None,
            salary: self.salary,
            skills: self.skills,
            source: source.into(),
            external_id: Some(self.external_id),
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

/// Adapts the external payload to normalized job records
#[derive(Debug, Clone, Default)]
pub struct ExternalResponseAdapter {
    skills: SkillsParser,
}

impl ExternalResponseAdapter {
    pub fn new(skills: SkillsParser) -> Self {
        Self { skills }
    }

    /// Normalize one raw payload.
    ///
    /// Never fails: absent, blank or malformed payloads give an empty list and
    /// malformed entries are dropped individually.
    pub fn adapt(&self, raw: Option<&str>) -> Vec<NormalizedJob> {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            tracing::debug!("External payload is absent or blank");
            return Vec::new();
        };

        let envelope: RawEnvelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse external API response");
                return Vec::new();
            }
        };

        let total: usize = envelope.values().flatten().map(Vec::len).sum();
        let mut jobs = Vec::with_capacity(total);

        for (country, entries) in &envelope {
            let Some(entries) = entries else {
                tracing::debug!(country = %country, "Country has no job list");
                continue;
            };

            for (index, entry) in entries.iter().enumerate() {
                match self.normalize_entry(country, entry) {
                    Ok(job) => jobs.push(job),
                    Err(e) => tracing::warn!(
                        country = %country,
                        index,
                        error = %e,
                        entry = %entry.get(),
                        "Skipping malformed external job entry"
                    ),
                }
            }
        }

        tracing::info!(
            adapted = jobs.len(),
            skipped = total - jobs.len(),
            "Adapted jobs from external source"
        );
        jobs
    }

    fn normalize_entry(
        &self,
        country: &str,
        entry: &RawValue,
    ) -> Result<NormalizedJob, EntryError> {
        let entry: Value = serde_json::from_str(entry.get())
            .map_err(|e| EntryError::Undecodable(e.to_string()))?;
        let tuple = entry
            .as_array()
            .ok_or_else(|| EntryError::NotAnArray(json_kind(&entry)))?;
        if tuple.len() != TUPLE_ARITY {
            return Err(EntryError::Arity(tuple.len()));
        }

        let title = title_text(&tuple[0])?;
        let salary = salary_decimal(&tuple[1])?;
        let skills = match &tuple[2] {
            Value::Null => return Err(EntryError::MissingSkills),
            Value::String(markup) => self.skills.parse(Some(markup)),
            other => self.skills.parse(Some(&other.to_string())),
        };

        let external_id = generate_external_id(country, &title, salary);

        Ok(NormalizedJob {
            title,
            description: EXTERNAL_DESCRIPTION_PLACEHOLDER.to_string(),
            company: EXTERNAL_COMPANY_PLACEHOLDER.to_string(),
            country: country.to_string(),
            salary,
            skills,
            external_id,
            created_at: Utc::now(),
        })
    }
}

/// Deterministic identity for an external job.
///
/// Format: `EXT_<COUNTRY>_<TITLE>_<SALARY>`, e.g. `EXT_USA_CLOUD_ENGINEER_65000`.
/// Entries with equal (country, title, salary) share an id on purpose.
pub fn generate_external_id(country: &str, title: &str, salary: Decimal) -> String {
    let normalized_title = WHITESPACE_RE.replace_all(title, "_").to_uppercase();
    format!(
        "EXT_{}_{}_{}",
        country.to_uppercase(),
        normalized_title,
        salary
    )
}

fn title_text(value: &Value) -> Result<String, EntryError> {
    let title = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(EntryError::InvalidTitle(json_kind(other))),
    };
    if title.trim().is_empty() {
        return Err(EntryError::BlankTitle);
    }
    Ok(title)
}

fn salary_decimal(value: &Value) -> Result<Decimal, EntryError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(EntryError::InvalidSalary(other.to_string())),
    };
    let salary = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| EntryError::InvalidSalary(text.clone()))?;
    if salary < Decimal::ZERO {
        return Err(EntryError::NegativeSalary(salary));
    }
    Ok(salary)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
