//! Error types for the job aggregation engine
//!
//! Only validation failures are meant to reach callers of the engine.
//! Source-local failures are recovered inside the aggregator and show up as a
//! smaller result set, never as an error.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error type returned by the service layer
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Rejected search criteria or job input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("minSalary ({min}) cannot be greater than maxSalary ({max})")]
    SalaryRange { min: Decimal, max: Decimal },

    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Salary must not be negative, got {salary}")]
    NegativeSalary { salary: Decimal },

    #[error("At least one non-blank skill is required")]
    NoSkills,
}

/// Failures raised by a single source or one of its collaborators
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl SourceError {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}
