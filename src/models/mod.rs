//! Canonical job record and search criteria

mod criteria;
mod job;

pub use criteria::JobSearchCriteria;
pub use job::{Job, NewJob};

/// Source tag stamped on records owned by the internal store
pub const SOURCE_INTERNAL: &str = "INTERNAL";

/// Source tag stamped on records fetched from the external job API
pub const SOURCE_EXTERNAL_API: &str = "EXTERNAL_API";
