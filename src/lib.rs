//! Multi-source job aggregation
//!
//! Queries an internal job store and external job providers through one
//! uniform [`JobSource`] contract, normalizes the loosely-typed external
//! payloads into canonical [`Job`] records and merges everything into a single
//! deduplicated result set.
//!
//! # Architecture
//!
//! ```text
//! JobSearchCriteria
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  JobService                             │
//! │  validate → search → sort → page        │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  CompositeJobSource                     │
//! │  fan-out (per-source timeout) → dedup   │
//! └─────────────────────────────────────────┘
//!       │                       │
//!       ▼                       ▼
//! ┌──────────────────┐   ┌──────────────────────────────┐
//! │ InternalJobSource│   │ ExternalJobSource            │
//! │ JobRepository    │   │ transport → normalize →      │
//! │                  │   │ skills markup → Job          │
//! └──────────────────┘   └──────────────────────────────┘
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod models;
pub mod service;
pub mod sources;

pub use config::AppConfig;
pub use dedup::{dedup_key, deduplicate, DedupKey};
pub use error::{JobError, SourceError, ValidationError};
pub use models::{Job, JobSearchCriteria, NewJob, SOURCE_EXTERNAL_API, SOURCE_INTERNAL};
pub use service::{JobService, Page, PageRequest, SortField, SortSpec};
pub use sources::{
    composite::CompositeJobSource,
    external::{
        ExternalJobSource, ExternalJobsTransport, ExternalResponseAdapter, HttpExternalJobsClient,
        NormalizedJob, SkillsParser,
    },
    internal::{InMemoryJobRepository, InternalJobSource, JobRepository},
    JobSource,
};
