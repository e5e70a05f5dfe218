//! External job API source
//!
//! The provider answers with a loosely-typed payload keyed by country:
//!
//! ```json
//! { "USA": [["Cloud Engineer", 65000, "<skills><skill>AWS</skill></skills>"]] }
//! ```
//!
//! # Coverage
//!
//! - **Transport:** `GET <base>/jobs?name=&country=&salary_min=&salary_max=`
//! - **Identity:** synthesized `EXT_<COUNTRY>_<TITLE>_<SALARY>` external id
//! - **Not provided:** company, description, city (placeholders or absent)

mod client;
mod loader;
mod normalize;
mod skills;

pub use client::{ExternalJobsTransport, HttpExternalJobsClient};
pub use loader::ExternalJobSource;
pub use normalize::{
    generate_external_id, ExternalResponseAdapter, NormalizedJob, EXTERNAL_COMPANY_PLACEHOLDER,
    EXTERNAL_DESCRIPTION_PLACEHOLDER,
};
pub use skills::SkillsParser;
