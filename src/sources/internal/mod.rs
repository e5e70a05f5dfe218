//! Internal store source
//!
//! Wraps the persistence collaborator behind the `JobSource` contract.
//! Records returned from here always carry the `INTERNAL` tag and a store
//! identity, and never an external identifier.

mod loader;
mod repository;

pub use loader::InternalJobSource;
pub use repository::{InMemoryJobRepository, JobRepository};
