//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing, local development
//!   and snapshot-seeded demo deployments
pub mod local;

pub use local::LocalRepository;
