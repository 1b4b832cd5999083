//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository. Each operation
//! takes the repository, the acting user and typed input, checks the
//! caller's membership, validates the input and then reads or writes through
//! the repository traits.

pub mod access;
pub mod bands;
pub mod error;
pub mod polls;
pub mod rehearsals;
pub mod suggestions;
pub mod users;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

pub use access::{require_admin, require_member};
pub use error::{ServiceError, ServiceResult};
pub use suggestions::{suggest_times, suggest_times_for};

use crate::db::repository::{BandRepository, FullRepository};

/// Repository health.
pub async fn health_check(repo: &dyn FullRepository) -> ServiceResult<bool> {
    Ok(repo.health_check().await?)
}
