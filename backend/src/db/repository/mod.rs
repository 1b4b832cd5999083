//! Repository trait definitions for database operations.
//!
//! This module provides a collection of focused repository traits that abstract
//! storage. By splitting responsibilities across multiple traits,
//! implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`user`]: User registration and lookup
//! - [`band`]: Bands, memberships and the active roster
//! - [`poll`]: Availability polls, options and responses
//! - [`rehearsal`]: Rehearsals and attendance
//!
//! # Convenience Trait Bound
//!
//! For code that needs every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let roster = repo.list_active_roster(band_id).await?;
//!     let polls = repo.find_open_polls_in_window(band_id, &window).await?;
//!     Ok(())
//! }
//! ```

pub mod band;
pub mod error;
pub mod poll;
pub mod rehearsal;
pub mod user;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use band::BandRepository;
pub use poll::PollRepository;
pub use rehearsal::RehearsalRepository;
pub use user::UserRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all four repository traits.
pub trait FullRepository:
    UserRepository + BandRepository + PollRepository + RehearsalRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: UserRepository + BandRepository + PollRepository + RehearsalRepository
{
}
