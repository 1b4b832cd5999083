//! Storage layer for bands, polls and rehearsals.
//!
//! This module provides abstractions for storage operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (crate::services)                        │
//! │  - Membership / admin checks                            │
//! │  - Input validation                                     │
//! │  - Snapshotting for the ranking engine                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │      (in-memory, optional JSON snapshot)      │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use rehearsal_scheduler::db::{RepositoryFactory, RepositoryType};
//! use rehearsal_scheduler::services;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
//! assert!(services::health_check(repo.as_ref()).await.unwrap());
//! # });
//! ```

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod snapshot;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    BandRepository, ErrorContext, FullRepository, PollRepository, RehearsalRepository,
    RepositoryError, RepositoryResult, UserRepository,
};
pub use snapshot::Snapshot;
