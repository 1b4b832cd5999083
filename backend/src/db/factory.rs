//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::RepositorySettings;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Empty in-memory repository
    Local,
    /// In-memory repository seeded from a JSON snapshot
    Snapshot,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "snapshot").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "snapshot" => Ok(Self::Snapshot),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use rehearsal_scheduler::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
/// # let _ = repo;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `snapshot_path` - Seed file (required for `Snapshot`)
    pub fn create(
        repo_type: RepositoryType,
        snapshot_path: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Snapshot => {
                let path = snapshot_path.ok_or_else(|| {
                    RepositoryError::configuration(
                        "Snapshot repository requires 'repository.snapshot_path'",
                    )
                })?;
                Self::create_from_snapshot(path)
            }
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository seeded from a snapshot file.
    pub fn create_from_snapshot(path: &Path) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = LocalRepository::from_snapshot_file(path)?;
        log::info!("Seeded local repository from {}", path.display());
        Ok(Arc::new(repo))
    }

    /// Create a repository from the `[repository]` configuration section.
    pub fn from_settings(settings: &RepositorySettings) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = RepositoryType::from_str(&settings.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, settings.snapshot_path.as_deref())
    }
}
