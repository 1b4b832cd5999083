//! JSON snapshot used to seed the in-memory repository.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{AvailabilityPoll, Band, BandMember, Rehearsal, User};

/// Full contents of a repository, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub users: Vec<User>,
    pub bands: Vec<Band>,
    pub memberships: Vec<BandMember>,
    pub polls: Vec<AvailabilityPoll>,
    pub rehearsals: Vec<Rehearsal>,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("failed to read snapshot file {}: {}", path.display(), e),
                context: ErrorContext::new("load_snapshot").with_details(path.display().to_string()),
            }
        })?;
        Self::from_json(&contents).map_err(|e| e.with_operation("load_snapshot"))
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(contents: &str) -> RepositoryResult<Self> {
        serde_json::from_str(contents).map_err(|e| {
            RepositoryError::configuration(format!("failed to parse snapshot: {}", e))
        })
    }
}
