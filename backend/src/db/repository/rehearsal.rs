use async_trait::async_trait;

use super::RepositoryResult;
use crate::models::{
    Attendance, AttendanceStatus, BandId, NewRehearsal, Rehearsal, RehearsalFilter, RehearsalId,
    RehearsalUpdate, UserId,
};

/// Rehearsal and attendance storage.
#[async_trait]
pub trait RehearsalRepository: Send + Sync {
    /// Store a rehearsal with a `NO_RESPONSE` attendance row for every
    /// member active at the time of the write.
    ///
    /// When `rehearsal.poll_id` is set, that poll is closed within the same
    /// write. A missing poll fails with `NotFound`, a poll of another band
    /// with `ValidationError`.
    async fn create_rehearsal(
        &self,
        rehearsal: &NewRehearsal,
        created_by: UserId,
    ) -> RepositoryResult<Rehearsal>;

    /// Retrieve a rehearsal with its attendance (`NotFound` if missing).
    async fn get_rehearsal(&self, rehearsal_id: RehearsalId) -> RepositoryResult<Rehearsal>;

    /// Rehearsals of a band matching `filter`, ordered by start time.
    async fn list_rehearsals(
        &self,
        band_id: BandId,
        filter: &RehearsalFilter,
    ) -> RepositoryResult<Vec<Rehearsal>>;

    /// Apply a partial update and bump `updated_at`.
    async fn update_rehearsal(
        &self,
        rehearsal_id: RehearsalId,
        update: &RehearsalUpdate,
    ) -> RepositoryResult<Rehearsal>;

    /// Remove a rehearsal together with its attendance.
    async fn delete_rehearsal(&self, rehearsal_id: RehearsalId) -> RepositoryResult<()>;

    /// Insert or replace the attendance of `user_id`, stamping the response time.
    async fn upsert_attendance(
        &self,
        rehearsal_id: RehearsalId,
        user_id: UserId,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Attendance>;
}
