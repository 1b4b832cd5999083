//! Rehearsal scheduling and attendance.

use crate::db::repository::{FullRepository, RehearsalRepository};
use crate::models::{
    Attendance, AttendanceStatus, BandId, NewRehearsal, Rehearsal, RehearsalFilter, RehearsalId,
    RehearsalUpdate, UserId,
};

use super::access::{require_admin, require_member};
use super::error::{ServiceError, ServiceResult};

pub async fn list_band_rehearsals(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    filter: RehearsalFilter,
) -> ServiceResult<Vec<Rehearsal>> {
    require_member(repo, band_id, caller).await?;
    Ok(repo.list_rehearsals(band_id, &filter).await?)
}

pub async fn get_rehearsal(
    repo: &dyn FullRepository,
    caller: UserId,
    rehearsal_id: RehearsalId,
) -> ServiceResult<Rehearsal> {
    let rehearsal = repo.get_rehearsal(rehearsal_id).await?;
    require_member(repo, rehearsal.band_id, caller).await?;
    Ok(rehearsal)
}

/// Schedule a rehearsal.
///
/// Every active member gets a `NO_RESPONSE` attendance row. When the
/// rehearsal comes from a poll, that poll must belong to the same band and
/// is closed by the same write. A recurring rehearsal must carry its
/// pattern.
pub async fn create_rehearsal(
    repo: &dyn FullRepository,
    caller: UserId,
    rehearsal: NewRehearsal,
) -> ServiceResult<Rehearsal> {
    require_admin(repo, rehearsal.band_id, caller).await?;

    if rehearsal.title.trim().is_empty() {
        return Err(ServiceError::validation("rehearsal title is required"));
    }
    if rehearsal.start_time >= rehearsal.end_time {
        return Err(ServiceError::validation("rehearsal must start before it ends"));
    }
    match (rehearsal.is_recurring, &rehearsal.recurring_pattern) {
        (true, None) => {
            return Err(ServiceError::validation(
                "a recurring rehearsal needs a recurringPattern",
            ))
        }
        (true, Some(pattern)) => pattern.validate().map_err(ServiceError::validation)?,
        (false, _) => {}
    }

    let created = repo.create_rehearsal(&rehearsal, caller).await?;
    log::info!(
        "user {} scheduled rehearsal {} for band {} ({} attendees)",
        caller,
        created.id,
        created.band_id,
        created.attendance.len()
    );
    if let Some(poll_id) = created.poll_id {
        log::info!("poll {} closed by rehearsal {}", poll_id, created.id);
    }
    Ok(created)
}

/// Apply a partial update; the resulting times must still satisfy `start < end`.
pub async fn update_rehearsal(
    repo: &dyn FullRepository,
    caller: UserId,
    rehearsal_id: RehearsalId,
    update: RehearsalUpdate,
) -> ServiceResult<Rehearsal> {
    let existing = repo.get_rehearsal(rehearsal_id).await?;
    require_admin(repo, existing.band_id, caller).await?;

    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ServiceError::validation("rehearsal title cannot be blank"));
    }

    let updated = repo.update_rehearsal(rehearsal_id, &update).await?;
    log::info!("user {} updated rehearsal {}", caller, rehearsal_id);
    Ok(updated)
}

pub async fn delete_rehearsal(
    repo: &dyn FullRepository,
    caller: UserId,
    rehearsal_id: RehearsalId,
) -> ServiceResult<()> {
    let existing = repo.get_rehearsal(rehearsal_id).await?;
    require_admin(repo, existing.band_id, caller).await?;

    repo.delete_rehearsal(rehearsal_id).await?;
    log::info!("user {} deleted rehearsal {}", caller, rehearsal_id);
    Ok(())
}

/// Record the caller's attendance. `NO_RESPONSE` cannot be submitted.
pub async fn update_attendance(
    repo: &dyn FullRepository,
    caller: UserId,
    rehearsal_id: RehearsalId,
    status: AttendanceStatus,
    notes: Option<String>,
) -> ServiceResult<Attendance> {
    let rehearsal = repo.get_rehearsal(rehearsal_id).await?;
    require_member(repo, rehearsal.band_id, caller).await?;

    if status == AttendanceStatus::NoResponse {
        return Err(ServiceError::validation(
            "NO_RESPONSE is not a valid attendance answer",
        ));
    }

    let attendance = repo
        .upsert_attendance(rehearsal_id, caller, status, notes)
        .await?;
    log::debug!(
        "user {} marked {:?} for rehearsal {}",
        caller,
        status,
        rehearsal_id
    );
    Ok(attendance)
}
