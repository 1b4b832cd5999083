//! Band creation and membership management.

use crate::db::repository::{BandRepository, FullRepository, UserRepository};
use crate::models::{
    Band, BandId, BandMember, MemberRole, MembershipStatus, NewBand, UserId,
};

use super::access::{require_admin, require_member};
use super::error::{ServiceError, ServiceResult};

/// Create a band; the creator becomes its first active admin.
pub async fn create_band(
    repo: &dyn FullRepository,
    creator: UserId,
    band: NewBand,
) -> ServiceResult<Band> {
    if band.name.trim().is_empty() {
        return Err(ServiceError::validation("band name is required"));
    }
    let created = repo.create_band(&band, creator).await?;
    log::info!("user {} created band {}", creator, created.id);
    Ok(created)
}

/// Bands where `user_id` is an active member.
pub async fn list_user_bands(repo: &dyn FullRepository, user_id: UserId) -> ServiceResult<Vec<Band>> {
    Ok(repo.list_bands_for_user(user_id).await?)
}

/// Every membership of the band, active or not.
pub async fn list_members(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
) -> ServiceResult<Vec<BandMember>> {
    require_member(repo, band_id, caller).await?;
    Ok(repo.list_members(band_id).await?)
}

/// Add `user_id` to the band with `role`.
///
/// An inactive member is reactivated with the new role; an active member is
/// a `Conflict`.
pub async fn add_member(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    user_id: UserId,
    role: MemberRole,
) -> ServiceResult<BandMember> {
    require_admin(repo, band_id, caller).await?;
    repo.get_user(user_id).await?;

    if let Some(existing) = repo.get_membership(band_id, user_id).await? {
        if existing.is_active() {
            return Err(ServiceError::conflict(format!(
                "user {} is already a member of band {}",
                user_id, band_id
            )));
        }
    }

    let member = repo
        .upsert_member(band_id, user_id, role, MembershipStatus::Active)
        .await?;
    log::info!("user {} added {} to band {} as {:?}", caller, user_id, band_id, role);
    Ok(member)
}

/// Activate or deactivate a membership.
///
/// The last active admin of a band cannot be deactivated.
pub async fn set_member_status(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    user_id: UserId,
    status: MembershipStatus,
) -> ServiceResult<BandMember> {
    require_admin(repo, band_id, caller).await?;

    let member = repo.get_membership(band_id, user_id).await?.ok_or_else(|| {
        ServiceError::not_found(format!("user {} is not a member of band {}", user_id, band_id))
    })?;

    if status == MembershipStatus::Inactive && member.is_active_admin() {
        let active_admins = repo
            .list_members(band_id)
            .await?
            .iter()
            .filter(|m| m.is_active_admin())
            .count();
        if active_admins <= 1 {
            return Err(ServiceError::validation(format!(
                "user {} is the last active admin of band {}",
                user_id, band_id
            )));
        }
    }

    let updated = repo
        .upsert_member(band_id, user_id, member.role, status)
        .await?;
    log::info!(
        "user {} set membership of {} in band {} to {:?}",
        caller,
        user_id,
        band_id,
        status
    );
    Ok(updated)
}
