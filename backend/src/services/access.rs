//! Membership checks shared by the band, poll and rehearsal services.

use crate::db::repository::{BandRepository, FullRepository};
use crate::models::{BandId, BandMember, UserId};

use super::error::{ServiceError, ServiceResult};

/// Returns the caller's membership if it is ACTIVE.
pub async fn require_member(
    repo: &dyn FullRepository,
    band_id: BandId,
    user_id: UserId,
) -> ServiceResult<BandMember> {
    match repo.get_membership(band_id, user_id).await? {
        Some(member) if member.is_active() => Ok(member),
        _ => {
            log::debug!("user {} denied member access to band {}", user_id, band_id);
            Err(ServiceError::forbidden(format!(
                "user {} is not an active member of band {}",
                user_id, band_id
            )))
        }
    }
}

/// Returns the caller's membership if it is an ACTIVE ADMIN.
pub async fn require_admin(
    repo: &dyn FullRepository,
    band_id: BandId,
    user_id: UserId,
) -> ServiceResult<BandMember> {
    match repo.get_membership(band_id, user_id).await? {
        Some(member) if member.is_active_admin() => Ok(member),
        _ => {
            log::debug!("user {} denied admin access to band {}", user_id, band_id);
            Err(ServiceError::forbidden(format!(
                "user {} is not an admin of band {}",
                user_id, band_id
            )))
        }
    }
}
