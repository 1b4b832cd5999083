use async_trait::async_trait;

use super::RepositoryResult;
use crate::models::{
    Band, BandId, BandMember, MemberRole, MembershipStatus, NewBand, RosterMember, UserId,
};

/// Band and membership storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` across request handlers.
#[async_trait]
pub trait BandRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Bands ====================

    /// Store a new band and make `creator` its active admin in one step.
    async fn create_band(&self, band: &NewBand, creator: UserId) -> RepositoryResult<Band>;

    /// Bands in which `user_id` holds an active membership, by band ID.
    async fn list_bands_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Band>>;

    // ==================== Memberships ====================

    /// Membership of `user_id` in `band_id`, whatever its status.
    async fn get_membership(
        &self,
        band_id: BandId,
        user_id: UserId,
    ) -> RepositoryResult<Option<BandMember>>;

    /// All memberships of a band, in the order they were created.
    async fn list_members(&self, band_id: BandId) -> RepositoryResult<Vec<BandMember>>;

    /// Insert a membership or update role and status of an existing one.
    ///
    /// `joined_at` of an existing membership is preserved.
    async fn upsert_member(
        &self,
        band_id: BandId,
        user_id: UserId,
        role: MemberRole,
        status: MembershipStatus,
    ) -> RepositoryResult<BandMember>;

    /// Active members joined with their user records, in membership order.
    async fn list_active_roster(&self, band_id: BandId) -> RepositoryResult<Vec<RosterMember>>;
}
