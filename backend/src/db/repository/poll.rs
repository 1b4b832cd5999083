use async_trait::async_trait;

use super::RepositoryResult;
use crate::models::{
    Availability, AvailabilityPoll, BandId, NewPoll, PollId, PollOptionId, PollResponse,
    PollStatus, TimeWindow, UserId,
};

/// Availability poll storage.
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Store a new open poll, assigning IDs to the poll and its options.
    async fn create_poll(&self, poll: &NewPoll) -> RepositoryResult<AvailabilityPoll>;

    /// Retrieve a poll with its options and responses (`NotFound` if missing).
    async fn get_poll(&self, poll_id: PollId) -> RepositoryResult<AvailabilityPoll>;

    /// Polls of a band in creation order, optionally restricted to one status.
    async fn list_polls(
        &self,
        band_id: BandId,
        status: Option<PollStatus>,
    ) -> RepositoryResult<Vec<AvailabilityPoll>>;

    /// Insert or replace the response of `user_id` on one option.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the poll or the option does not exist
    /// * `Err(RepositoryError::ValidationError)` - If the poll is closed
    async fn record_response(
        &self,
        poll_id: PollId,
        option_id: PollOptionId,
        user_id: UserId,
        availability: Availability,
    ) -> RepositoryResult<PollResponse>;

    /// Change the status of a poll.
    async fn set_poll_status(
        &self,
        poll_id: PollId,
        status: PollStatus,
    ) -> RepositoryResult<AvailabilityPoll>;

    /// Open polls of a band having at least one option fully inside `window`,
    /// in creation order. Polls are returned whole, with all their options.
    async fn find_open_polls_in_window(
        &self,
        band_id: BandId,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<AvailabilityPoll>>;
}
