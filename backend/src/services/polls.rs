//! Availability polls: creation, responses and closing.

use crate::db::repository::{FullRepository, PollRepository};
use crate::models::{
    Availability, AvailabilityPoll, BandId, NewPoll, NewPollOption, PollId, PollOptionId,
    PollResponse, PollStatus, UserId,
};

use super::access::{require_admin, require_member};
use super::error::{ServiceError, ServiceResult};

/// Create an open poll with at least one `start < end` option.
pub async fn create_poll(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    title: String,
    options: Vec<NewPollOption>,
) -> ServiceResult<AvailabilityPoll> {
    require_admin(repo, band_id, caller).await?;

    if title.trim().is_empty() {
        return Err(ServiceError::validation("poll title is required"));
    }
    if options.is_empty() {
        return Err(ServiceError::validation("a poll needs at least one option"));
    }
    if let Some((i, _)) = options
        .iter()
        .enumerate()
        .find(|(_, o)| o.start_time >= o.end_time)
    {
        return Err(ServiceError::validation(format!(
            "option {} must start before it ends",
            i + 1
        )));
    }

    let poll = repo
        .create_poll(&NewPoll {
            band_id,
            title,
            created_by: caller,
            options,
        })
        .await?;
    log::info!(
        "user {} opened poll {} in band {} with {} options",
        caller,
        poll.id,
        band_id,
        poll.options.len()
    );
    Ok(poll)
}

pub async fn list_polls(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    status: Option<PollStatus>,
) -> ServiceResult<Vec<AvailabilityPoll>> {
    require_member(repo, band_id, caller).await?;
    Ok(repo.list_polls(band_id, status).await?)
}

pub async fn get_poll(
    repo: &dyn FullRepository,
    caller: UserId,
    poll_id: PollId,
) -> ServiceResult<AvailabilityPoll> {
    let poll = repo.get_poll(poll_id).await?;
    require_member(repo, poll.band_id, caller).await?;
    Ok(poll)
}

/// Record the caller's availability for one option, replacing any earlier answer.
///
/// A closed poll is rejected with `Validation`, an option of another poll
/// with `NotFound`; both are checked under the repository write.
pub async fn respond(
    repo: &dyn FullRepository,
    caller: UserId,
    poll_id: PollId,
    option_id: PollOptionId,
    availability: Availability,
) -> ServiceResult<PollResponse> {
    let poll = repo.get_poll(poll_id).await?;
    require_member(repo, poll.band_id, caller).await?;

    let response = repo
        .record_response(poll_id, option_id, caller, availability)
        .await?;
    log::debug!(
        "user {} answered {:?} for option {} of poll {}",
        caller,
        availability,
        option_id,
        poll_id
    );
    Ok(response)
}

/// Close a poll. Closing a closed poll is a no-op.
pub async fn close_poll(
    repo: &dyn FullRepository,
    caller: UserId,
    poll_id: PollId,
) -> ServiceResult<AvailabilityPoll> {
    let poll = repo.get_poll(poll_id).await?;
    require_admin(repo, poll.band_id, caller).await?;

    if !poll.is_open() {
        return Ok(poll);
    }
    let closed = repo.set_poll_status(poll_id, PollStatus::Closed).await?;
    log::info!("user {} closed poll {}", caller, poll_id);
    Ok(closed)
}
