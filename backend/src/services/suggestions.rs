//! Suggested rehearsal times for a band.

use crate::db::repository::{BandRepository, FullRepository, PollRepository};
use crate::models::{BandId, BandMember, UserId};
use crate::scheduler::{rank_slots, SuggestionParams, Suggestions};

use super::access::require_member;
use super::error::ServiceResult;

/// Rank the options of the band's open polls inside `params.window`.
///
/// Membership is checked first, then the parameters, before polls and
/// roster are read.
pub async fn suggest_times(
    repo: &dyn FullRepository,
    caller: UserId,
    band_id: BandId,
    params: SuggestionParams,
) -> ServiceResult<Suggestions> {
    let member = require_member(repo, band_id, caller).await?;
    suggest_times_for(repo, &member, params).await
}

/// [`suggest_times`] for a membership the caller already holds, for callers
/// that must authorize before they can build `params`.
pub async fn suggest_times_for(
    repo: &dyn FullRepository,
    member: &BandMember,
    params: SuggestionParams,
) -> ServiceResult<Suggestions> {
    let band_id = member.band_id;
    params.validate()?;

    let polls = repo.find_open_polls_in_window(band_id, &params.window).await?;
    let roster = repo.list_active_roster(band_id).await?;
    let suggestions = rank_slots(&polls, &roster, &params)?;

    log::debug!(
        "band {}: {} polls, {} active members, {} suggestions",
        band_id,
        polls.len(),
        roster.len(),
        suggestions.slots.len()
    );
    Ok(suggestions)
}
