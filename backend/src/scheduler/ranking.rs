//! Ranking of candidate rehearsal slots from availability polls.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::error::{SchedulingError, SchedulingResult};
use crate::models::{
    interval_length, Availability, AvailabilityPoll, PollId, PollOption, PollOptionId,
    RosterMember, TimeWindow, UserId,
};

/// Rehearsal length assumed when the caller does not ask for one.
pub const DEFAULT_DURATION_MINUTES: i64 = 120;

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// Identity of an available member attached to a ranked slot.
pub type MemberSummary = RosterMember;

/// Caller-supplied constraints, before defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionParams {
    pub window: TimeWindow,
    /// Minimum slot length in minutes; defaults to [`DEFAULT_DURATION_MINUTES`].
    pub duration_minutes: Option<i64>,
    /// Quorum; defaults to half the active roster, rounded up.
    pub min_attendees: Option<i64>,
}

impl SuggestionParams {
    pub fn new(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            window: TimeWindow::new(window_start, window_end),
            duration_minutes: None,
            min_attendees: None,
        }
    }

    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_min_attendees(mut self, count: i64) -> Self {
        self.min_attendees = Some(count);
        self
    }

    /// Checks every constraint that does not depend on the roster size.
    pub fn validate(&self) -> SchedulingResult<()> {
        self.resolve(0).map(|_| ())
    }

    /// Applies defaults against a roster of `member_count` active members.
    pub fn resolve(&self, member_count: usize) -> SchedulingResult<ResolvedConstraints> {
        if self.window.is_empty() {
            return Err(SchedulingError::InvalidRange {
                start: self.window.start,
                end: self.window.end,
            });
        }

        let duration_minutes = self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        if duration_minutes <= 0 {
            return Err(SchedulingError::invalid_constraint(format!(
                "requested duration must be positive, got {} minutes",
                duration_minutes
            )));
        }
        let duration = TimeDelta::try_minutes(duration_minutes).ok_or_else(|| {
            SchedulingError::invalid_constraint(format!(
                "requested duration of {} minutes is out of range",
                duration_minutes
            ))
        })?;

        let min_attendees = match self.min_attendees {
            Some(count) => usize::try_from(count).map_err(|_| {
                SchedulingError::invalid_constraint(format!(
                    "minimum attendees cannot be negative, got {}",
                    count
                ))
            })?,
            None => member_count.div_ceil(2),
        };

        Ok(ResolvedConstraints {
            window: self.window,
            duration_minutes,
            duration,
            min_attendees,
        })
    }
}

/// Constraints with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConstraints {
    pub window: TimeWindow,
    pub duration_minutes: i64,
    pub duration: TimeDelta,
    pub min_attendees: usize,
}

impl ResolvedConstraints {
    /// Option lies fully inside the window and is at least `duration` long.
    pub fn admits(&self, option: &PollOption) -> bool {
        self.window.contains(option.start_time, option.end_time)
            && interval_length(option.start_time, option.end_time) >= self.duration
    }
}

/// A candidate slot with its availability tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available_count: usize,
    pub maybe_count: usize,
    pub total_count: usize,
    pub available_members: Vec<MemberSummary>,
    pub poll_id: PollId,
    pub option_id: PollOptionId,
}

impl RankedSlot {
    pub fn duration_minutes(&self) -> i64 {
        interval_length(self.start_time, self.end_time).num_minutes()
    }
}

/// Engine output together with the constraints that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub slots: Vec<RankedSlot>,
    pub total_members: usize,
    pub min_attendees: usize,
    pub requested_duration_minutes: i64,
}

/// Ranks the options of the open `polls` against the active `roster`.
///
/// Closed polls and options not fully inside the window are ignored.
/// Responses from users missing from the roster do not count, and when a
/// user answered the same option twice only the first answer is used.
///
/// The result is ordered by available count (desc), maybe count (desc) and
/// start time (asc); remaining ties keep the order of `polls` and their
/// options. At most [`MAX_SUGGESTIONS`] slots are returned.
///
/// # Errors
/// * [`SchedulingError::InvalidRange`] if the window is empty or inverted
/// * [`SchedulingError::InvalidConstraint`] if the duration is not positive
///   or the quorum is negative
pub fn rank_slots(
    polls: &[AvailabilityPoll],
    roster: &[RosterMember],
    params: &SuggestionParams,
) -> SchedulingResult<Suggestions> {
    let names = roster_index(roster);
    let constraints = params.resolve(names.len())?;

    let mut slots: Vec<RankedSlot> = polls
        .iter()
        .filter(|poll| poll.is_open())
        .flat_map(|poll| poll.options.iter().map(move |option| (poll.id, option)))
        .filter(|(_, option)| constraints.admits(option))
        .map(|(poll_id, option)| tally(poll_id, option, &names))
        .filter(|slot| slot.available_count >= constraints.min_attendees)
        .collect();

    // `sort_by` is stable.
    slots.sort_by(compare_slots);
    slots.truncate(MAX_SUGGESTIONS);

    Ok(Suggestions {
        slots,
        total_members: names.len(),
        min_attendees: constraints.min_attendees,
        requested_duration_minutes: constraints.duration_minutes,
    })
}

/// Total order used for ranking (stable sort keeps input order on full ties).
pub fn compare_slots(a: &RankedSlot, b: &RankedSlot) -> Ordering {
    b.available_count
        .cmp(&a.available_count)
        .then_with(|| b.maybe_count.cmp(&a.maybe_count))
        .then_with(|| a.start_time.cmp(&b.start_time))
}

fn roster_index(roster: &[RosterMember]) -> HashMap<UserId, &str> {
    let mut names = HashMap::with_capacity(roster.len());
    for member in roster {
        names
            .entry(member.id)
            .or_insert(member.display_name.as_str());
    }
    names
}

fn tally(poll_id: PollId, option: &PollOption, names: &HashMap<UserId, &str>) -> RankedSlot {
    let mut seen = HashSet::with_capacity(option.responses.len());
    let mut available_members = Vec::new();
    let mut maybe_count = 0;

    for response in &option.responses {
        let Some(name) = names.get(&response.user_id) else {
            continue;
        };
        if !seen.insert(response.user_id) {
            continue;
        }
        match response.availability {
            Availability::Available => {
                available_members.push(MemberSummary::new(response.user_id, *name))
            }
            Availability::Maybe => maybe_count += 1,
            Availability::Unavailable => {}
        }
    }

    RankedSlot {
        start_time: option.start_time,
        end_time: option.end_time,
        available_count: available_members.len(),
        maybe_count,
        total_count: names.len(),
        available_members,
        poll_id,
        option_id: option.id,
    }
}
