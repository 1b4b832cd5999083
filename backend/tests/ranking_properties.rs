//! Property tests for the suggested-time ranking engine.

mod support;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;

use rehearsal_scheduler::models::{
    Availability, AvailabilityPoll, BandId, PollId, PollOption, PollOptionId, PollResponse,
    PollStatus, RosterMember, UserId,
};
use rehearsal_scheduler::scheduler::{compare_slots, rank_slots, SuggestionParams, MAX_SUGGESTIONS};
use support::at;

/// `(start offset hours, length in half hours, responses)`
type OptionSpec = (i64, i64, Vec<(i64, Availability)>);
/// `(open, options)`
type PollSpec = (bool, Vec<OptionSpec>);

fn availability() -> impl Strategy<Value = Availability> {
    prop_oneof![
        Just(Availability::Available),
        Just(Availability::Maybe),
        Just(Availability::Unavailable),
    ]
}

fn option_spec() -> impl Strategy<Value = OptionSpec> {
    (
        0i64..240,
        1i64..=10,
        prop::collection::vec((1i64..=12, availability()), 0..12),
    )
}

fn poll_specs() -> impl Strategy<Value = Vec<PollSpec>> {
    prop::collection::vec(
        (prop::bool::weighted(0.8), prop::collection::vec(option_spec(), 1..6)),
        0..6,
    )
}

fn base() -> DateTime<Utc> {
    at(1, 0)
}

fn build_polls(specs: &[PollSpec]) -> Vec<AvailabilityPoll> {
    let mut option_id = 0;
    specs
        .iter()
        .enumerate()
        .map(|(i, (open, options))| AvailabilityPoll {
            id: PollId::new(i as i64 + 1),
            band_id: BandId::new(1),
            title: format!("poll {}", i + 1),
            status: if *open {
                PollStatus::Open
            } else {
                PollStatus::Closed
            },
            created_by: UserId::new(1),
            created_at: base(),
            options: options
                .iter()
                .map(|(offset, halves, responses)| {
                    option_id += 1;
                    let start_time = base() + TimeDelta::hours(*offset);
                    PollOption {
                        id: PollOptionId::new(option_id),
                        start_time,
                        end_time: start_time + TimeDelta::minutes(30 * halves),
                        responses: responses
                            .iter()
                            .map(|(user, availability)| PollResponse {
                                user_id: UserId::new(*user),
                                availability: *availability,
                            })
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect()
}

fn roster(size: i64) -> Vec<RosterMember> {
    (1..=size)
        .map(|id| RosterMember::new(UserId::new(id), format!("Member {}", id)))
        .collect()
}

/// Window covering offsets 24h..200h.
fn params(duration: i64, min_attendees: Option<i64>) -> SuggestionParams {
    let params = SuggestionParams::new(base() + TimeDelta::hours(24), base() + TimeDelta::hours(200))
        .with_duration_minutes(duration);
    match min_attendees {
        Some(min) => params.with_min_attendees(min),
        None => params,
    }
}

/// Available count computed independently: first response per roster member.
fn expected_available(option: &PollOption, members: &HashSet<UserId>) -> usize {
    let mut first: HashMap<UserId, Availability> = HashMap::new();
    for r in &option.responses {
        if members.contains(&r.user_id) {
            first.entry(r.user_id).or_insert(r.availability);
        }
    }
    first
        .values()
        .filter(|a| **a == Availability::Available)
        .count()
}

proptest! {
    #[test]
    fn suggestions_satisfy_filters_and_bounds(
        specs in poll_specs(),
        roster_size in 0i64..8,
        duration in 1i64..=300,
        min_attendees in prop::option::of(0i64..5),
    ) {
        let polls = build_polls(&specs);
        let roster = roster(roster_size);
        let p = params(duration, min_attendees);
        let result = rank_slots(&polls, &roster, &p).unwrap();

        let quorum = min_attendees.map_or((roster_size as usize).div_ceil(2), |m| m as usize);
        prop_assert_eq!(result.min_attendees, quorum);
        prop_assert_eq!(result.total_members, roster_size as usize);
        prop_assert!(result.slots.len() <= MAX_SUGGESTIONS);

        for slot in &result.slots {
            prop_assert!(slot.duration_minutes() >= duration);
            prop_assert!(slot.available_count >= quorum);
            prop_assert!(slot.start_time >= p.window.start && slot.end_time <= p.window.end);
            prop_assert_eq!(slot.available_members.len(), slot.available_count);
            prop_assert!(slot.available_count + slot.maybe_count <= roster_size as usize);
            prop_assert_eq!(slot.total_count, roster_size as usize);
        }
    }

    #[test]
    fn stale_and_duplicate_responses_are_ignored(
        specs in poll_specs(),
        roster_size in 0i64..8,
    ) {
        let polls = build_polls(&specs);
        let roster = roster(roster_size);
        let members: HashSet<UserId> = roster.iter().map(|m| m.id).collect();
        let result = rank_slots(&polls, &roster, &params(30, Some(0))).unwrap();

        let options: HashMap<PollOptionId, &PollOption> = polls
            .iter()
            .flat_map(|p| p.options.iter().map(|o| (o.id, o)))
            .collect();
        for slot in &result.slots {
            let option = options[&slot.option_id];
            prop_assert_eq!(slot.available_count, expected_available(option, &members));
            for member in &slot.available_members {
                prop_assert!(members.contains(&member.id));
            }
            let unique: HashSet<UserId> = slot.available_members.iter().map(|m| m.id).collect();
            prop_assert_eq!(unique.len(), slot.available_members.len());
        }
    }

    #[test]
    fn output_is_sorted_and_complete(
        specs in poll_specs(),
        roster_size in 0i64..8,
        duration in 1i64..=300,
        min_attendees in prop::option::of(0i64..5),
    ) {
        let polls = build_polls(&specs);
        let roster = roster(roster_size);
        let members: HashSet<UserId> = roster.iter().map(|m| m.id).collect();
        let p = params(duration, min_attendees);
        let result = rank_slots(&polls, &roster, &p).unwrap();

        for pair in result.slots.windows(2) {
            prop_assert_ne!(compare_slots(&pair[0], &pair[1]), Ordering::Greater);
        }

        let eligible = polls
            .iter()
            .filter(|poll| poll.status == PollStatus::Open)
            .flat_map(|poll| poll.options.iter())
            .filter(|o| p.window.contains(o.start_time, o.end_time))
            .filter(|o| (o.end_time - o.start_time).num_minutes() >= duration)
            .filter(|o| expected_available(o, &members) >= result.min_attendees)
            .count();
        prop_assert_eq!(result.slots.len(), eligible.min(MAX_SUGGESTIONS));
    }

    #[test]
    fn ranking_is_deterministic(
        specs in poll_specs(),
        roster_size in 0i64..8,
        duration in 1i64..=300,
    ) {
        let polls = build_polls(&specs);
        let roster = roster(roster_size);
        let p = params(duration, None);
        let first = rank_slots(&polls, &roster, &p).unwrap();
        let second = rank_slots(&polls, &roster, &p).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_positive_duration_is_rejected(duration in -500i64..=0) {
        prop_assert!(rank_slots(&[], &[], &params(duration, None)).is_err());
    }
}
