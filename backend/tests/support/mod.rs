#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rehearsal_scheduler::db::repository::{BandRepository, PollRepository, UserRepository};
use rehearsal_scheduler::db::LocalRepository;
use rehearsal_scheduler::models::{
    Availability, AvailabilityPoll, BandId, MemberRole, MembershipStatus, NewBand, NewPoll,
    NewPollOption, NewUser, UserId,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars across tests running in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// `2024-03-{day} {hour}:00 UTC`.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

/// A band whose members are all active; `members[0]` is the admin.
pub struct BandFixture {
    pub repo: LocalRepository,
    pub band: BandId,
    pub members: Vec<UserId>,
}

impl BandFixture {
    pub async fn new(member_count: usize) -> Self {
        assert!(member_count > 0);
        let repo = LocalRepository::new();
        let mut members = Vec::with_capacity(member_count);
        for i in 0..member_count {
            let user = repo
                .create_user(&NewUser {
                    first_name: format!("Member{}", i + 1),
                    last_name: "Test".into(),
                    email: format!("member{}@example.com", i + 1),
                })
                .await
                .unwrap();
            members.push(user.id);
        }
        let band = repo
            .create_band(
                &NewBand {
                    name: "Fixture Band".into(),
                    description: None,
                },
                members[0],
            )
            .await
            .unwrap();
        for id in &members[1..] {
            repo.upsert_member(band.id, *id, MemberRole::Member, MembershipStatus::Active)
                .await
                .unwrap();
        }
        Self {
            repo,
            band: band.id,
            members,
        }
    }

    pub fn admin(&self) -> UserId {
        self.members[0]
    }

    pub async fn open_poll(&self, options: &[(DateTime<Utc>, DateTime<Utc>)]) -> AvailabilityPoll {
        self.repo
            .create_poll(&NewPoll {
                band_id: self.band,
                title: "Fixture poll".into(),
                created_by: self.admin(),
                options: options
                    .iter()
                    .map(|(start_time, end_time)| NewPollOption {
                        start_time: *start_time,
                        end_time: *end_time,
                    })
                    .collect(),
            })
            .await
            .unwrap()
    }

    /// Member `member` (index into `members`) answers option `option` of `poll`.
    pub async fn answer(
        &self,
        poll: &AvailabilityPoll,
        option: usize,
        member: usize,
        availability: Availability,
    ) {
        self.repo
            .record_response(
                poll.id,
                poll.options[option].id,
                self.members[member],
                availability,
            )
            .await
            .unwrap();
    }
}
