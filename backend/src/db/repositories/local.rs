//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing, local development and demo deployments seeded
//! from a JSON snapshot. Entities live in ordered maps so enumeration order
//! is creation order and therefore deterministic.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use crate::db::repository::*;
use crate::db::snapshot::Snapshot;
use crate::models::*;

/// In-memory local repository.
///
/// Every operation takes the lock once, so multi-entity writes (a band with
/// its admin membership, a rehearsal with its attendance and the poll it
/// closes) are applied atomically.
///
/// # Example
/// ```
/// use rehearsal_scheduler::db::repositories::LocalRepository;
/// use rehearsal_scheduler::db::repository::UserRepository;
/// use rehearsal_scheduler::models::NewUser;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     let user = repo
///         .create_user(&NewUser {
///             first_name: "Ada".into(),
///             last_name: "Lovelace".into(),
///             email: "ada@example.com".into(),
///         })
///         .await
///         .unwrap();
///     assert_eq!(user.id.value(), 1);
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    users: BTreeMap<UserId, User>,
    bands: BTreeMap<BandId, Band>,
    // Creation order.
    memberships: Vec<BandMember>,
    polls: BTreeMap<PollId, AvailabilityPoll>,
    rehearsals: BTreeMap<RehearsalId, Rehearsal>,

    // ID counters
    next_user_id: i64,
    next_band_id: i64,
    next_poll_id: i64,
    next_option_id: i64,
    next_rehearsal_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            bands: BTreeMap::new(),
            memberships: Vec::new(),
            polls: BTreeMap::new(),
            rehearsals: BTreeMap::new(),
            next_user_id: 1,
            next_band_id: 1,
            next_poll_id: 1,
            next_option_id: 1,
            next_rehearsal_id: 1,
            is_healthy: true,
        }
    }
}

fn missing(operation: &str, entity: &str, id: impl Display) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} {} not found", entity, id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn next_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

impl LocalData {
    fn band(&self, operation: &str, band_id: BandId) -> RepositoryResult<&Band> {
        self.bands
            .get(&band_id)
            .ok_or_else(|| missing(operation, "band", band_id))
    }

    fn user(&self, operation: &str, user_id: UserId) -> RepositoryResult<&User> {
        self.users
            .get(&user_id)
            .ok_or_else(|| missing(operation, "user", user_id))
    }

    fn membership_index(&self, band_id: BandId, user_id: UserId) -> Option<usize> {
        self.memberships
            .iter()
            .position(|m| m.band_id == band_id && m.user_id == user_id)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn from_snapshot(snapshot: Snapshot) -> RepositoryResult<Self> {
        let mut data = LocalData::default();

        for user in snapshot.users {
            if data.email_taken(&user.email) {
                return Err(snapshot_error("user", user.id, "duplicate email"));
            }
            if data.users.insert(user.id, user.clone()).is_some() {
                return Err(snapshot_error("user", user.id, "duplicate id"));
            }
        }

        for band in snapshot.bands {
            if data.bands.insert(band.id, band.clone()).is_some() {
                return Err(snapshot_error("band", band.id, "duplicate id"));
            }
        }

        for member in snapshot.memberships {
            if !data.bands.contains_key(&member.band_id) {
                return Err(snapshot_error("band", member.band_id, "membership of unknown band"));
            }
            if !data.users.contains_key(&member.user_id) {
                return Err(snapshot_error("user", member.user_id, "membership of unknown user"));
            }
            if data.membership_index(member.band_id, member.user_id).is_some() {
                return Err(snapshot_error("user", member.user_id, "duplicate membership"));
            }
            data.memberships.push(member);
        }

        let mut option_ids = HashSet::new();
        for poll in snapshot.polls {
            if !data.bands.contains_key(&poll.band_id) {
                return Err(snapshot_error("poll", poll.id, "poll of unknown band"));
            }
            for option in &poll.options {
                if !option_ids.insert(option.id) {
                    return Err(snapshot_error("poll_option", option.id, "duplicate id"));
                }
                let mut responders = HashSet::new();
                if !option.responses.iter().all(|r| responders.insert(r.user_id)) {
                    return Err(snapshot_error(
                        "poll_option",
                        option.id,
                        "more than one response per user",
                    ));
                }
            }
            if data.polls.insert(poll.id, poll.clone()).is_some() {
                return Err(snapshot_error("poll", poll.id, "duplicate id"));
            }
        }

        for rehearsal in snapshot.rehearsals {
            if !data.bands.contains_key(&rehearsal.band_id) {
                return Err(snapshot_error(
                    "rehearsal",
                    rehearsal.id,
                    "rehearsal of unknown band",
                ));
            }
            if data.rehearsals.insert(rehearsal.id, rehearsal.clone()).is_some() {
                return Err(snapshot_error("rehearsal", rehearsal.id, "duplicate id"));
            }
        }

        data.next_user_id = data.users.keys().last().map_or(1, |id| id.value() + 1);
        data.next_band_id = data.bands.keys().last().map_or(1, |id| id.value() + 1);
        data.next_poll_id = data.polls.keys().last().map_or(1, |id| id.value() + 1);
        data.next_option_id = option_ids.iter().map(|id| id.value()).max().map_or(1, |id| id + 1);
        data.next_rehearsal_id = data
            .rehearsals
            .keys()
            .last()
            .map_or(1, |id| id.value() + 1);

        Ok(data)
    }
}

fn snapshot_error(entity: &str, id: impl Display, details: &str) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!("invalid snapshot: {} {}: {}", entity, id, details),
        ErrorContext::new("load_snapshot")
            .with_entity(entity)
            .with_entity_id(id)
            .with_details(details),
    )
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated from a snapshot.
    ///
    /// ID counters continue after the largest ID present in the snapshot.
    ///
    /// # Errors
    /// `ValidationError` when the snapshot has duplicate IDs, duplicate
    /// emails, duplicate responses, or references to unknown bands/users.
    pub fn from_snapshot(snapshot: Snapshot) -> RepositoryResult<Self> {
        let data = LocalData::from_snapshot(snapshot)?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Create a repository from a JSON snapshot file.
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let snapshot = Snapshot::from_file(path)?;
        Self::from_snapshot(snapshot)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== UserRepository ====================

#[async_trait]
impl UserRepository for LocalRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut data = self.data.write();
        let email = user.email.trim().to_string();
        if data.email_taken(&email) {
            return Err(RepositoryError::conflict_with_context(
                format!("email {} is already registered", email),
                ErrorContext::new("create_user").with_entity("user"),
            ));
        }

        let id = UserId::new(next_id(&mut data.next_user_id));
        let created = User {
            id,
            first_name: user.first_name.trim().to_string(),
            last_name: user.last_name.trim().to_string(),
            email,
        };
        data.users.insert(id, created.clone());
        Ok(created)
    }

    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User> {
        self.data.read().user("get_user", user_id).cloned()
    }

    async fn find_user(&self, user_id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.data.read().users.get(&user_id).cloned())
    }
}

// ==================== BandRepository ====================

#[async_trait]
impl BandRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_band(&self, band: &NewBand, creator: UserId) -> RepositoryResult<Band> {
        let mut data = self.data.write();
        data.user("create_band", creator)?;

        let now = Utc::now();
        let id = BandId::new(next_id(&mut data.next_band_id));
        let created = Band {
            id,
            name: band.name.trim().to_string(),
            description: band.description.clone(),
            created_at: now,
        };
        data.bands.insert(id, created.clone());
        data.memberships.push(BandMember {
            band_id: id,
            user_id: creator,
            role: MemberRole::Admin,
            status: MembershipStatus::Active,
            joined_at: now,
        });
        Ok(created)
    }

    async fn list_bands_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Band>> {
        let data = self.data.read();
        let band_ids: HashSet<BandId> = data
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id && m.is_active())
            .map(|m| m.band_id)
            .collect();
        Ok(data
            .bands
            .values()
            .filter(|b| band_ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn get_membership(
        &self,
        band_id: BandId,
        user_id: UserId,
    ) -> RepositoryResult<Option<BandMember>> {
        let data = self.data.read();
        Ok(data
            .membership_index(band_id, user_id)
            .map(|i| data.memberships[i].clone()))
    }

    async fn list_members(&self, band_id: BandId) -> RepositoryResult<Vec<BandMember>> {
        let data = self.data.read();
        data.band("list_members", band_id)?;
        Ok(data
            .memberships
            .iter()
            .filter(|m| m.band_id == band_id)
            .cloned()
            .collect())
    }

    async fn upsert_member(
        &self,
        band_id: BandId,
        user_id: UserId,
        role: MemberRole,
        status: MembershipStatus,
    ) -> RepositoryResult<BandMember> {
        let mut data = self.data.write();
        data.band("upsert_member", band_id)?;
        data.user("upsert_member", user_id)?;

        match data.membership_index(band_id, user_id) {
            Some(i) => {
                let member = &mut data.memberships[i];
                member.role = role;
                member.status = status;
                Ok(member.clone())
            }
            None => {
                let member = BandMember {
                    band_id,
                    user_id,
                    role,
                    status,
                    joined_at: Utc::now(),
                };
                data.memberships.push(member.clone());
                Ok(member)
            }
        }
    }

    async fn list_active_roster(&self, band_id: BandId) -> RepositoryResult<Vec<RosterMember>> {
        let data = self.data.read();
        data.band("list_active_roster", band_id)?;
        Ok(data
            .memberships
            .iter()
            .filter(|m| m.band_id == band_id && m.is_active())
            .filter_map(|m| data.users.get(&m.user_id))
            .map(RosterMember::from)
            .collect())
    }
}

// ==================== PollRepository ====================

#[async_trait]
impl PollRepository for LocalRepository {
    async fn create_poll(&self, poll: &NewPoll) -> RepositoryResult<AvailabilityPoll> {
        let mut data = self.data.write();
        data.band("create_poll", poll.band_id)?;

        let id = PollId::new(next_id(&mut data.next_poll_id));
        let mut options = Vec::with_capacity(poll.options.len());
        for option in &poll.options {
            options.push(PollOption {
                id: PollOptionId::new(next_id(&mut data.next_option_id)),
                start_time: option.start_time,
                end_time: option.end_time,
                responses: Vec::new(),
            });
        }

        let created = AvailabilityPoll {
            id,
            band_id: poll.band_id,
            title: poll.title.trim().to_string(),
            status: PollStatus::Open,
            created_by: poll.created_by,
            created_at: Utc::now(),
            options,
        };
        data.polls.insert(id, created.clone());
        Ok(created)
    }

    async fn get_poll(&self, poll_id: PollId) -> RepositoryResult<AvailabilityPoll> {
        self.data
            .read()
            .polls
            .get(&poll_id)
            .cloned()
            .ok_or_else(|| missing("get_poll", "poll", poll_id))
    }

    async fn list_polls(
        &self,
        band_id: BandId,
        status: Option<PollStatus>,
    ) -> RepositoryResult<Vec<AvailabilityPoll>> {
        let data = self.data.read();
        Ok(data
            .polls
            .values()
            .filter(|p| p.band_id == band_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn record_response(
        &self,
        poll_id: PollId,
        option_id: PollOptionId,
        user_id: UserId,
        availability: Availability,
    ) -> RepositoryResult<PollResponse> {
        let mut data = self.data.write();
        let poll = data
            .polls
            .get_mut(&poll_id)
            .ok_or_else(|| missing("record_response", "poll", poll_id))?;
        if !poll.is_open() {
            return Err(RepositoryError::validation_with_context(
                format!("poll {} is closed", poll_id),
                ErrorContext::new("record_response")
                    .with_entity("poll")
                    .with_entity_id(poll_id),
            ));
        }
        let option = poll
            .options
            .iter_mut()
            .find(|o| o.id == option_id)
            .ok_or_else(|| missing("record_response", "poll_option", option_id))?;

        let response = PollResponse {
            user_id,
            availability,
        };
        match option.responses.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => existing.availability = availability,
            None => option.responses.push(response.clone()),
        }
        Ok(response)
    }

    async fn set_poll_status(
        &self,
        poll_id: PollId,
        status: PollStatus,
    ) -> RepositoryResult<AvailabilityPoll> {
        let mut data = self.data.write();
        let poll = data
            .polls
            .get_mut(&poll_id)
            .ok_or_else(|| missing("set_poll_status", "poll", poll_id))?;
        poll.status = status;
        Ok(poll.clone())
    }

    async fn find_open_polls_in_window(
        &self,
        band_id: BandId,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<AvailabilityPoll>> {
        let data = self.data.read();
        Ok(data
            .polls
            .values()
            .filter(|p| p.band_id == band_id && p.is_open())
            .filter(|p| {
                p.options
                    .iter()
                    .any(|o| window.contains(o.start_time, o.end_time))
            })
            .cloned()
            .collect())
    }
}

// ==================== RehearsalRepository ====================

#[async_trait]
impl RehearsalRepository for LocalRepository {
    async fn create_rehearsal(
        &self,
        rehearsal: &NewRehearsal,
        created_by: UserId,
    ) -> RepositoryResult<Rehearsal> {
        let mut data = self.data.write();
        data.band("create_rehearsal", rehearsal.band_id)?;
        if let Some(poll_id) = rehearsal.poll_id {
            let poll = data
                .polls
                .get_mut(&poll_id)
                .ok_or_else(|| missing("create_rehearsal", "poll", poll_id))?;
            if poll.band_id != rehearsal.band_id {
                return Err(RepositoryError::validation_with_context(
                    format!(
                        "poll {} does not belong to band {}",
                        poll_id, rehearsal.band_id
                    ),
                    ErrorContext::new("create_rehearsal")
                        .with_entity("poll")
                        .with_entity_id(poll_id),
                ));
            }
            poll.status = PollStatus::Closed;
        }

        let attendance = data
            .memberships
            .iter()
            .filter(|m| m.band_id == rehearsal.band_id && m.is_active())
            .map(|m| Attendance::pending(m.user_id))
            .collect();

        let now = Utc::now();
        let id = RehearsalId::new(next_id(&mut data.next_rehearsal_id));
        let created = Rehearsal {
            id,
            band_id: rehearsal.band_id,
            title: rehearsal.title.trim().to_string(),
            start_time: rehearsal.start_time,
            end_time: rehearsal.end_time,
            location: rehearsal.location.clone(),
            notes: rehearsal.notes.clone(),
            status: RehearsalStatus::Scheduled,
            created_by,
            created_at: now,
            updated_at: now,
            poll_id: rehearsal.poll_id,
            is_recurring: rehearsal.is_recurring,
            recurring_pattern: rehearsal
                .recurring_pattern
                .clone()
                .filter(|_| rehearsal.is_recurring),
            attendance,
        };
        data.rehearsals.insert(id, created.clone());
        Ok(created)
    }

    async fn get_rehearsal(&self, rehearsal_id: RehearsalId) -> RepositoryResult<Rehearsal> {
        self.data
            .read()
            .rehearsals
            .get(&rehearsal_id)
            .cloned()
            .ok_or_else(|| missing("get_rehearsal", "rehearsal", rehearsal_id))
    }

    async fn list_rehearsals(
        &self,
        band_id: BandId,
        filter: &RehearsalFilter,
    ) -> RepositoryResult<Vec<Rehearsal>> {
        let data = self.data.read();
        let mut rehearsals: Vec<Rehearsal> = data
            .rehearsals
            .values()
            .filter(|r| r.band_id == band_id && filter.matches(r))
            .cloned()
            .collect();
        rehearsals.sort_by_key(|r| r.start_time);
        Ok(rehearsals)
    }

    async fn update_rehearsal(
        &self,
        rehearsal_id: RehearsalId,
        update: &RehearsalUpdate,
    ) -> RepositoryResult<Rehearsal> {
        let mut data = self.data.write();
        let rehearsal = data
            .rehearsals
            .get_mut(&rehearsal_id)
            .ok_or_else(|| missing("update_rehearsal", "rehearsal", rehearsal_id))?;

        let start_time = update.start_time.unwrap_or(rehearsal.start_time);
        let end_time = update.end_time.unwrap_or(rehearsal.end_time);
        if start_time >= end_time {
            return Err(RepositoryError::validation_with_context(
                "rehearsal must start before it ends",
                ErrorContext::new("update_rehearsal")
                    .with_entity("rehearsal")
                    .with_entity_id(rehearsal_id),
            ));
        }

        if let Some(title) = &update.title {
            rehearsal.title = title.trim().to_string();
        }
        rehearsal.start_time = start_time;
        rehearsal.end_time = end_time;
        if update.location.is_some() {
            rehearsal.location = update.location.clone();
        }
        if update.notes.is_some() {
            rehearsal.notes = update.notes.clone();
        }
        if let Some(status) = update.status {
            rehearsal.status = status;
        }
        rehearsal.updated_at = Utc::now();
        Ok(rehearsal.clone())
    }

    async fn delete_rehearsal(&self, rehearsal_id: RehearsalId) -> RepositoryResult<()> {
        self.data
            .write()
            .rehearsals
            .remove(&rehearsal_id)
            .map(|_| ())
            .ok_or_else(|| missing("delete_rehearsal", "rehearsal", rehearsal_id))
    }

    async fn upsert_attendance(
        &self,
        rehearsal_id: RehearsalId,
        user_id: UserId,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Attendance> {
        let mut data = self.data.write();
        let rehearsal = data
            .rehearsals
            .get_mut(&rehearsal_id)
            .ok_or_else(|| missing("upsert_attendance", "rehearsal", rehearsal_id))?;

        let attendance = Attendance {
            user_id,
            status,
            notes,
            response_time: Some(Utc::now()),
        };
        match rehearsal
            .attendance
            .iter_mut()
            .find(|a| a.user_id == user_id)
        {
            Some(existing) => *existing = attendance.clone(),
            None => rehearsal.attendance.push(attendance.clone()),
        }
        Ok(attendance)
    }
}
