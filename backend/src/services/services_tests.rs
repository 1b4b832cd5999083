use chrono::{DateTime, TimeZone, Utc};

use crate::db::repositories::LocalRepository;
use crate::db::repository::PollRepository;
use crate::models::*;
use crate::services::error::ServiceError;
use crate::services::{bands, polls, rehearsals, users};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

async fn register(repo: &LocalRepository, first: &str) -> User {
    users::register_user(
        repo,
        NewUser {
            first_name: first.into(),
            last_name: "Player".into(),
            email: format!("{}@example.com", first.to_lowercase()),
        },
    )
    .await
    .unwrap()
}

/// Band with an admin and one regular member.
async fn band_fixture(repo: &LocalRepository) -> (Band, User, User) {
    let admin = register(repo, "Alice").await;
    let member = register(repo, "Bob").await;
    let band = bands::create_band(
        repo,
        admin.id,
        NewBand {
            name: "Quartet".into(),
            description: Some("strings".into()),
        },
    )
    .await
    .unwrap();
    bands::add_member(repo, admin.id, band.id, member.id, MemberRole::Member)
        .await
        .unwrap();
    (band, admin, member)
}

fn one_option() -> Vec<NewPollOption> {
    vec![NewPollOption {
        start_time: at(4, 18),
        end_time: at(4, 21),
    }]
}

fn new_rehearsal(band_id: BandId, poll_id: Option<PollId>) -> NewRehearsal {
    NewRehearsal {
        band_id,
        title: "Run-through".into(),
        start_time: at(4, 18),
        end_time: at(4, 21),
        location: Some("Studio B".into()),
        notes: None,
        poll_id,
        is_recurring: false,
        recurring_pattern: None,
    }
}

// ==================== users ====================

#[tokio::test]
async fn test_register_user_validates_email() {
    let repo = LocalRepository::new();
    let err = users::register_user(
        &repo,
        NewUser {
            first_name: "No".into(),
            last_name: "Email".into(),
            email: "not-an-email".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_register_user_duplicate_email_conflicts() {
    let repo = LocalRepository::new();
    register(&repo, "Alice").await;
    let err = users::register_user(
        &repo,
        NewUser {
            first_name: "Other".into(),
            last_name: "Alice".into(),
            email: "ALICE@example.com".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let repo = LocalRepository::new();
    let err = users::get_user(&repo, UserId::new(42)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

// ==================== bands ====================

#[tokio::test]
async fn test_create_band_requires_name() {
    let repo = LocalRepository::new();
    let admin = register(&repo, "Alice").await;
    let err = bands::create_band(
        &repo,
        admin.id,
        NewBand {
            name: "   ".into(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_only_admins_add_members() {
    let repo = LocalRepository::new();
    let (band, _, member) = band_fixture(&repo).await;
    let carol = register(&repo, "Carol").await;

    let err = bands::add_member(&repo, member.id, band.id, carol.id, MemberRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_add_active_member_conflicts() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;

    let err = bands::add_member(&repo, admin.id, band.id, member.id, MemberRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_add_member_reactivates_with_new_role() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    bands::set_member_status(&repo, admin.id, band.id, member.id, MembershipStatus::Inactive)
        .await
        .unwrap();

    let back = bands::add_member(&repo, admin.id, band.id, member.id, MemberRole::Admin)
        .await
        .unwrap();
    assert!(back.is_active_admin());
}

#[tokio::test]
async fn test_add_unknown_user_is_not_found() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let err = bands::add_member(&repo, admin.id, band.id, UserId::new(99), MemberRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_last_admin_cannot_be_deactivated() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;

    let err = bands::set_member_status(&repo, admin.id, band.id, admin.id, MembershipStatus::Inactive)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_inactive_member_loses_access() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    bands::set_member_status(&repo, admin.id, band.id, member.id, MembershipStatus::Inactive)
        .await
        .unwrap();

    let err = bands::list_members(&repo, member.id, band.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert!(bands::list_user_bands(&repo, member.id).await.unwrap().is_empty());
}

// ==================== polls ====================

#[tokio::test]
async fn test_create_poll_validation() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;

    let err = polls::create_poll(&repo, admin.id, band.id, "March".into(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let inverted = vec![NewPollOption {
        start_time: at(4, 21),
        end_time: at(4, 18),
    }];
    let err = polls::create_poll(&repo, admin.id, band.id, "March".into(), inverted)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = polls::create_poll(&repo, member.id, band.id, "March".into(), one_option())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_respond_upserts_and_requires_open_poll() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    let poll = polls::create_poll(&repo, admin.id, band.id, "March".into(), one_option())
        .await
        .unwrap();
    let option_id = poll.options[0].id;

    polls::respond(&repo, member.id, poll.id, option_id, Availability::Maybe)
        .await
        .unwrap();
    polls::respond(&repo, member.id, poll.id, option_id, Availability::Available)
        .await
        .unwrap();
    let stored = polls::get_poll(&repo, member.id, poll.id).await.unwrap();
    assert_eq!(
        stored.options[0].responses,
        vec![PollResponse {
            user_id: member.id,
            availability: Availability::Available
        }]
    );

    let err = polls::respond(&repo, member.id, poll.id, PollOptionId::new(77), Availability::Maybe)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    polls::close_poll(&repo, admin.id, poll.id).await.unwrap();
    let err = polls::respond(&repo, member.id, poll.id, option_id, Availability::Maybe)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_close_poll_is_idempotent() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let poll = polls::create_poll(&repo, admin.id, band.id, "March".into(), one_option())
        .await
        .unwrap();

    let first = polls::close_poll(&repo, admin.id, poll.id).await.unwrap();
    let second = polls::close_poll(&repo, admin.id, poll.id).await.unwrap();
    assert_eq!(first.status, PollStatus::Closed);
    assert_eq!(first, second);

    let open = polls::list_polls(&repo, admin.id, band.id, Some(PollStatus::Open))
        .await
        .unwrap();
    assert!(open.is_empty());
}

#[tokio::test]
async fn test_outsider_cannot_read_poll() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let outsider = register(&repo, "Eve").await;
    let poll = polls::create_poll(&repo, admin.id, band.id, "March".into(), one_option())
        .await
        .unwrap();

    let err = polls::get_poll(&repo, outsider.id, poll.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

// ==================== rehearsals ====================

#[tokio::test]
async fn test_create_rehearsal_seeds_attendance_and_closes_poll() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    let poll = polls::create_poll(&repo, admin.id, band.id, "March".into(), one_option())
        .await
        .unwrap();

    let rehearsal = rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, Some(poll.id)))
        .await
        .unwrap();

    assert_eq!(rehearsal.status, RehearsalStatus::Scheduled);
    assert_eq!(
        rehearsal.attendance,
        vec![Attendance::pending(admin.id), Attendance::pending(member.id)]
    );
    assert_eq!(repo.get_poll(poll.id).await.unwrap().status, PollStatus::Closed);
}

#[tokio::test]
async fn test_create_rehearsal_rejects_foreign_poll() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let other = bands::create_band(
        &repo,
        admin.id,
        NewBand {
            name: "Side project".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    let foreign = polls::create_poll(&repo, admin.id, other.id, "April".into(), one_option())
        .await
        .unwrap();

    let err = rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, Some(foreign.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(repo.get_poll(foreign.id).await.unwrap().is_open());
}

#[tokio::test]
async fn test_create_rehearsal_validates_times() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let mut inverted = new_rehearsal(band.id, None);
    inverted.end_time = inverted.start_time;

    let err = rehearsals::create_rehearsal(&repo, admin.id, inverted)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

fn weekly_pattern() -> RecurringPattern {
    RecurringPattern {
        frequency: RecurrenceFrequency::Weekly,
        day_of_week: Some(1),
        day_of_month: None,
        start_date: at(4, 0),
        end_date: None,
        times_of_day: vec![TimeOfDayRange {
            start_time: "18:00".into(),
            end_time: "21:00".into(),
        }],
    }
}

#[tokio::test]
async fn test_recurring_rehearsal_keeps_its_pattern() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;

    let mut missing_pattern = new_rehearsal(band.id, None);
    missing_pattern.is_recurring = true;
    let err = rehearsals::create_rehearsal(&repo, admin.id, missing_pattern)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("recurringPattern")));

    let mut bad_pattern = new_rehearsal(band.id, None);
    bad_pattern.is_recurring = true;
    bad_pattern.recurring_pattern = Some(RecurringPattern {
        day_of_week: Some(9),
        ..weekly_pattern()
    });
    let err = rehearsals::create_rehearsal(&repo, admin.id, bad_pattern)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut weekly = new_rehearsal(band.id, None);
    weekly.is_recurring = true;
    weekly.recurring_pattern = Some(weekly_pattern());
    let created = rehearsals::create_rehearsal(&repo, admin.id, weekly)
        .await
        .unwrap();
    let stored = rehearsals::get_rehearsal(&repo, admin.id, created.id)
        .await
        .unwrap();
    assert!(stored.is_recurring);
    assert_eq!(stored.recurring_pattern, Some(weekly_pattern()));

    let mut one_off = new_rehearsal(band.id, None);
    one_off.recurring_pattern = Some(weekly_pattern());
    let created = rehearsals::create_rehearsal(&repo, admin.id, one_off)
        .await
        .unwrap();
    assert!(!created.is_recurring);
    assert_eq!(created.recurring_pattern, None);
}

#[tokio::test]
async fn test_list_band_rehearsals_filters_and_orders() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;

    let mut late = new_rehearsal(band.id, None);
    late.start_time = at(20, 18);
    late.end_time = at(20, 21);
    rehearsals::create_rehearsal(&repo, admin.id, late).await.unwrap();
    rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, None))
        .await
        .unwrap();

    let all = rehearsals::list_band_rehearsals(&repo, member.id, band.id, RehearsalFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].start_time < all[1].start_time);

    let early_only = rehearsals::list_band_rehearsals(
        &repo,
        member.id,
        band.id,
        RehearsalFilter {
            start: Some(at(1, 0)),
            end: Some(at(10, 0)),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(early_only.len(), 1);

    // A lone bound is ignored.
    let start_only = rehearsals::list_band_rehearsals(
        &repo,
        member.id,
        band.id,
        RehearsalFilter {
            start: Some(at(10, 0)),
            end: None,
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(start_only.len(), 2);
}

#[tokio::test]
async fn test_update_and_delete_require_admin() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    let rehearsal = rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, None))
        .await
        .unwrap();

    let update = RehearsalUpdate {
        status: Some(RehearsalStatus::Cancelled),
        ..Default::default()
    };
    let err = rehearsals::update_rehearsal(&repo, member.id, rehearsal.id, update.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let updated = rehearsals::update_rehearsal(&repo, admin.id, rehearsal.id, update)
        .await
        .unwrap();
    assert_eq!(updated.status, RehearsalStatus::Cancelled);
    assert!(updated.updated_at >= rehearsal.updated_at);

    let err = rehearsals::delete_rehearsal(&repo, member.id, rehearsal.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    rehearsals::delete_rehearsal(&repo, admin.id, rehearsal.id)
        .await
        .unwrap();
    let err = rehearsals::get_rehearsal(&repo, admin.id, rehearsal.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_update_rehearsal_rejects_inverted_result() {
    let repo = LocalRepository::new();
    let (band, admin, _) = band_fixture(&repo).await;
    let rehearsal = rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, None))
        .await
        .unwrap();

    let err = rehearsals::update_rehearsal(
        &repo,
        admin.id,
        rehearsal.id,
        RehearsalUpdate {
            start_time: Some(at(4, 22)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_update_attendance() {
    let repo = LocalRepository::new();
    let (band, admin, member) = band_fixture(&repo).await;
    let rehearsal = rehearsals::create_rehearsal(&repo, admin.id, new_rehearsal(band.id, None))
        .await
        .unwrap();

    let err = rehearsals::update_attendance(
        &repo,
        member.id,
        rehearsal.id,
        AttendanceStatus::NoResponse,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let attendance = rehearsals::update_attendance(
        &repo,
        member.id,
        rehearsal.id,
        AttendanceStatus::Attending,
        Some("bringing the cello".into()),
    )
    .await
    .unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Attending);
    assert!(attendance.response_time.is_some());

    let stored = rehearsals::get_rehearsal(&repo, member.id, rehearsal.id)
        .await
        .unwrap();
    let row = stored
        .attendance
        .iter()
        .find(|a| a.user_id == member.id)
        .unwrap();
    assert_eq!(row.notes.as_deref(), Some("bringing the cello"));
    assert_eq!(stored.attendance.len(), 2);
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(crate::services::health_check(&repo).await.unwrap());
    repo.set_healthy(false);
    assert!(!crate::services::health_check(&repo).await.unwrap());
}
