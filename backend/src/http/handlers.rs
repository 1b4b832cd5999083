//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::dto::{
    AddMemberRequest, AttendanceRequest, CreatePollRequest, HealthResponse, MemberStatusRequest,
    PollListQuery, RehearsalListQuery, RespondRequest, SuggestedTimesQuery,
    SuggestedTimesResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{
    Attendance, AvailabilityPoll, Band, BandId, BandMember, NewBand, NewRehearsal, NewUser,
    PollId, PollOptionId, PollResponse, Rehearsal, RehearsalId, RehearsalUpdate, User, UserId,
};
use crate::services::{self, bands, polls, rehearsals, users};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Liveness plus repository health.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        repository,
    }))
}

// =============================================================================
// Users
// =============================================================================

/// POST /api/users
///
/// Registration does not require an identity header.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = users::register_user(state.repository.as_ref(), request).await?;
    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/me
pub async fn current_user(user: CurrentUser) -> HandlerResult<User> {
    Ok(Json(user.0))
}

// =============================================================================
// Bands
// =============================================================================

/// POST /api/bands
pub async fn create_band(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NewBand>,
) -> Result<(StatusCode, Json<Band>), AppError> {
    let band = bands::create_band(state.repository.as_ref(), user.id(), request).await?;
    info!(band_id = %band.id, user_id = %user.id(), "band created");
    Ok((StatusCode::CREATED, Json(band)))
}

/// GET /api/bands
pub async fn list_bands(
    State(state): State<AppState>,
    user: CurrentUser,
) -> HandlerResult<Vec<Band>> {
    let bands = bands::list_user_bands(state.repository.as_ref(), user.id()).await?;
    Ok(Json(bands))
}

/// GET /api/bands/{band_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
) -> HandlerResult<Vec<BandMember>> {
    let members =
        bands::list_members(state.repository.as_ref(), user.id(), BandId::new(band_id)).await?;
    Ok(Json(members))
}

/// POST /api/bands/{band_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<BandMember>), AppError> {
    let member = bands::add_member(
        state.repository.as_ref(),
        user.id(),
        BandId::new(band_id),
        request.user_id,
        request.role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/bands/{band_id}/members/{user_id}/status
pub async fn set_member_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((band_id, member_id)): Path<(i64, i64)>,
    Json(request): Json<MemberStatusRequest>,
) -> HandlerResult<BandMember> {
    let member = bands::set_member_status(
        state.repository.as_ref(),
        user.id(),
        BandId::new(band_id),
        UserId::new(member_id),
        request.status,
    )
    .await?;
    Ok(Json(member))
}

// =============================================================================
// Availability polls
// =============================================================================

/// POST /api/bands/{band_id}/polls
pub async fn create_poll(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
    Json(request): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<AvailabilityPoll>), AppError> {
    let poll = polls::create_poll(
        state.repository.as_ref(),
        user.id(),
        BandId::new(band_id),
        request.title,
        request.options,
    )
    .await?;
    info!(poll_id = %poll.id, band_id, "poll opened");
    Ok((StatusCode::CREATED, Json(poll)))
}

/// GET /api/bands/{band_id}/polls?status=OPEN|CLOSED
pub async fn list_polls(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
    Query(query): Query<PollListQuery>,
) -> HandlerResult<Vec<AvailabilityPoll>> {
    let polls = polls::list_polls(
        state.repository.as_ref(),
        user.id(),
        BandId::new(band_id),
        query.status()?,
    )
    .await?;
    Ok(Json(polls))
}

/// GET /api/polls/{poll_id}
pub async fn get_poll(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(poll_id): Path<i64>,
) -> HandlerResult<AvailabilityPoll> {
    let poll = polls::get_poll(state.repository.as_ref(), user.id(), PollId::new(poll_id)).await?;
    Ok(Json(poll))
}

/// PUT /api/polls/{poll_id}/options/{option_id}/response
pub async fn respond_to_poll(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((poll_id, option_id)): Path<(i64, i64)>,
    Json(request): Json<RespondRequest>,
) -> HandlerResult<PollResponse> {
    let response = polls::respond(
        state.repository.as_ref(),
        user.id(),
        PollId::new(poll_id),
        PollOptionId::new(option_id),
        request.availability,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/polls/{poll_id}/close
pub async fn close_poll(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(poll_id): Path<i64>,
) -> HandlerResult<AvailabilityPoll> {
    let poll =
        polls::close_poll(state.repository.as_ref(), user.id(), PollId::new(poll_id)).await?;
    Ok(Json(poll))
}

// =============================================================================
// Rehearsals
// =============================================================================

/// GET /api/rehearsals/band/{band_id}?start=&end=&status=
pub async fn list_band_rehearsals(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
    Query(query): Query<RehearsalListQuery>,
) -> HandlerResult<Vec<Rehearsal>> {
    let rehearsals = rehearsals::list_band_rehearsals(
        state.repository.as_ref(),
        user.id(),
        BandId::new(band_id),
        query.to_filter()?,
    )
    .await?;
    Ok(Json(rehearsals))
}

/// POST /api/rehearsals
pub async fn create_rehearsal(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NewRehearsal>,
) -> Result<(StatusCode, Json<Rehearsal>), AppError> {
    let rehearsal =
        rehearsals::create_rehearsal(state.repository.as_ref(), user.id(), request).await?;
    info!(
        rehearsal_id = %rehearsal.id,
        band_id = %rehearsal.band_id,
        "rehearsal scheduled"
    );
    Ok((StatusCode::CREATED, Json(rehearsal)))
}

/// GET /api/rehearsals/{id}
pub async fn get_rehearsal(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rehearsal_id): Path<i64>,
) -> HandlerResult<Rehearsal> {
    let rehearsal = rehearsals::get_rehearsal(
        state.repository.as_ref(),
        user.id(),
        RehearsalId::new(rehearsal_id),
    )
    .await?;
    Ok(Json(rehearsal))
}

/// PUT /api/rehearsals/{id}
pub async fn update_rehearsal(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rehearsal_id): Path<i64>,
    Json(request): Json<RehearsalUpdate>,
) -> HandlerResult<Rehearsal> {
    let rehearsal = rehearsals::update_rehearsal(
        state.repository.as_ref(),
        user.id(),
        RehearsalId::new(rehearsal_id),
        request,
    )
    .await?;
    Ok(Json(rehearsal))
}

/// DELETE /api/rehearsals/{id}
pub async fn delete_rehearsal(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rehearsal_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    rehearsals::delete_rehearsal(
        state.repository.as_ref(),
        user.id(),
        RehearsalId::new(rehearsal_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/rehearsals/{id}/attendance
pub async fn update_attendance(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rehearsal_id): Path<i64>,
    Json(request): Json<AttendanceRequest>,
) -> HandlerResult<Attendance> {
    let attendance = rehearsals::update_attendance(
        state.repository.as_ref(),
        user.id(),
        RehearsalId::new(rehearsal_id),
        request.status,
        request.notes,
    )
    .await?;
    Ok(Json(attendance))
}

/// GET /api/rehearsals/suggested-times/{band_id}?startDate=&endDate=&duration=&minAttendees=
///
/// Non-members get 403 before the query string is looked at.
pub async fn suggested_times(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(band_id): Path<i64>,
    Query(query): Query<SuggestedTimesQuery>,
) -> HandlerResult<SuggestedTimesResponse> {
    let repo = state.repository.as_ref();
    let member = services::require_member(repo, BandId::new(band_id), user.id()).await?;
    let params = query.to_params()?;
    let suggestions = services::suggest_times_for(repo, &member, params).await?;
    Ok(Json(suggestions.into()))
}
