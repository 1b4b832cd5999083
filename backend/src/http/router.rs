//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! timeout, body limit), and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Users
        .route("/users", post(handlers::register_user))
        .route("/users/me", get(handlers::current_user))
        // Bands and membership
        .route("/bands", post(handlers::create_band).get(handlers::list_bands))
        .route(
            "/bands/{band_id}/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route(
            "/bands/{band_id}/members/{user_id}/status",
            put(handlers::set_member_status),
        )
        // Availability polls
        .route(
            "/bands/{band_id}/polls",
            post(handlers::create_poll).get(handlers::list_polls),
        )
        .route("/polls/{poll_id}", get(handlers::get_poll))
        .route(
            "/polls/{poll_id}/options/{option_id}/response",
            put(handlers::respond_to_poll),
        )
        .route("/polls/{poll_id}/close", post(handlers::close_poll))
        // Rehearsals
        .route("/rehearsals", post(handlers::create_rehearsal))
        .route(
            "/rehearsals/band/{band_id}",
            get(handlers::list_band_rehearsals),
        )
        .route(
            "/rehearsals/suggested-times/{band_id}",
            get(handlers::suggested_times),
        )
        .route(
            "/rehearsals/{rehearsal_id}",
            get(handlers::get_rehearsal)
                .put(handlers::update_rehearsal)
                .delete(handlers::delete_rehearsal),
        )
        .route(
            "/rehearsals/{rehearsal_id}/attendance",
            put(handlers::update_attendance),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(TimeoutLayer::new(state.request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
