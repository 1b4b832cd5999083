//! Caller identity extracted from a trusted proxy header.
//!
//! Session handling lives in front of this service; requests arrive with the
//! authenticated user's numeric id in the configured header (`x-user-id` by
//! default).

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, trace};

use super::error::AppError;
use super::state::AppState;
use crate::db::repository::UserRepository;
use crate::models::{User, UserId};

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let raw = parts
            .headers
            .get(&state.user_header)
            .ok_or_else(|| {
                AppError::Unauthorized(format!("missing {} header", state.user_header))
            })?
            .to_str()
            .map_err(|_| AppError::Unauthorized(format!("malformed {} header", state.user_header)))?;

        let user_id: UserId = raw.parse().map_err(|_| {
            debug!(header = %state.user_header, value = raw, "unparseable user id");
            AppError::Unauthorized(format!("malformed {} header", state.user_header))
        })?;

        let user = state
            .repository
            .find_user(user_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::Unauthorized(format!("unknown user {}", user_id)))?;

        trace!(user_id = %user.id, "authenticated request");
        Ok(CurrentUser(user))
    }
}
