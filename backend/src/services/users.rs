//! User registration and lookup.

use crate::db::repository::{FullRepository, UserRepository};
use crate::models::{NewUser, User, UserId};

use super::error::{ServiceError, ServiceResult};

/// Register a new user.
///
/// Names must be non-blank and the email must contain `@`; a duplicate email
/// (case-insensitive) is a `Conflict`.
pub async fn register_user(repo: &dyn FullRepository, user: NewUser) -> ServiceResult<User> {
    if user.first_name.trim().is_empty() || user.last_name.trim().is_empty() {
        return Err(ServiceError::validation("first and last name are required"));
    }
    let email = user.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::validation(format!(
            "'{}' is not a valid email address",
            user.email
        )));
    }

    let created = repo.create_user(&user).await?;
    log::info!("registered user {}", created.id);
    Ok(created)
}

pub async fn get_user(repo: &dyn FullRepository, user_id: UserId) -> ServiceResult<User> {
    Ok(repo.get_user(user_id).await?)
}
