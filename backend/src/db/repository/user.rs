use async_trait::async_trait;

use super::RepositoryResult;
use crate::models::{NewUser, User, UserId};

/// User storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and assign its ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If the email (case-insensitive) is taken
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;

    /// Retrieve a user by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the user doesn't exist
    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User>;

    /// Like [`UserRepository::get_user`] but `Ok(None)` when missing.
    async fn find_user(&self, user_id: UserId) -> RepositoryResult<Option<User>>;
}
