//! Domain service for user administration.

use thiserror::Error;

use crate::db::repositories::user::UsernameTaken;
use crate::models::user::{Role, User, UserUpdate};
use crate::services::password_policy::PolicyViolation;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i32),

    #[error("Username already exists")]
    Conflict(String),

    #[error("You cannot delete your own account")]
    SelfDelete,

    #[error("Cannot reset main admin password")]
    ReservedAccount,

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserError {
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<UsernameTaken>() {
            Ok(UsernameTaken(username)) => Self::Conflict(username),
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// All users, ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    async fn get_user(&self, id: i32) -> Result<User, UserError>;

    /// Creates an account that must change its password at first login.
    ///
    /// # Errors
    ///
    /// Policy violations are reported before duplicate usernames.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserError>;

    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<User, UserError>;

    /// Deletes `target_id` on behalf of `acting_user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::SelfDelete`] when both ids match.
    async fn delete_user(&self, acting_user_id: i32, target_id: i32) -> Result<(), UserError>;

    /// Replaces the password with a random temporary one and forces a
    /// change at next login. Returns the temporary password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::ReservedAccount`] for the bootstrap admin.
    async fn reset_password(&self, target_id: i32) -> Result<String, UserError>;
}
