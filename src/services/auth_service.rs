//! Domain service for authentication.
//!
//! Handles login, per-request session resolution, and the self-service
//! password change that clears a forced reset.

use thiserror::Error;

use crate::models::user::User;
use crate::services::password_policy::PolicyViolation;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, inactive user and wrong password all map here.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the message can be shown to the user as-is.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials by exact username.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for every kind of failed
    /// login, so callers cannot tell an unknown user from a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Loads the user a session points at. Inactive or deleted users
    /// resolve to `None`.
    async fn resolve_session_user(&self, user_id: i32) -> Result<Option<User>, AuthError>;

    /// Sets a new password for `user_id` and clears the forced-reset flag.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PasswordMismatch`] when the confirmation differs
    /// and [`AuthError::Policy`] when the password is too weak. Nothing is
    /// written in either case.
    async fn change_password(
        &self,
        user_id: i32,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError>;
}
