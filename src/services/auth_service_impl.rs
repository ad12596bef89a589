//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, hash_password_blocking};
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::password_policy::{generate_compliant_password, validate_password};
use async_trait::async_trait;
use tokio::sync::OnceCell;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    /// Hash verified when the username misses, made with the live params.
    decoy_hash: OnceCell<String>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            store,
            security,
            decoy_hash: OnceCell::new(),
        }
    }

    async fn decoy_hash(&self) -> Result<&str, AuthError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                hash_password_blocking(&generate_compliant_password(24), &self.security).await
            })
            .await?;
        Ok(hash.as_str())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let decoy_hash = self.decoy_hash().await?;
        let user = self
            .store
            .authenticate_user(username, password, decoy_hash)
            .await?;

        match user {
            Some(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User logged in");
                Ok(user)
            }
            None => {
                tracing::warn!(username = %username, "Failed login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn resolve_session_user(&self, user_id: i32) -> Result<Option<User>, AuthError> {
        let user = self.store.get_user(user_id).await?;
        Ok(user.filter(|u| u.is_active))
    }

    async fn change_password(
        &self,
        user_id: i32,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        validate_password(new_password)?;

        let password_hash = hash_password_blocking(new_password, &self.security).await?;

        // Hash and flag go out in one statement.
        let updated = self
            .store
            .set_user_password(user_id, password_hash, false)
            .await?;

        if !updated {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id, "Password changed");
        Ok(())
    }
}
