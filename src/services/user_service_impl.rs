//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::db::{Store, hash_password_blocking};
use crate::models::user::{NewUser, User, UserUpdate};
use crate::services::password_policy::{generate_compliant_password, validate_password};
use crate::services::user_service::{CreateUserRequest, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn clean_username(username: &str) -> Result<String, UserError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserError::Validation("Username is required".to_string()));
        }
        if username.chars().count() > 64 {
            return Err(UserError::Validation(
                "Username must be 64 characters or less".to_string(),
            ));
        }
        Ok(username.to_string())
    }

    fn clean_optional(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn get_user(&self, id: i32) -> Result<User, UserError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserError> {
        let username = Self::clean_username(&request.username)?;

        validate_password(&request.password)?;

        if self.store.get_user_by_username(&username).await?.is_some() {
            return Err(UserError::Conflict(username));
        }

        let password_hash = hash_password_blocking(&request.password, &self.security).await?;

        let user = self
            .store
            .create_user(NewUser {
                username,
                full_name: Self::clean_optional(request.full_name),
                role: request.role,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<User, UserError> {
        let current = self.get_user(id).await?;
        let username = Self::clean_username(&update.username)?;

        if username != current.username
            && self.store.get_user_by_username(&username).await?.is_some()
        {
            return Err(UserError::Conflict(username));
        }

        let user = self
            .store
            .update_user(
                id,
                UserUpdate {
                    username,
                    full_name: Self::clean_optional(update.full_name),
                    role: update.role,
                    is_active: update.is_active,
                },
            )
            .await?
            .ok_or(UserError::NotFound(id))?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, acting_user_id: i32, target_id: i32) -> Result<(), UserError> {
        if acting_user_id == target_id {
            return Err(UserError::SelfDelete);
        }

        if !self.store.delete_user(target_id).await? {
            return Err(UserError::NotFound(target_id));
        }

        tracing::info!(user_id = target_id, deleted_by = acting_user_id, "User deleted");
        Ok(())
    }

    async fn reset_password(&self, target_id: i32) -> Result<String, UserError> {
        let user = self.get_user(target_id).await?;

        if user.username == self.security.bootstrap_admin_username {
            return Err(UserError::ReservedAccount);
        }

        let temporary = generate_compliant_password(self.security.temporary_password_length);
        let password_hash = hash_password_blocking(&temporary, &self.security).await?;

        if !self
            .store
            .set_user_password(target_id, password_hash, true)
            .await?
        {
            return Err(UserError::NotFound(target_id));
        }

        tracing::warn!(user_id = target_id, "Password reset by administrator");
        Ok(temporary)
    }
}
