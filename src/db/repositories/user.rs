use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, sea_query::Expr,
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::user::{NewUser, User, UserUpdate};

/// Another account already holds the username (unique index hit).
#[derive(Debug, Error)]
#[error("username '{0}' is already taken")]
pub struct UsernameTaken(pub String);

fn unique_violation(err: DbErr, username: &str, context: &'static str) -> anyhow::Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        UsernameTaken(username.to_string()).into()
    } else {
        anyhow::Error::new(err).context(context)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            // Unknown roles collapse to the least-privileged one.
            role: model.role.parse().unwrap_or_default(),
            is_active: model.is_active,
            must_change_password: model.must_change_password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Look up an active user by exact username and check the password.
    ///
    /// Returns `None` for an unknown user, an inactive user, or a wrong
    /// password alike. Unknown and inactive users are checked against
    /// `decoy_hash` instead, so every attempt pays for one Argon2 verify.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        decoy_hash: &str,
    ) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?
            .filter(|u| u.is_active);

        let password_hash = user
            .as_ref()
            .map_or_else(|| decoy_hash.to_string(), |u| u.password_hash.clone());
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .context("Password verification task panicked")??;

        Ok(user.filter(|_| is_valid).map(User::from))
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();
        let username = new_user.username.clone();

        let active = users::ActiveModel {
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            full_name: Set(new_user.full_name),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            must_change_password: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .map_err(|e| unique_violation(e, &username, "Failed to insert user"))?;

        Ok(User::from(model))
    }

    pub async fn update_profile(&self, id: i32, update: UserUpdate) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        let username = update.username.clone();
        let mut active: users::ActiveModel = user.into();
        active.username = Set(update.username);
        active.full_name = Set(update.full_name);
        active.role = Set(update.role.as_str().to_string());
        active.is_active = Set(update.is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active
            .update(&self.conn)
            .await
            .map_err(|e| unique_violation(e, &username, "Failed to update user"))?;

        Ok(Some(User::from(model)))
    }

    /// Replace the password hash and the forced-change flag together.
    ///
    /// Both columns go out in one UPDATE statement, so either both change or
    /// neither does. Returns `false` when no such user exists.
    pub async fn set_password(
        &self,
        id: i32,
        password_hash: String,
        must_change_password: bool,
    ) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(
                users::Column::MustChangePassword,
                Expr::value(must_change_password),
            )
            .col_expr(
                users::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update password")?;

        Ok(result.rows_affected == 1)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with the configured params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a PHC hash string. Params are read from the
/// hash itself, so hashes made with older settings keep verifying.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Passw0rd!", &fast_config()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "Passw0rd!").unwrap());
        assert!(!verify_password(&hash, "Passw0rd?").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Passw0rd!", &fast_config()).unwrap();
        let b = hash_password("Passw0rd!", &fast_config()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("not-a-hash", "whatever").is_err());
    }
}
