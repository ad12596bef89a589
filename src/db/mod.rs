use crate::config::SecurityConfig;
use crate::models::hard_disk::{HardDiskBackup, HardDiskFilter, HardDiskInput, HardDiskPage};
use crate::models::server::{ServerAsset, ServerFilter, ServerInput};
use crate::models::user::{NewUser, Role, User, UserUpdate};
use anyhow::Result;
use chrono::NaiveDateTime;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, verify_password};

/// Argon2 hashing on the blocking pool.
pub async fn hash_password_blocking(password: &str, security: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = security.clone();
    tokio::task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task panicked: {e}"))?
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn hard_disk_repo(&self) -> repositories::hard_disk::HardDiskRepository {
        repositories::hard_disk::HardDiskRepository::new(self.conn.clone())
    }

    fn server_repo(&self) -> repositories::server::ServerRepository {
        repositories::server::ServerRepository::new(self.conn.clone())
    }

    /// Create the root admin account when the users table is empty.
    ///
    /// The account starts with a forced password change. Returns `true` when
    /// an account was created.
    pub async fn ensure_bootstrap_admin(&self, security: &SecurityConfig) -> Result<bool> {
        let repo = self.user_repo();
        if repo.count().await? > 0 {
            return Ok(false);
        }

        let password_hash =
            hash_password_blocking(&security.bootstrap_admin_password, security).await?;

        repo.create(NewUser {
            username: security.bootstrap_admin_username.clone(),
            full_name: Some("Administrator".to_string()),
            role: Role::Admin,
            password_hash,
        })
        .await?;

        warn!(
            username = %security.bootstrap_admin_username,
            "Created bootstrap admin account; password change required at first login"
        );
        Ok(true)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
        decoy_hash: &str,
    ) -> Result<Option<User>> {
        self.user_repo()
            .authenticate(username, password, decoy_hash)
            .await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn update_user(&self, id: i32, update: UserUpdate) -> Result<Option<User>> {
        self.user_repo().update_profile(id, update).await
    }

    pub async fn set_user_password(
        &self,
        id: i32,
        password_hash: String,
        must_change_password: bool,
    ) -> Result<bool> {
        self.user_repo()
            .set_password(id, password_hash, must_change_password)
            .await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn insert_hard_disk_batch(
        &self,
        rows: Vec<HardDiskInput>,
        uploaded_by: &str,
        uploaded_at: NaiveDateTime,
    ) -> Result<usize> {
        self.hard_disk_repo()
            .insert_batch(rows, uploaded_by, uploaded_at)
            .await
    }

    pub async fn hard_disk_page(
        &self,
        filter: &HardDiskFilter,
        page: u64,
        per_page: u64,
    ) -> Result<HardDiskPage> {
        self.hard_disk_repo().page(filter, page, per_page).await
    }

    pub async fn list_hard_disk(&self, filter: &HardDiskFilter) -> Result<Vec<HardDiskBackup>> {
        self.hard_disk_repo().list(filter).await
    }

    pub async fn list_hard_disk_for_export(
        &self,
        filter: &HardDiskFilter,
    ) -> Result<Vec<HardDiskBackup>> {
        self.hard_disk_repo().list_for_export(filter).await
    }

    pub async fn hard_disk_count(&self) -> Result<u64> {
        self.hard_disk_repo().count().await
    }

    pub async fn list_servers(&self, filter: &ServerFilter) -> Result<Vec<ServerAsset>> {
        self.server_repo().list(filter).await
    }

    pub async fn get_server(&self, id: i32) -> Result<Option<ServerAsset>> {
        self.server_repo().get(id).await
    }

    pub async fn create_server(&self, input: ServerInput, created_by: &str) -> Result<ServerAsset> {
        self.server_repo().create(input, created_by).await
    }

    pub async fn update_server(&self, id: i32, input: ServerInput) -> Result<Option<ServerAsset>> {
        self.server_repo().update(id, input).await
    }

    pub async fn delete_server(&self, id: i32) -> Result<bool> {
        self.server_repo().delete(id).await
    }
}
