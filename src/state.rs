use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, HardDiskService, SeaOrmAuthService, SeaOrmHardDiskService, SeaOrmServerService,
    SeaOrmUserService, ServerService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub hard_disk_service: Arc<dyn HardDiskService>,

    pub server_service: Arc<dyn ServerService>,
}

impl SharedState {
    /// Open the database, apply migrations, and wire the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        let hard_disk_service = Arc::new(SeaOrmHardDiskService::new(
            store.clone(),
            config.assets.clone(),
        )) as Arc<dyn HardDiskService + Send + Sync + 'static>;

        let server_service = Arc::new(SeaOrmServerService::new(store.clone()))
            as Arc<dyn ServerService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            user_service,
            hard_disk_service,
            server_service,
        }
    }
}
