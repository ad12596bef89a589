//! Import command handler

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::services::{HardDiskService, SeaOrmHardDiskService};

pub async fn cmd_import(config: &Config, file: &Path, uploader: &str) -> anyhow::Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let service = SeaOrmHardDiskService::new(store, config.assets.clone());

    match service.ingest(&data, uploader).await {
        Ok(count) => {
            println!("✓ Imported {} records from {}", count, file.display());
            Ok(())
        }
        Err(e) => {
            println!("✗ {}", e);
            Err(e.into())
        }
    }
}
