//! `SeaORM` implementations of the asset services.

use async_trait::async_trait;
use chrono::Utc;

use crate::config::AssetsConfig;
use crate::db::Store;
use crate::models::hard_disk::HardDiskFilter;
use crate::models::server::{ServerAsset, ServerFilter, ServerForm};
use crate::parser::backup_sheet::parse_sheet;
use crate::report::{
    self, ExportFile, ExportFormat, group_servers, server_counters, summarize_disks,
};
use crate::services::asset_service::{
    AssetError, HardDiskListing, HardDiskService, ServerInventory, ServerService,
};

pub struct SeaOrmHardDiskService {
    store: Store,
    config: AssetsConfig,
}

impl SeaOrmHardDiskService {
    #[must_use]
    pub const fn new(store: Store, config: AssetsConfig) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl HardDiskService for SeaOrmHardDiskService {
    async fn ingest(&self, data: &[u8], uploaded_by: &str) -> Result<usize, AssetError> {
        if data.len() > self.config.max_upload_bytes {
            return Err(AssetError::Validation(format!(
                "Upload exceeds the {} byte limit",
                self.config.max_upload_bytes
            )));
        }

        let rows = parse_sheet(data, self.config.serial_suffix_len)?;
        let count = self
            .store
            .insert_hard_disk_batch(rows, uploaded_by, Utc::now().naive_utc())
            .await?;

        tracing::info!(rows = count, uploaded_by, "Hard disk sheet ingested");
        metrics::counter!("hard_disk_rows_ingested_total").increment(count as u64);
        Ok(count)
    }

    async fn list(&self, filter: &HardDiskFilter, page: u64) -> Result<HardDiskListing, AssetError> {
        let page = self
            .store
            .hard_disk_page(filter, page.max(1), self.config.page_size)
            .await?;
        let matching = self.store.list_hard_disk(filter).await?;

        Ok(HardDiskListing {
            page,
            summary: summarize_disks(&matching),
        })
    }

    async fn export(
        &self,
        filter: &HardDiskFilter,
        format: ExportFormat,
    ) -> Result<Option<ExportFile>, AssetError> {
        let records = self.store.list_hard_disk_for_export(filter).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let serial = filter.serial.clone();
        let file = tokio::task::spawn_blocking(move || {
            report::export_hard_disk(&records, format, serial.as_deref())
        })
        .await
        .map_err(|e| AssetError::Internal(format!("Export task panicked: {e}")))??;

        if let Some(file) = &file {
            tracing::info!(format = %format, rows = file.row_count, "Hard disk export rendered");
            metrics::counter!("hard_disk_exports_total", "format" => format.extension())
                .increment(1);
        }

        Ok(file)
    }
}

pub struct SeaOrmServerService {
    store: Store,
}

impl SeaOrmServerService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ServerService for SeaOrmServerService {
    async fn inventory(&self, filter: &ServerFilter) -> Result<ServerInventory, AssetError> {
        let servers = self.store.list_servers(filter).await?;

        Ok(ServerInventory {
            counters: server_counters(&servers),
            groups: group_servers(&servers),
        })
    }

    async fn get_server(&self, id: i32) -> Result<ServerAsset, AssetError> {
        self.store
            .get_server(id)
            .await?
            .ok_or(AssetError::server_not_found(id))
    }

    async fn create_server(
        &self,
        form: ServerForm,
        created_by: &str,
    ) -> Result<ServerAsset, AssetError> {
        let input = form.validate().map_err(AssetError::Validation)?;
        let server = self.store.create_server(input, created_by).await?;

        tracing::info!(server_id = server.id, hostname = %server.hostname, created_by, "Server created");
        Ok(server)
    }

    async fn update_server(&self, id: i32, form: ServerForm) -> Result<ServerAsset, AssetError> {
        let input = form.validate().map_err(AssetError::Validation)?;

        let server = self
            .store
            .update_server(id, input)
            .await?
            .ok_or(AssetError::server_not_found(id))?;

        tracing::info!(server_id = id, "Server updated");
        Ok(server)
    }

    async fn delete_server(&self, id: i32) -> Result<(), AssetError> {
        if !self.store.delete_server(id).await? {
            return Err(AssetError::server_not_found(id));
        }

        tracing::info!(server_id = id, "Server deleted");
        Ok(())
    }
}
