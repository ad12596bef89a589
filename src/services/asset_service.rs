//! Domain services for the asset inventory: hard-disk backup records and
//! server assets.

use serde::Serialize;
use thiserror::Error;

use crate::models::hard_disk::{DiskSummary, HardDiskFilter, HardDiskPage};
use crate::models::server::{ServerAsset, ServerFilter, ServerForm};
use crate::parser::backup_sheet::SheetError;
use crate::report::{ExportFile, ExportFormat, ServerCounters, ServerGroup};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    #[error("{0}")]
    Validation(String),

    #[error("CSV processing failed: {0}")]
    Ingestion(#[from] SheetError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssetError {
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    pub(crate) const fn server_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "Server",
            id,
        }
    }
}

impl From<sea_orm::DbErr> for AssetError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AssetError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// One page of records plus the per-disk rollup of the whole filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct HardDiskListing {
    #[serde(flatten)]
    pub page: HardDiskPage,
    pub summary: Vec<DiskSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInventory {
    pub counters: ServerCounters,
    pub groups: Vec<ServerGroup>,
}

#[async_trait::async_trait]
pub trait HardDiskService: Send + Sync {
    /// Parses and stores an uploaded backup sheet. All rows or none.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Ingestion`] when any row is malformed.
    async fn ingest(&self, data: &[u8], uploaded_by: &str) -> Result<usize, AssetError>;

    async fn list(&self, filter: &HardDiskFilter, page: u64) -> Result<HardDiskListing, AssetError>;

    /// Renders the filtered records, newest first. `None` when nothing
    /// matches.
    async fn export(
        &self,
        filter: &HardDiskFilter,
        format: ExportFormat,
    ) -> Result<Option<ExportFile>, AssetError>;
}

#[async_trait::async_trait]
pub trait ServerService: Send + Sync {
    async fn inventory(&self, filter: &ServerFilter) -> Result<ServerInventory, AssetError>;

    async fn get_server(&self, id: i32) -> Result<ServerAsset, AssetError>;

    async fn create_server(
        &self,
        form: ServerForm,
        created_by: &str,
    ) -> Result<ServerAsset, AssetError>;

    async fn update_server(&self, id: i32, form: ServerForm) -> Result<ServerAsset, AssetError>;

    async fn delete_server(&self, id: i32) -> Result<(), AssetError>;
}
