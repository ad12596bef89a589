use crate::entities::{hard_disk_historical, prelude::*};
use crate::models::hard_disk::{HardDiskBackup, HardDiskFilter, HardDiskInput, HardDiskPage};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

/// Rows per INSERT statement; keeps well under SQLite's bound-variable limit.
const INSERT_CHUNK_SIZE: usize = 100;

impl From<hard_disk_historical::Model> for HardDiskBackup {
    fn from(model: hard_disk_historical::Model) -> Self {
        Self {
            id: model.id,
            disk_name: model.disk_name,
            serial_number: model.serial_number,
            file_name: model.file_name,
            full_path: model.full_path,
            size_mb: model.size_mb,
            modified: model.modified,
            uploaded_by: model.uploaded_by,
            uploaded_at: model.uploaded_at,
        }
    }
}

pub struct HardDiskRepository {
    conn: DatabaseConnection,
}

impl HardDiskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn filtered(filter: &HardDiskFilter) -> Select<HardDiskHistorical> {
        let mut query = HardDiskHistorical::find();

        if let Some(keyword) = &filter.keyword {
            query = query.filter(
                Condition::any()
                    .add(hard_disk_historical::Column::DiskName.contains(keyword))
                    .add(hard_disk_historical::Column::SerialNumber.contains(keyword))
                    .add(hard_disk_historical::Column::FileName.contains(keyword)),
            );
        }

        if let Some(serial) = &filter.serial {
            query = query.filter(hard_disk_historical::Column::SerialNumber.eq(serial.as_str()));
        }

        if let Some(from) = filter.modified_from() {
            query = query.filter(hard_disk_historical::Column::Modified.gte(from));
        }

        if let Some(before) = filter.modified_before() {
            query = query.filter(hard_disk_historical::Column::Modified.lt(before));
        }

        query
    }

    /// Insert a whole upload. Either every row lands or none do.
    pub async fn insert_batch(
        &self,
        rows: Vec<HardDiskInput>,
        uploaded_by: &str,
        uploaded_at: NaiveDateTime,
    ) -> Result<usize> {
        let total = rows.len();
        if total == 0 {
            return Ok(0);
        }

        let models: Vec<hard_disk_historical::ActiveModel> = rows
            .into_iter()
            .map(|row| hard_disk_historical::ActiveModel {
                disk_name: Set(row.disk_name),
                serial_number: Set(row.serial_number),
                file_name: Set(row.file_name),
                full_path: Set(row.full_path),
                size_mb: Set(row.size_mb),
                modified: Set(Some(row.modified)),
                uploaded_by: Set(Some(uploaded_by.to_string())),
                uploaded_at: Set(uploaded_at),
                ..Default::default()
            })
            .collect();

        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open ingestion transaction")?;

        for chunk in models.chunks(INSERT_CHUNK_SIZE) {
            HardDiskHistorical::insert_many(chunk.to_vec())
                .exec_without_returning(&txn)
                .await
                .context("Failed to insert hard disk rows")?;
        }

        txn.commit()
            .await
            .context("Failed to commit ingestion transaction")?;

        Ok(total)
    }

    /// One page of the list view, ordered by id.
    pub async fn page(
        &self,
        filter: &HardDiskFilter,
        page: u64,
        per_page: u64,
    ) -> Result<HardDiskPage> {
        let page = page.max(1);
        let paginator = Self::filtered(filter)
            .order_by_asc(hard_disk_historical::Column::Id)
            .paginate(&self.conn, per_page);

        let total_items = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(HardDiskPage {
            items: items.into_iter().map(HardDiskBackup::from).collect(),
            page,
            per_page,
            total_items,
            total_pages,
        })
    }

    /// Every matching record, ordered by id.
    pub async fn list(&self, filter: &HardDiskFilter) -> Result<Vec<HardDiskBackup>> {
        let items = Self::filtered(filter)
            .order_by_asc(hard_disk_historical::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(items.into_iter().map(HardDiskBackup::from).collect())
    }

    /// Every matching record, newest modification first.
    pub async fn list_for_export(&self, filter: &HardDiskFilter) -> Result<Vec<HardDiskBackup>> {
        let items = Self::filtered(filter)
            .order_by_desc(hard_disk_historical::Column::Modified)
            .order_by_asc(hard_disk_historical::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(items.into_iter().map(HardDiskBackup::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(HardDiskHistorical::find().count(&self.conn).await?)
    }
}
