use crate::entities::prelude::*;
use crate::entities::{hard_disk_historical, server_assets};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SERIAL_INDEX: &str = "idx_hard_disk_serial_number";
const MODIFIED_INDEX: &str = "idx_hard_disk_modified";
const SEGMENT_INDEX: &str = "idx_server_assets_segment";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(SERIAL_INDEX)
                    .table(HardDiskHistorical)
                    .col(hard_disk_historical::Column::SerialNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(MODIFIED_INDEX)
                    .table(HardDiskHistorical)
                    .col(hard_disk_historical::Column::Modified)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(SEGMENT_INDEX)
                    .table(ServerAssets)
                    .col(server_assets::Column::Segment)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(SEGMENT_INDEX)
                    .table(ServerAssets)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(MODIFIED_INDEX)
                    .table(HardDiskHistorical)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(SERIAL_INDEX)
                    .table(HardDiskHistorical)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
