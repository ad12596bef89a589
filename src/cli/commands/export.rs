//! Export command handler

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Store;
use crate::models::hard_disk::HardDiskFilter;
use crate::report::ExportFormat;
use crate::services::{HardDiskService, SeaOrmHardDiskService};

fn parse_day(value: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .with_context(|| format!("Invalid --{field} '{v}', expected YYYY-MM-DD"))
        })
        .transpose()
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_export(
    config: &Config,
    format: &str,
    serial: Option<String>,
    keyword: Option<String>,
    start: Option<&str>,
    end: Option<&str>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow!(e))?;
    let filter = HardDiskFilter {
        keyword,
        start: parse_day(start, "start")?,
        end: parse_day(end, "end")?,
        serial,
    };

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let service = SeaOrmHardDiskService::new(store, config.assets.clone());

    let Some(file) = service.export(&filter, format).await? else {
        println!("No data found for export");
        return Ok(());
    };

    let path = output.unwrap_or_else(|| PathBuf::from(&file.filename));
    tokio::fs::write(&path, &file.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "✓ Exported {} records to {} ({})",
        file.row_count,
        path.display(),
        file.content_type()
    );
    Ok(())
}
