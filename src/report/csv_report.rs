use anyhow::{Context, Result};

use super::ReportTable;

pub fn render(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&table.headers)
        .context("Failed to write CSV header")?;

    for row in &table.rows {
        writer
            .write_record(row.iter().map(super::Cell::display))
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))
}
