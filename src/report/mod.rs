//! Tabular report exporter.
//!
//! Turns an already filtered and ordered set of backup records into a CSV
//! file, an xlsx workbook, or a PDF document. An empty record set never
//! produces a file.

mod csv_report;
mod pdf_report;
pub mod rollup;
mod xlsx_report;

use anyhow::Result;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::models::hard_disk::HardDiskBackup;

pub use rollup::{
    SegmentTotals, ServerCounters, ServerGroup, group_servers, server_counters, summarize_disks,
};

/// Column headers of the hard-disk export, in entity declaration order.
pub const HARD_DISK_COLUMNS: [&str; 8] = [
    "disk_name",
    "serial_number",
    "file_name",
    "full_path",
    "size_mb",
    "modified",
    "uploaded_by",
    "uploaded_at",
];

/// Index of the numeric size column (right-aligned in documents).
pub const SIZE_COLUMN: usize = 4;

pub const SHEET_NAME: &str = "HardDisk";

pub const REPORT_TITLE: &str = "Hard Disk Cold Storage Report";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!(
                "Unsupported export format '{other}'. Use csv, xlsx or pdf"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, Cell::text)
    }

    fn timestamp(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Cell::Empty, |ts| Cell::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
    }

    /// Plain-text rendering used by CSV and PDF output.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    #[must_use]
    pub fn hard_disk(records: &[HardDiskBackup]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    Cell::text(r.disk_name.as_str()),
                    Cell::text(r.serial_number.as_str()),
                    Cell::text(r.file_name.as_str()),
                    Cell::optional_text(r.full_path.as_deref()),
                    r.size_mb.map_or(Cell::Empty, Cell::Number),
                    Cell::timestamp(r.modified),
                    Cell::optional_text(r.uploaded_by.as_deref()),
                    Cell::timestamp(Some(r.uploaded_at)),
                ]
            })
            .collect();

        Self {
            headers: HARD_DISK_COLUMNS.to_vec(),
            rows,
        }
    }
}

/// A rendered export, ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

impl ExportFile {
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}

/// Filename suggested for a hard-disk export.
#[must_use]
pub fn export_filename(format: ExportFormat, serial: Option<&str>) -> String {
    match format {
        ExportFormat::Pdf => "hard_disk_backup.pdf".to_string(),
        _ => {
            let tag: String = serial
                .map(|s| {
                    s.chars()
                        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                        .collect()
                })
                .filter(|s: &String| !s.is_empty())
                .unwrap_or_else(|| "all".to_string());
            format!("hard_disk_{tag}.{}", format.extension())
        }
    }
}

/// Render the records in the requested format. Returns `None` when there
/// is nothing to export.
pub fn export_hard_disk(
    records: &[HardDiskBackup],
    format: ExportFormat,
    serial: Option<&str>,
) -> Result<Option<ExportFile>> {
    if records.is_empty() {
        return Ok(None);
    }

    let table = ReportTable::hard_disk(records);
    let bytes = match format {
        ExportFormat::Csv => csv_report::render(&table)?,
        ExportFormat::Xlsx => xlsx_report::render(&table)?,
        ExportFormat::Pdf => pdf_report::render(&table, REPORT_TITLE)?,
    };

    Ok(Some(ExportFile {
        format,
        filename: export_filename(format, serial),
        bytes,
        row_count: table.rows.len(),
    }))
}
