use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One backed-up file on a cold-storage disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardDiskBackup {
    pub id: i32,
    pub disk_name: String,
    pub serial_number: String,
    pub file_name: String,
    pub full_path: Option<String>,
    pub size_mb: Option<f64>,
    pub modified: Option<NaiveDateTime>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

/// A parsed upload row, before it is stamped with uploader identity.
#[derive(Debug, Clone, PartialEq)]
pub struct HardDiskInput {
    pub disk_name: String,
    pub serial_number: String,
    pub file_name: String,
    pub full_path: Option<String>,
    pub size_mb: Option<f64>,
    pub modified: NaiveDateTime,
}

/// Filters shared by the list view and the exporter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardDiskFilter {
    /// Case-insensitive substring over disk name, serial and file name
    pub keyword: Option<String>,
    /// Inclusive lower bound on `modified` (whole day)
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on `modified` (whole day)
    pub end: Option<NaiveDate>,
    /// Exact serial number
    pub serial: Option<String>,
}

impl HardDiskFilter {
    /// Lower bound as a timestamp (start of day).
    #[must_use]
    pub fn modified_from(&self) -> Option<NaiveDateTime> {
        self.start.and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Exclusive upper bound as a timestamp (start of the following day).
    #[must_use]
    pub fn modified_before(&self) -> Option<NaiveDateTime> {
        self.end
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// Per-disk rollup shown above the hard-disk list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskSummary {
    pub disk_name: String,
    pub serial_number: String,
    pub total_files: u64,
    pub total_size_mb: f64,
    pub latest_backup: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HardDiskPage {
    pub items: Vec<HardDiskBackup>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}
