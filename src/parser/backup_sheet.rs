//! Parser for the hard-disk backup sheet uploaded by operators.
//!
//! Expected header: `DiskName, SerialNumber, FileName, FullPath, SizeMB,
//! Modified`. Extra columns are ignored. Any bad row fails the whole sheet.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::models::hard_disk::HardDiskInput;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "DiskName",
    "SerialNumber",
    "FileName",
    "FullPath",
    "SizeMB",
    "Modified",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("the file contains no data rows")]
    Empty,

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },

    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(rename = "DiskName")]
    disk_name: String,
    #[serde(rename = "SerialNumber")]
    serial_number: String,
    #[serde(rename = "FileName")]
    file_name: String,
    #[serde(rename = "FullPath", default)]
    full_path: Option<String>,
    #[serde(rename = "SizeMB", default)]
    size_mb: Option<f64>,
    #[serde(rename = "Modified")]
    modified: String,
}

/// Keep only the last `len` characters of a serial identifier.
#[must_use]
pub fn truncate_serial(serial: &str, len: usize) -> String {
    let serial = serial.trim();
    let count = serial.chars().count();
    serial.chars().skip(count.saturating_sub(len)).collect()
}

/// Parse a modification timestamp in any of the formats seen in exports.
pub fn parse_modified(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a whole sheet. `serial_len` is the number of trailing serial
/// characters to keep.
pub fn parse_sheet(data: &[u8], serial_len: usize) -> Result<Vec<HardDiskInput>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SheetError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let row: SheetRow = record
            .deserialize(Some(&headers))
            .map_err(|e| SheetError::Row {
                line,
                message: e.to_string(),
            })?;

        rows.push(convert_row(row, serial_len).map_err(|message| SheetError::Row { line, message })?);
    }

    if rows.is_empty() {
        return Err(SheetError::Empty);
    }

    Ok(rows)
}

fn convert_row(row: SheetRow, serial_len: usize) -> Result<HardDiskInput, String> {
    if row.disk_name.is_empty() {
        return Err("DiskName is empty".to_string());
    }

    if row.file_name.is_empty() {
        return Err("FileName is empty".to_string());
    }

    let modified = parse_modified(&row.modified)
        .ok_or_else(|| format!("cannot parse Modified value '{}'", row.modified))?;

    Ok(HardDiskInput {
        disk_name: row.disk_name,
        serial_number: truncate_serial(&row.serial_number, serial_len),
        file_name: row.file_name,
        full_path: row.full_path.filter(|p| !p.is_empty()),
        size_mb: row.size_mb,
        modified,
    })
}
