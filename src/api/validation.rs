use chrono::NaiveDate;

use super::ApiError;
use crate::models::user::Role;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_role(role: &str) -> Result<Role, String> {
    role.parse::<Role>()
}

/// Pages are 1-based; anything below 1 is page 1.
pub fn validate_page(page: Option<i64>) -> u64 {
    page.and_then(|p| u64::try_from(p).ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Parse an optional `YYYY-MM-DD` query value. Blank means absent.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            ApiError::validation(format!(
                "Invalid {}: '{}'. Expected YYYY-MM-DD",
                field, value
            ))
        })
}

/// Trimmed query text; blank means absent.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
