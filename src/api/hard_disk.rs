//! Hard-disk backup records: list, CSV upload, and export.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::notice::{self, NoticeLevel};
use super::validation::{clean_text, parse_date, validate_page};
use super::{ApiError, ApiResponse, AppState};
use crate::models::hard_disk::HardDiskFilter;
use crate::report::ExportFormat;
use crate::services::{AssetError, HardDiskListing};

pub const HARD_DISK_PATH: &str = "/assets/hard-disk";
const UPLOAD_FIELD: &str = "file";

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::NotFound { resource, id } => Self::not_found(resource, id),
            AssetError::Validation(msg) => Self::validation(msg),
            AssetError::Ingestion(_) => Self::validation(err.to_string()),
            AssetError::Database(msg) => Self::DatabaseError(msg),
            AssetError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct HardDiskQuery {
    pub q: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub serial: Option<String>,
    pub page: Option<i64>,
}

impl HardDiskQuery {
    fn filter(&self) -> Result<HardDiskFilter, ApiError> {
        Ok(HardDiskFilter {
            keyword: clean_text(self.q.clone()),
            start: parse_date(self.start.as_deref(), "start")?,
            end: parse_date(self.end.as_deref(), "end")?,
            serial: clean_text(self.serial.clone()),
        })
    }
}

/// GET /assets/hard-disk
pub async fn list_hard_disk(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HardDiskQuery>,
) -> Result<Json<ApiResponse<HardDiskListing>>, ApiError> {
    let filter = query.filter()?;
    let page = validate_page(query.page);

    let listing = state.hard_disk_service().list(&filter, page).await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// POST /assets/hard-disk/upload
///
/// Multipart body with a `.csv` file in the `file` field.
pub async fn upload_hard_disk(
    State(state): State<Arc<AppState>>,
    session: Session,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed multipart upload");
                break;
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let is_csv = field
            .file_name()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".csv"));
        if !is_csv {
            break;
        }

        match field.bytes().await {
            Ok(bytes) => upload = Some(bytes),
            Err(e) => tracing::warn!(error = %e, "Failed to read uploaded file"),
        }
        break;
    }

    let Some(bytes) = upload else {
        return notice::redirect_with(
            &session,
            NoticeLevel::Danger,
            "Please upload a valid CSV file",
            HARD_DISK_PATH,
        )
        .await;
    };

    match state
        .hard_disk_service()
        .ingest(&bytes, &user.username)
        .await
    {
        Ok(count) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                format!("Hard disk data uploaded successfully ({count} records)"),
                HARD_DISK_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, HARD_DISK_PATH).await,
    }
}

/// GET /assets/hard-disk/export/{fmt}
pub async fn export_hard_disk(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(fmt): Path<String>,
    Query(query): Query<HardDiskQuery>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = fmt.parse().map_err(ApiError::validation)?;
    let filter = query.filter()?;

    let Some(file) = state.hard_disk_service().export(&filter, format).await? else {
        return notice::redirect_with(
            &session,
            NoticeLevel::Warning,
            "No data found for export",
            HARD_DISK_PATH,
        )
        .await;
    };

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (header::CONTENT_DISPOSITION, file.content_disposition()),
        ],
        file.bytes,
    )
        .into_response())
}
