use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, DashboardResponse};
use crate::models::server::ServerFilter;

/// GET / and GET /dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let inventory = state
        .server_service()
        .inventory(&ServerFilter::default())
        .await?;
    let hard_disk_records = state.store().hard_disk_count().await?;

    Ok(Json(ApiResponse::success(DashboardResponse {
        user,
        servers: inventory.counters,
        hard_disk_records,
    })))
}
