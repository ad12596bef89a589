//! Server inventory endpoints.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::notice::{self, NoticeLevel};
use super::validation::{clean_text, validate_id};
use super::{ApiError, ApiResponse, AppState};
use crate::models::server::{Environment, ServerAsset, ServerFilter, ServerForm};
use crate::services::ServerInventory;

const SERVERS_PATH: &str = "/assets/servers";

#[derive(Debug, Deserialize, Default)]
pub struct ServerQuery {
    pub segment: Option<String>,
    pub env: Option<String>,
    pub q: Option<String>,
}

/// GET /assets/servers
///
/// Servers grouped by segment with capacity totals and dashboard counters.
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServerQuery>,
) -> Result<Json<ApiResponse<ServerInventory>>, ApiError> {
    let environment = clean_text(query.env)
        .map(|raw| raw.parse::<Environment>())
        .transpose()
        .map_err(ApiError::validation)?;

    let filter = ServerFilter {
        segment: clean_text(query.segment).map(|s| s.to_uppercase()),
        environment: environment.map(|e| e.as_str().to_string()),
        keyword: clean_text(query.q),
    };

    let inventory = state.server_service().inventory(&filter).await?;
    Ok(Json(ApiResponse::success(inventory)))
}

/// GET /assets/servers/{id}
pub async fn get_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ServerAsset>>, ApiError> {
    let id = validate_id(id)?;
    let server = state.server_service().get_server(id).await?;
    Ok(Json(ApiResponse::success(server)))
}

/// POST /assets/servers/create
pub async fn create_server(
    State(state): State<Arc<AppState>>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ServerForm>,
) -> Result<Response, ApiError> {
    match state
        .server_service()
        .create_server(form, &user.username)
        .await
    {
        Ok(_) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                "Server registered successfully",
                SERVERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, SERVERS_PATH).await,
    }
}

/// POST /assets/servers/{id}/edit
pub async fn edit_server(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ServerForm>,
) -> Result<Response, ApiError> {
    match state.server_service().update_server(id, form).await {
        Ok(_) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                "Server updated successfully",
                SERVERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, SERVERS_PATH).await,
    }
}

/// POST /assets/servers/{id}/delete
pub async fn delete_server(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.server_service().delete_server(id).await {
        Ok(()) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Warning,
                "Server deleted successfully",
                SERVERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, SERVERS_PATH).await,
    }
}
