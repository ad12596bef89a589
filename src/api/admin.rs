//! User administration endpoints (admin only).

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::notice::{self, NoticeLevel};
use super::validation::{validate_id, validate_role};
use super::{ApiError, ApiResponse, AppState};
use crate::models::user::{Role, User, UserUpdate};
use crate::services::{CreateUserRequest, UserError};

const USERS_PATH: &str = "/admin/users";

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::Conflict(_) => Self::Conflict(err.to_string()),
            UserError::SelfDelete
            | UserError::ReservedAccount
            | UserError::Policy(_)
            | UserError::Validation(_) => Self::validation(err.to_string()),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// Fields left out of the form keep their current value, except `active`,
/// which behaves like a checkbox.
#[derive(Deserialize)]
pub struct EditUserForm {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub active: Option<String>,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.user_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /admin/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = validate_id(id)?;
    let user = state.user_service().get_user(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /admin/users/create
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, ApiError> {
    let role = match form.role.as_deref() {
        Some(raw) if !raw.trim().is_empty() => match validate_role(raw) {
            Ok(role) => role,
            Err(msg) => {
                return notice::redirect_with(&session, NoticeLevel::Danger, msg, USERS_PATH).await;
            }
        },
        _ => Role::default(),
    };

    let request = CreateUserRequest {
        username: form.username,
        password: form.password,
        full_name: form.full_name,
        role,
    };

    match state.user_service().create_user(request).await {
        Ok(_) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                "User created successfully. User must change password at first login.",
                USERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, USERS_PATH).await,
    }
}

/// POST /admin/users/{id}/edit
pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<EditUserForm>,
) -> Result<Response, ApiError> {
    let current = match state.user_service().get_user(id).await {
        Ok(user) => user,
        Err(e) => return notice::redirect_on_error(&session, e, USERS_PATH).await,
    };

    let role = match form.role.as_deref() {
        Some(raw) => match validate_role(raw) {
            Ok(role) => role,
            Err(msg) => {
                return notice::redirect_with(&session, NoticeLevel::Danger, msg, USERS_PATH).await;
            }
        },
        None => current.role,
    };

    let update = UserUpdate {
        username: form.username.unwrap_or(current.username),
        full_name: form.full_name.or(current.full_name),
        role,
        is_active: form.active.as_deref() == Some("1"),
    };

    match state.user_service().update_user(id, update).await {
        Ok(_) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                "User updated successfully",
                USERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, USERS_PATH).await,
    }
}

/// POST /admin/users/{id}/delete
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    CurrentUser(acting): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.user_service().delete_user(acting.id, id).await {
        Ok(()) => {
            notice::redirect_with(&session, NoticeLevel::Success, "User deleted", USERS_PATH).await
        }
        Err(e) => notice::redirect_on_error(&session, e, USERS_PATH).await,
    }
}

/// POST /admin/users/{id}/reset-password
///
/// The temporary password is shown once, in the notice.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.user_service().reset_password(id).await {
        Ok(temporary) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Warning,
                format!("Password reset to: {temporary}"),
                USERS_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, USERS_PATH).await,
    }
}
