use axum::{
    Form, Json,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::notice::{self, NoticeLevel};
use super::{ApiError, ApiResponse, AppState, ChangePasswordPage, MessageResponse};
use crate::models::user::User;
use crate::services::AuthError;

pub const USER_ID_KEY: &str = "user_id";
pub const LOGIN_PATH: &str = "/login";
pub const CHANGE_PASSWORD_PATH: &str = "/change-password";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Paths a user with a pending forced reset may still reach.
const FORCED_RESET_EXEMPT: [&str; 2] = [CHANGE_PASSWORD_PATH, "/logout"];

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::PasswordMismatch | AuthError::Policy(_) => Self::validation(err.to_string()),
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Request-scoped identity
// ============================================================================

/// The user behind the current request, placed in the request extensions
/// by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication gate for every protected route.
///
/// Resolves the session's user id against the store on each request.
/// Sessions pointing at a missing or inactive user are flushed and sent to
/// the login page. Users with a pending forced reset only reach the
/// change-password and logout paths.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user_id) = session.get::<i32>(USER_ID_KEY).await? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let Some(user) = state.auth_service().resolve_session_user(user_id).await? else {
        tracing::info!(user_id, "Discarding session of missing or inactive user");
        session.flush().await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    tracing::Span::current().record("user_id", user.id);

    if user.must_change_password && !FORCED_RESET_EXEMPT.contains(&request.uri().path()) {
        return Ok(Redirect::to(CHANGE_PASSWORD_PATH).into_response());
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default, alias = "new_password")]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// GET /login
pub async fn login_page() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse {
        message: "Please log in".to_string(),
    }))
}

/// POST /login
///
/// Failed logins all answer the same 401 body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = match state
        .auth_service()
        .login(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);

    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;

    let target = if user.must_change_password {
        CHANGE_PASSWORD_PATH
    } else {
        DASHBOARD_PATH
    };
    Ok(Redirect::to(target).into_response())
}

/// POST /logout
pub async fn logout(session: Session) -> Result<Response, ApiError> {
    session.flush().await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// GET /change-password
pub async fn change_password_page(
    CurrentUser(user): CurrentUser,
) -> Json<ApiResponse<ChangePasswordPage>> {
    Json(ApiResponse::success(ChangePasswordPage {
        username: user.username,
        must_change_password: user.must_change_password,
    }))
}

/// POST /change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, ApiError> {
    match state
        .auth_service()
        .change_password(user.id, &form.password, &form.confirm_password)
        .await
    {
        Ok(()) => {
            notice::redirect_with(
                &session,
                NoticeLevel::Success,
                "Password updated successfully",
                DASHBOARD_PATH,
            )
            .await
        }
        Err(e) => notice::redirect_on_error(&session, e, CHANGE_PASSWORD_PATH).await,
    }
}
