//! One-shot notices carried across a redirect in the session.
//!
//! Form handlers push a notice and answer `303 See Other`; the next page
//! load drains them through `GET /notices`.

use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tower_sessions::Session;

use super::{ApiError, ApiResponse};
use crate::services::{AssetError, AuthError, UserError};

const NOTICES_KEY: &str = "notices";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub async fn push(
    session: &Session,
    level: NoticeLevel,
    message: impl Into<String>,
) -> Result<(), ApiError> {
    let mut notices: Vec<Notice> = session.get(NOTICES_KEY).await?.unwrap_or_default();
    notices.push(Notice {
        level,
        message: message.into(),
    });
    session.insert(NOTICES_KEY, notices).await?;
    Ok(())
}

/// Remove and return every pending notice.
pub async fn take(session: &Session) -> Result<Vec<Notice>, ApiError> {
    Ok(session
        .remove::<Vec<Notice>>(NOTICES_KEY)
        .await?
        .unwrap_or_default())
}

/// Queue a notice and redirect.
pub async fn redirect_with(
    session: &Session,
    level: NoticeLevel,
    message: impl Into<String>,
    to: &str,
) -> Result<Response, ApiError> {
    push(session, level, message).await?;
    Ok(Redirect::to(to).into_response())
}

/// Service errors that may be shown to the user verbatim.
pub trait UserFacing: fmt::Display {
    fn is_user_facing(&self) -> bool;
}

impl UserFacing for AuthError {
    fn is_user_facing(&self) -> bool {
        AuthError::is_user_facing(self)
    }
}

impl UserFacing for UserError {
    fn is_user_facing(&self) -> bool {
        UserError::is_user_facing(self)
    }
}

impl UserFacing for AssetError {
    fn is_user_facing(&self) -> bool {
        AssetError::is_user_facing(self)
    }
}

/// Turn a business error into a danger notice and a redirect. Anything
/// else becomes a masked error response.
pub async fn redirect_on_error<E>(session: &Session, err: E, to: &str) -> Result<Response, ApiError>
where
    E: UserFacing + Into<ApiError>,
{
    if err.is_user_facing() {
        redirect_with(session, NoticeLevel::Danger, err.to_string(), to).await
    } else {
        Err(err.into())
    }
}

/// GET /notices
pub async fn get_notices(session: Session) -> Result<Json<ApiResponse<Vec<Notice>>>, ApiError> {
    Ok(Json(ApiResponse::success(take(&session).await?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_notices_drain_once() {
        let session = session();
        push(&session, NoticeLevel::Success, "saved").await.unwrap();
        push(&session, NoticeLevel::Warning, "careful").await.unwrap();

        let notices = take(&session).await.unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].message, "careful");

        assert!(take(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_with_is_see_other() {
        let session = session();
        let response = redirect_with(&session, NoticeLevel::Info, "hi", "/dashboard")
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/dashboard");
    }

    #[tokio::test]
    async fn test_internal_errors_are_not_shown() {
        let session = session();
        let result =
            redirect_on_error(&session, UserError::Internal("disk full".into()), "/x").await;
        assert!(result.is_err());
        assert!(take(&session).await.unwrap().is_empty());

        let response = redirect_on_error(&session, UserError::SelfDelete, "/admin/users")
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(
            take(&session).await.unwrap()[0].message,
            "You cannot delete your own account"
        );
    }
}
