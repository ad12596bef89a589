//! Role-based authorization.
//!
//! Guards run after [`super::auth::require_session`] and answer a bare 403
//! when the role does not fit.

use axum::{extract::Request, middleware::Next, response::Response};

use super::ApiError;
use super::auth::CurrentUser;
use crate::models::user::{Role, User};

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const OPERATOR_OR_ADMIN: &[Role] = &[Role::Admin, Role::Operator];

pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = user.id,
            role = %user.role,
            "Access denied"
        );
        metrics::counter!("authorization_denied_total").increment(1);
        Err(ApiError::Forbidden)
    }
}

pub async fn require_admin(
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&user, ADMIN_ONLY)?;
    Ok(next.run(request).await)
}

pub async fn require_operator_or_admin(
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&user, OPERATOR_OR_ADMIN)?;
    Ok(next.run(request).await)
}
