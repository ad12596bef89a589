use serde::Serialize;

use crate::models::user::User;
use crate::report::ServerCounters;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: User,
    pub servers: ServerCounters,
    pub hard_disk_records: u64,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordPage {
    pub username: String,
    pub must_change_password: bool,
}
