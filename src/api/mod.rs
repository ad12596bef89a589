use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod admin;
pub mod auth;
mod dashboard;
mod error;
pub mod guard;
mod hard_disk;
pub mod notice;
mod observability;
mod servers;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AuthService, HardDiskService, ServerService, UserService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Multipart framing on top of the CSV payload itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn hard_disk_service(&self) -> &Arc<dyn HardDiskService> {
        &self.shared.hard_disk_service
    }

    #[must_use]
    pub fn server_service(&self) -> &Arc<dyn ServerService> {
        &self.shared.server_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server_config = state.config().server.clone();

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server_config.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server_config.session_inactivity_minutes,
        )));

    let cors_origins = &server_config.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/notices", get(notice::get_notices))
        .layer(session_layer)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Every route behind the authentication gate. Role guards are layered on
/// the sub-routers, so they run after the gate.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let upload_limit = state.config().assets.max_upload_bytes + UPLOAD_OVERHEAD_BYTES;

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/create", post(admin::create_user))
        .route("/admin/users/{id}", get(admin::get_user))
        .route("/admin/users/{id}/edit", post(admin::edit_user))
        .route("/admin/users/{id}/delete", post(admin::delete_user))
        .route(
            "/admin/users/{id}/reset-password",
            post(admin::reset_password),
        )
        .route_layer(middleware::from_fn(guard::require_admin));

    let operator_routes = Router::new()
        .route("/assets/servers/create", post(servers::create_server))
        .route("/assets/servers/{id}/edit", post(servers::edit_server))
        .route("/assets/servers/{id}/delete", post(servers::delete_server))
        .route_layer(middleware::from_fn(guard::require_operator_or_admin));

    Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route(
            "/change-password",
            get(auth::change_password_page).post(auth::change_password),
        )
        .route("/metrics", get(observability::get_metrics))
        .route("/assets/hard-disk", get(hard_disk::list_hard_disk))
        .route(
            "/assets/hard-disk/upload",
            post(hard_disk::upload_hard_disk).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/assets/hard-disk/export/{fmt}",
            get(hard_disk::export_hard_disk),
        )
        .route("/assets/servers", get(servers::list_servers))
        .route("/assets/servers/{id}", get(servers::get_server))
        .merge(admin_routes)
        .merge(operator_routes)
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_session,
        ))
}
