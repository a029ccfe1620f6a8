//! Admin endpoints. Every handler requires the admin role.

mod categories;
mod comments;
mod html_modules;
mod links;
mod posts;
mod projects;
mod users;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
};
use folio_common::AppResult;
use folio_core::{DashboardStats, StoredFile};
use tracing::info;

use super::upload::read_upload_form;
use crate::{extractors::AdminUser, middleware::AppState};

/// Multipart overhead allowed on top of the largest asset.
const ASSET_BODY_LIMIT: usize = 51 * 1024 * 1024;

/// Site totals for the dashboard.
async fn stats(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let stats = state.dashboard_service.stats().await?;
    Ok(Json(stats))
}

/// Store an asset under the folder named in the form.
async fn upload(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<StoredFile>> {
    let form = read_upload_form(multipart).await?;
    let stored = state
        .upload_service
        .upload_asset(form.folder.as_deref(), form.file)
        .await?;
    info!(admin_id = %admin.id, path = %stored.path, "Asset uploaded");
    Ok(Json(stored))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/posts", posts::router())
        .nest("/categories", categories::router())
        .nest("/external-links", links::external_router())
        .nest("/personal-links", links::personal_router())
        .nest("/projects", projects::router())
        .nest("/html-modules", html_modules::router())
        .nest("/users", users::router())
        .nest("/comments", comments::router())
        .route("/stats", get(stats))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(ASSET_BODY_LIMIT)),
        )
}
