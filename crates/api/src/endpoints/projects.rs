//! Public project endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use folio_common::AppResult;
use folio_core::DownloadTarget;
use serde_json::Value;

use crate::{middleware::AppState, response::named};

async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let projects = state.project_service.list_published().await?;
    Ok(named("projects", projects))
}

/// Count a download and hand back the target URL.
async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DownloadTarget>> {
    let target = state.project_service.download(&id).await?;
    Ok(Json(target))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}/download", post(download))
}
