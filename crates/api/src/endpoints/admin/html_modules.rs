//! HTML module administration.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use folio_common::AppResult;
use folio_core::{CreateHtmlModuleInput, UpdateHtmlModuleInput};
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::{named, success},
};

async fn list(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<Value>> {
    let modules = state.html_module_service.list_admin().await?;
    Ok(named("modules", modules))
}

async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateHtmlModuleInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let module = state.html_module_service.create(input).await?;
    Ok((StatusCode::CREATED, named("module", module)))
}

async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateHtmlModuleInput>,
) -> AppResult<Json<Value>> {
    let module = state.html_module_service.update(&id, input).await?;
    Ok(named("module", module))
}

async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.html_module_service.delete(&id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", patch(update).delete(delete))
}
