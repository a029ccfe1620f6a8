//! Category administration.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use folio_common::AppResult;
use folio_core::{CreateCategoryInput, UpdateCategoryInput};
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::{named, success},
};

async fn list(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<Value>> {
    let categories = state.category_service.list_admin().await?;
    Ok(named("categories", categories))
}

async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategoryInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let category = state.category_service.create(input).await?;
    Ok((StatusCode::CREATED, named("category", category)))
}

async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateCategoryInput>,
) -> AppResult<Json<Value>> {
    let category = state.category_service.update(&id, input).await?;
    Ok(named("category", category))
}

/// Delete an empty category.
async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.category_service.delete(&id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", patch(update).delete(delete))
}
