//! Project administration.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use folio_common::AppResult;
use folio_core::{CreateProjectInput, UpdateProjectInput};
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::{named, success},
};

async fn list(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<Value>> {
    let projects = state.project_service.list_admin().await?;
    Ok(named("projects", projects))
}

async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProjectInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let project = state.project_service.create(input).await?;
    Ok((StatusCode::CREATED, named("project", project)))
}

async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateProjectInput>,
) -> AppResult<Json<Value>> {
    let project = state.project_service.update(&id, input).await?;
    Ok(named("project", project))
}

async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.project_service.delete(&id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", patch(update).delete(delete))
}
