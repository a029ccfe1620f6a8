//! Post administration.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use folio_common::AppResult;
use folio_core::{AdminPostQuery, BatchReport, BatchRequest, CreatePostInput, PostPage, UpdatePostInput};
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::{named, success},
};

/// All posts, filtered and sorted.
async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<AdminPostQuery>,
) -> AppResult<Json<PostPage>> {
    let page = state.post_service.list_admin(&query).await?;
    Ok(Json(page))
}

async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePostInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let post = state.post_service.create(&admin.id, input).await?;
    Ok((StatusCode::CREATED, named("post", post)))
}

async fn show(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let post = state.post_service.get(&slug).await?;
    Ok(named("post", post))
}

async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(input): AppJson<UpdatePostInput>,
) -> AppResult<Json<Value>> {
    let post = state.post_service.update(&slug, input).await?;
    Ok(named("post", post))
}

async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    state.post_service.delete(&slug).await?;
    Ok(success())
}

/// Apply one action to many posts.
async fn batch(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(request): AppJson<BatchRequest>,
) -> AppResult<Json<BatchReport>> {
    let report = state.batch_service.execute(request).await?;
    Ok(Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/batch", post(batch))
        .route("/{slug}", get(show).patch(update).delete(delete))
}
