//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use folio_common::{AppError, AppResult};
use folio_core::{CreateCommentInput, UpdateCommentInput};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    extractors::{AppJson, AuthUser},
    middleware::AppState,
    response::{Cached, PUBLIC_CACHE, named, success},
};

/// Comment listing query.
#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub post_slug: Option<String>,
}

/// Comments on a post as a reply tree, oldest first, with authors attached.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> AppResult<Response> {
    let post_slug = query
        .post_slug
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("post_slug is required".to_string()))?;

    let comments = state.comment_service.tree_for_post(&post_slug).await?;
    Ok(Cached(PUBLIC_CACHE, json!({ "comments": comments })).into_response())
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let comment = state.comment_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, named("comment", comment)))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateCommentInput>,
) -> AppResult<Json<Value>> {
    let comment = state.comment_service.update(&id, &user.id, input).await?;
    Ok(named("comment", comment))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.comment_service.delete(&id, &user.id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", patch(update).delete(delete))
}
