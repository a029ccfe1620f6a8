//! Comment moderation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use folio_common::AppResult;
use folio_core::{CommentPage, parse_page};
use serde::Deserialize;
use serde_json::Value;

use crate::{extractors::AdminUser, middleware::AppState, response::success};

/// Page query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CommentPage>> {
    let page = state
        .comment_service
        .list_admin(parse_page(query.page.as_deref()))
        .await?;
    Ok(Json(page))
}

async fn remove(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.comment_service.delete_any(&id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", delete(remove))
}
