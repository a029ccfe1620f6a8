//! Current-user endpoints.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::{get, patch, post},
};
use folio_common::AppResult;
use folio_core::{InteractionKind, PostPage, StoredFile, UpdateProfileInput, parse_page};
use folio_db::entities::profile;
use serde::Deserialize;
use serde_json::Value;

use super::upload::read_upload_form;
use crate::{
    extractors::{AppJson, AuthUser},
    middleware::AppState,
    response::named,
};

/// Multipart overhead allowed on top of the largest avatar.
const AVATAR_BODY_LIMIT: usize = 3 * 1024 * 1024;

/// Page query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<profile::Model>> {
    let profile = state.user_service.me(&user.id).await?;
    Ok(Json(profile))
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfileInput>,
) -> AppResult<Json<Value>> {
    let profile = state.user_service.update_profile(&user.id, input).await?;
    Ok(named("profile", profile))
}

async fn interactions(
    kind: InteractionKind,
    user_id: &str,
    state: &AppState,
    query: &PageQuery,
) -> AppResult<Json<PostPage>> {
    let page = state
        .interaction_service
        .posts_for_user(kind, user_id, parse_page(query.page.as_deref()))
        .await?;
    Ok(Json(page))
}

async fn favorites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPage>> {
    interactions(InteractionKind::Favorite, &user.id, &state, &query).await
}

async fn likes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPage>> {
    interactions(InteractionKind::Like, &user.id, &state, &query).await
}

async fn upload_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<StoredFile>> {
    let form = read_upload_form(multipart).await?;
    let stored = state
        .upload_service
        .upload_avatar(&user.id, form.file)
        .await?;
    Ok(Json(stored))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/profile", patch(update_profile))
        .route("/favorites", get(favorites))
        .route("/likes", get(likes))
        .route(
            "/upload-avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
}
