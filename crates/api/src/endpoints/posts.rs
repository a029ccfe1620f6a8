//! Public post endpoints: listing and like/favorite toggles.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use folio_common::AppResult;
use folio_core::{InteractionKind, PostPage, PublicPostQuery, ToggleState};
use serde_json::{Value, json};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{Cached, viewer_cache},
};

fn toggle_body(kind: InteractionKind, state: ToggleState) -> Value {
    json!({ kind.state_key(): state.active, "count": state.count })
}

/// Published posts.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PublicPostQuery>,
) -> AppResult<Json<PostPage>> {
    let page = state.post_service.list_published(&query).await?;
    Ok(Json(page))
}

async fn status(
    kind: InteractionKind,
    user: Option<String>,
    state: &AppState,
    slug: &str,
) -> AppResult<Response> {
    let toggle = state
        .interaction_service
        .status(kind, slug, user.as_deref())
        .await?;
    Ok(Cached(viewer_cache(user.is_some()), toggle_body(kind, toggle)).into_response())
}

async fn like_status(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    status(InteractionKind::Like, user.map(|u| u.id), &state, &slug).await
}

async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let kind = InteractionKind::Like;
    let toggle = state.interaction_service.add(kind, &slug, &user.id).await?;
    Ok(Json(toggle_body(kind, toggle)))
}

async fn unlike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let kind = InteractionKind::Like;
    let toggle = state.interaction_service.remove(kind, &slug, &user.id).await?;
    Ok(Json(toggle_body(kind, toggle)))
}

async fn favorite_status(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    status(InteractionKind::Favorite, user.map(|u| u.id), &state, &slug).await
}

async fn favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let kind = InteractionKind::Favorite;
    let toggle = state.interaction_service.add(kind, &slug, &user.id).await?;
    Ok(Json(toggle_body(kind, toggle)))
}

async fn unfavorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let kind = InteractionKind::Favorite;
    let toggle = state
        .interaction_service
        .remove(kind, &slug, &user.id)
        .await?;
    Ok(Json(toggle_body(kind, toggle)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{slug}/like", get(like_status).post(like).delete(unlike))
        .route(
            "/{slug}/favorite",
            get(favorite_status).post(favorite).delete(unfavorite),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_body_keys() {
        let body = toggle_body(
            InteractionKind::Favorite,
            ToggleState {
                active: true,
                count: 4,
            },
        );
        assert_eq!(body, json!({ "favorited": true, "count": 4 }));
    }
}
