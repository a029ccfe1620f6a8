//! User administration.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use folio_common::AppResult;
use folio_core::{UpdateRoleInput, UserPage, parse_page};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::named,
};

/// User listing query.
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub page: Option<String>,
}

async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> AppResult<Json<UserPage>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let page = state
        .user_service
        .list(search, parse_page(query.page.as_deref()))
        .await?;
    Ok(Json(page))
}

async fn show(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let user = state.user_service.get(&id).await?;
    Ok(named("user", user))
}

/// Change a user's role. Admins cannot demote themselves.
async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateRoleInput>,
) -> AppResult<Json<Value>> {
    let user = state.user_service.set_role(&admin.id, &id, &input).await?;
    Ok(named("user", user))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(show).patch(update))
}
