//! External and personal link administration.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use folio_common::AppResult;
use folio_core::{
    CreateExternalLinkInput, CreatePersonalLinkInput, LinkOrder, UpdateExternalLinkInput,
    UpdatePersonalLinkInput,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    extractors::{AdminUser, AppJson},
    middleware::AppState,
    response::{named, success},
};

/// Reorder body: a bare list or `{"links": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReorderRequest {
    List(Vec<LinkOrder>),
    Wrapped { links: Vec<LinkOrder> },
}

impl ReorderRequest {
    fn into_orders(self) -> Vec<LinkOrder> {
        match self {
            Self::List(orders) | Self::Wrapped { links: orders } => orders,
        }
    }
}

// === External links ===

async fn list_external(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<Value>> {
    let links = state.link_service.list_external().await?;
    Ok(named("links", links))
}

async fn create_external(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateExternalLinkInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let link = state.link_service.create_external(input).await?;
    Ok((StatusCode::CREATED, named("link", link)))
}

async fn update_external(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateExternalLinkInput>,
) -> AppResult<Json<Value>> {
    let link = state.link_service.update_external(&id, input).await?;
    Ok(named("link", link))
}

async fn delete_external(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.link_service.delete_external(&id).await?;
    Ok(success())
}

/// Persist new positions. Any failed update answers with one generic error.
async fn reorder_external(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(request): AppJson<ReorderRequest>,
) -> Response {
    let orders = request.into_orders();
    match state.link_service.reorder_external(&orders).await {
        Ok(()) => success().into_response(),
        Err(e) if e.is_server_error() => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to reorder links" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// === Personal links ===

async fn list_personal(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Json<Value>> {
    let links = state.link_service.list_personal().await?;
    Ok(named("links", links))
}

async fn create_personal(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePersonalLinkInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let link = state.link_service.create_personal(input).await?;
    Ok((StatusCode::CREATED, named("link", link)))
}

async fn update_personal(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdatePersonalLinkInput>,
) -> AppResult<Json<Value>> {
    let link = state.link_service.update_personal(&id, input).await?;
    Ok(named("link", link))
}

async fn delete_personal(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.link_service.delete_personal(&id).await?;
    Ok(success())
}

pub fn external_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_external).post(create_external))
        .route("/reorder", post(reorder_external))
        .route("/{id}", patch(update_external).delete(delete_external))
}

pub fn personal_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_personal).post(create_personal))
        .route("/{id}", patch(update_personal).delete(delete_personal))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_accepts_both_shapes() {
        let bare: ReorderRequest =
            serde_json::from_value(json!([{ "id": "a", "order": 2 }])).unwrap();
        let wrapped: ReorderRequest =
            serde_json::from_value(json!({ "links": [{ "id": "a", "order": 2 }] })).unwrap();

        assert_eq!(bare.into_orders()[0].order, 2);
        assert_eq!(wrapped.into_orders()[0].id, "a");
    }
}
