//! HTTP JSON API for folio.
//!
//! - **Endpoints**: public reads, signed-in interactions, admin back office
//! - **Extractors**: session user, admin gate, JSON bodies
//! - **Middleware**: shared state and token resolution
//!
//! Built on Axum 0.8. Mount [`app`] under `/api`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};
use folio_common::AppError;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// API router with session resolution applied, ready to nest.
pub fn app(state: AppState) -> Router {
    router()
        .fallback(|| async { AppError::NotFound("Not found".to_string()) })
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
