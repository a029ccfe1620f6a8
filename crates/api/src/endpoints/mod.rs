//! API endpoints.

mod admin;
mod comments;
mod posts;
mod projects;
mod upload;
mod user;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/user", user::router())
        .nest("/projects", projects::router())
        .nest("/admin", admin::router())
}
