//! Admin gate for the back office pages.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use folio_common::AppError;
use folio_core::SessionUser;
use tracing::debug;

use crate::{PageError, WebState};

/// Whether `path` belongs to the back office.
#[must_use]
pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

/// Where to send a visitor who may not see `path`.
#[must_use]
pub fn login_redirect(path: &str) -> String {
    format!("/?redirect={}", urlencoding::encode(path))
}

/// Block non-admin visitors from `/admin` before any page code runs.
///
/// Must run after [`crate::session::session_middleware`].
pub async fn admin_gate(
    State(state): State<WebState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !is_admin_path(&path) {
        return next.run(req).await;
    }

    let Some(user) = req.extensions().get::<SessionUser>().cloned() else {
        debug!(path = %path, "Anonymous visitor sent away from admin");
        return Redirect::to(&login_redirect(&path)).into_response();
    };

    match state.app.user_service.me(&user.id).await {
        Ok(profile) if profile.is_admin() => next.run(req).await,
        Ok(_) | Err(AppError::NotFound(_)) => {
            debug!(path = %path, user_id = %user.id, "Non-admin sent away from admin");
            Redirect::to(&login_redirect(&path)).into_response()
        }
        Err(e) => PageError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_paths() {
        assert!(is_admin_path("/admin"));
        assert!(is_admin_path("/admin/posts"));
        assert!(!is_admin_path("/administrator"));
        assert!(!is_admin_path("/"));
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        assert_eq!(login_redirect("/admin/users"), "/?redirect=%2Fadmin%2Fusers");
    }
}
