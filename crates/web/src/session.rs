//! Session resolution for page requests.
//!
//! Reads the session cookies, verifies the access token and, when it has
//! expired, exchanges the refresh token for a new pair. Refreshed tokens are
//! written back as cookies on the response.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use folio_core::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, RefreshedSession};
use tracing::{debug, warn};

use crate::WebState;

/// Lifetime of the refresh cookie.
const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;
/// Access cookie lifetime when the auth service does not say.
const DEFAULT_ACCESS_MAX_AGE_SECS: i64 = 60 * 60;

fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{name}={value}; HttpOnly{secure}; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

/// `Set-Cookie` values carrying a refreshed session.
#[must_use]
pub fn refreshed_cookies(session: &RefreshedSession, secure: bool) -> [String; 2] {
    [
        session_cookie(
            ACCESS_TOKEN_COOKIE,
            &session.access_token,
            session.expires_in.unwrap_or(DEFAULT_ACCESS_MAX_AGE_SECS),
            secure,
        ),
        session_cookie(
            REFRESH_TOKEN_COOKIE,
            &session.refresh_token,
            REFRESH_COOKIE_MAX_AGE_SECS,
            secure,
        ),
    ]
}

/// Resolve the session and expose the user to handlers.
pub async fn session_middleware(
    State(state): State<WebState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let access = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());

    let resolved = state
        .app
        .session_service
        .resolve(access.as_deref(), refresh.as_deref())
        .await;

    if let Some(user) = resolved.user {
        req.extensions_mut().insert(user);
    }

    let mut response = next.run(req).await;

    if let Some(session) = resolved.refreshed {
        debug!("Session refreshed");
        for cookie in refreshed_cookies(&session, state.site.secure_cookies) {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Failed to encode session cookie"),
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refreshed_cookies() {
        let session = RefreshedSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: Some(900),
        };
        let [access, refresh] = refreshed_cookies(&session, true);

        assert_eq!(
            access,
            "sb-access-token=access; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=900"
        );
        assert!(refresh.starts_with("sb-refresh-token=refresh; HttpOnly; Secure;"));
        assert!(refresh.ends_with(&format!("Max-Age={REFRESH_COOKIE_MAX_AGE_SECS}")));
    }

    #[test]
    fn test_insecure_cookie_with_default_lifetime() {
        let session = RefreshedSession {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: None,
        };
        let [access, _] = refreshed_cookies(&session, false);

        assert_eq!(
            access,
            "sb-access-token=a; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600"
        );
    }
}
