//! Server-rendered pages for folio.
//!
//! Pages are built with maud and read through the same services as the JSON
//! API. Every request passes through session resolution (with refresh of
//! expired sessions) and the admin gate before any page code runs.

pub mod components;
pub mod error;
pub mod gate;
pub mod pages;
pub mod session;

use axum::{Router, extract::FromRef, middleware::from_fn_with_state};
use folio_api::AppState;

pub use error::{PageError, PageResult};

/// Site details shown on every page.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub name: String,
    /// Mark session cookies `Secure`.
    pub secure_cookies: bool,
}

impl SiteInfo {
    /// Site info for a public URL. HTTPS sites get secure cookies.
    #[must_use]
    pub fn new(name: impl Into<String>, public_url: &str) -> Self {
        Self {
            name: name.into(),
            secure_cookies: public_url.starts_with("https://"),
        }
    }
}

/// State shared by page handlers.
#[derive(Clone)]
pub struct WebState {
    pub app: AppState,
    pub site: SiteInfo,
}

impl FromRef<WebState> for AppState {
    fn from_ref(state: &WebState) -> Self {
        state.app.clone()
    }
}

/// Page router with session resolution and the admin gate applied.
pub fn app(state: WebState) -> Router {
    pages::router()
        .fallback(pages::errors::not_found)
        .layer(from_fn_with_state(state.clone(), gate::admin_gate))
        .layer(from_fn_with_state(state.clone(), session::session_middleware))
        .with_state(state)
}
