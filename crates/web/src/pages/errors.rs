//! Error pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{PageError, components::bare_layout};

/// Error page for `status`.
#[must_use]
pub fn render_error_page(status: StatusCode, heading: &str, message: &str) -> Markup {
    bare_layout(
        heading,
        html! {
            section class="error-page" {
                p class="status" { (status.as_u16()) }
                h1 { (heading) }
                p { (message) }
                a href="/" { "Back to home" }
            }
        },
    )
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    PageError::not_found("Page").into_response()
}
