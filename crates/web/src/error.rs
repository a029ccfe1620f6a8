//! Page errors rendered as HTML.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use folio_common::AppError;

use crate::pages::errors::render_error_page;

/// Error returned by page handlers.
#[derive(Debug)]
pub struct PageError(pub AppError);

/// Result type for page handlers.
pub type PageResult<T> = Result<T, PageError>;

impl PageError {
    /// A missing resource.
    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self(AppError::NotFound(format!("{what} not found")))
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if self.0.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Page failed to render");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Page request rejected");
        }

        let markup = match status {
            StatusCode::NOT_FOUND => render_error_page(
                status,
                "Page not found",
                "The page you are looking for does not exist.",
            ),
            s if s.is_server_error() => render_error_page(
                status,
                "Something went wrong",
                "The page could not be loaded. Please try again later.",
            ),
            _ => render_error_page(status, "Request rejected", &self.0.client_message()),
        };

        (status, Html(markup.into_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_error() {
        let response = PageError::not_found("Post").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = PageError(AppError::Database("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
