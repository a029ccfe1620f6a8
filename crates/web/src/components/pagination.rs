//! Pagination controls.

use maud::{Markup, Render, html};
use urlencoding::encode;

/// Page links around the current page. Pages are 1-based.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: u64,
    pub base_url: String,
    /// Query parameters kept on every link.
    pub params: Vec<(&'static str, String)>,
}

impl Pagination {
    /// Pagination for `base_url`.
    #[must_use]
    pub fn new(current_page: i64, total_pages: u64, base_url: &str) -> Self {
        Self {
            current_page,
            total_pages,
            base_url: base_url.to_string(),
            params: Vec::new(),
        }
    }

    /// Keep a query parameter on page links. Empty values are dropped.
    #[must_use]
    pub fn with_param(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.params.push((name, value.to_string()));
        }
        self
    }

    fn build_url(&self, page: i64) -> String {
        let mut query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={}", encode(v)))
            .collect();
        if page > 1 {
            query.push(format!("page={page}"));
        }

        if query.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, query.join("&"))
        }
    }

    /// Whether there is more than one page.
    #[must_use]
    pub const fn should_display(&self) -> bool {
        self.total_pages > 1
    }
}

impl Render for Pagination {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        let total = i64::try_from(self.total_pages).unwrap_or(i64::MAX);
        let current = self.current_page.clamp(1, total);
        let start = (current - 2).max(1);
        let end = (current + 2).min(total);

        html! {
            nav class="pagination" {
                @if current > 1 {
                    a href=(self.build_url(current - 1)) { "\u{00ab} Previous" }
                } @else {
                    span class="disabled" { "\u{00ab} Previous" }
                }

                @if start > 1 {
                    a href=(self.build_url(1)) { "1" }
                    @if start > 2 {
                        span { "..." }
                    }
                }

                @for page in start..=end {
                    @if page == current {
                        span class="current" { (page) }
                    } @else {
                        a href=(self.build_url(page)) { (page) }
                    }
                }

                @if end < total {
                    @if end < total - 1 {
                        span { "..." }
                    }
                    a href=(self.build_url(total)) { (total) }
                }

                @if current < total {
                    a href=(self.build_url(current + 1)) { "Next \u{00bb}" }
                } @else {
                    span class="disabled" { "Next \u{00bb}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_renders_nothing() {
        let pagination = Pagination::new(1, 1, "/");
        assert!(pagination.render().into_string().is_empty());
    }

    #[test]
    fn test_first_page_link_has_no_page_param() {
        let pagination = Pagination::new(2, 3, "/tags/rust");
        assert_eq!(pagination.build_url(1), "/tags/rust");
        assert_eq!(pagination.build_url(3), "/tags/rust?page=3");
    }

    #[test]
    fn test_params_are_encoded() {
        let pagination = Pagination::new(1, 4, "/")
            .with_param("search", Some("rust async"))
            .with_param("sort", None);
        assert_eq!(pagination.build_url(2), "/?search=rust%20async&page=2");
    }

    #[test]
    fn test_window_and_ellipsis() {
        let html = Pagination::new(6, 10, "/").render().into_string();

        assert!(html.contains(r#"<span class="current">6</span>"#));
        assert!(html.contains(r#"href="/?page=4""#));
        assert!(html.contains(r#"href="/?page=8""#));
        assert!(!html.contains(r#"href="/?page=3""#));
        assert!(html.contains(r#"href="/?page=10""#));
    }
}
