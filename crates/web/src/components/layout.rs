//! Base page layout.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use folio_core::SessionUser;

/// Submits `form[data-api]` as JSON to the API and reloads on success.
///
/// `data-method` overrides the verb; a `url` in the response is followed.
const FORM_SCRIPT: &str = r#"document.addEventListener('submit', async function (e) {
    var form = e.target;
    if (!form.dataset.api) return;
    e.preventDefault();
    var body = {};
    new FormData(form).forEach(function (v, k) {
        if (k === 'slugs') { (body.slugs = body.slugs || []).push(v); }
        else if (v !== '') { body[k] = v; }
    });
    var res = await fetch(form.dataset.api, {
        method: form.dataset.method || 'POST',
        headers: { 'Content-Type': 'application/json' },
        credentials: 'same-origin',
        body: JSON.stringify(body)
    });
    var data = await res.json().catch(function () { return {}; });
    if (!res.ok) { alert(data.error || 'Request failed'); return; }
    if (data.url) { window.location = data.url; } else { window.location.reload(); }
});"#;

/// Base page layout builder.
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    site_name: &'a str,
    viewer: Option<&'a SessionUser>,
}

impl<'a> BaseLayout<'a> {
    /// Create a layout for a page title, site name and viewer.
    #[must_use]
    pub const fn new(title: &'a str, site_name: &'a str, viewer: Option<&'a SessionUser>) -> Self {
        Self {
            title,
            site_name,
            viewer,
        }
    }

    /// Render the complete page with `content` in the main column.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - " (self.site_name) }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    footer class="container" {
                        small { (self.site_name) }
                    }
                    script { (PreEscaped(FORM_SCRIPT)) }
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li { a href="/" { strong { (self.site_name) } } }
                    }
                    ul {
                        li { a href="/categories" { "Categories" } }
                        li { a href="/tags" { "Tags" } }
                        li { a href="/archive" { "Archive" } }
                        li { a href="/projects" { "Projects" } }
                        li { a href="/modules" { "Modules" } }
                        li { a href="/links" { "Links" } }
                        @if self.viewer.is_some() {
                            li { a href="/admin" { "Admin" } }
                        }
                    }
                }
            }
        }
    }
}

/// Minimal layout for error pages, which render without site state.
#[must_use]
pub fn bare_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/css/style.css";
            }
            body {
                main class="container" {
                    (content)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_includes_site_name() {
        let page = BaseLayout::new("Tags", "Folio", None)
            .render(html! { p { "body" } })
            .into_string();

        assert!(page.contains("<title>Tags - Folio</title>"));
        assert!(!page.contains("href=\"/admin\""));
    }

    #[test]
    fn test_signed_in_nav() {
        let viewer = SessionUser {
            id: "u1".to_string(),
            email: None,
        };
        let page = BaseLayout::new("Home", "Folio", Some(&viewer))
            .render(html! {})
            .into_string();

        assert!(page.contains("href=\"/admin\""));
    }
}
