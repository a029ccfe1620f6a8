//! Page handlers.
//!
//! Each module renders complete HTML pages from service reads. Public
//! listings only ever show published content.

pub mod admin;
pub mod errors;
pub mod home;
pub mod post;
pub mod showcase;
pub mod taxonomy;
pub mod user;

use axum::{Router, response::Html, routing::get};
use folio_core::SessionUser;
use maud::Markup;

use crate::{WebState, components::BaseLayout};

/// Wrap page content in the site layout.
pub(crate) fn render_page(
    state: &WebState,
    title: &str,
    viewer: Option<&SessionUser>,
    content: Markup,
) -> Html<String> {
    Html(
        BaseLayout::new(title, &state.site.name, viewer)
            .render(content)
            .into_string(),
    )
}

/// All page routes.
pub fn router() -> Router<WebState> {
    Router::new()
        .route("/", get(home::home))
        .route("/posts/{slug}", get(post::post_detail))
        .route("/categories", get(taxonomy::categories))
        .route("/categories/{slug}", get(taxonomy::category_detail))
        .route("/tags", get(taxonomy::tags))
        .route("/tags/{tag}", get(taxonomy::tag_detail))
        .route("/archive", get(taxonomy::archive))
        .route("/projects", get(showcase::projects))
        .route("/links", get(showcase::links))
        .route("/modules", get(showcase::modules))
        .route("/modules/{slug}", get(showcase::module_page))
        .route("/users/{username}", get(user::profile))
        .route("/admin", get(admin::dashboard))
        .route("/admin/posts", get(admin::posts))
        .route("/admin/categories", get(admin::categories))
        .route("/admin/comments", get(admin::comments))
        .route("/admin/users", get(admin::users))
}
