//! Home page: published posts with search and sorting.

use axum::{
    extract::{Query, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use folio_core::{CategoryView, PublicPostQuery, parse_page};
use maud::html;
use serde::Deserialize;

use super::render_page;
use crate::{
    PageResult, WebState,
    components::{Pagination, post_grid},
};

/// Sort options offered on listings.
pub const SORT_OPTIONS: [(&str, &str); 4] = [
    ("newest", "Newest"),
    ("oldest", "Oldest"),
    ("views", "Most viewed"),
    ("comments", "Most discussed"),
];

/// Home page query.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    /// Set by the admin gate when it turned a visitor away.
    pub redirect: Option<String>,
}

fn category_sidebar(categories: &[CategoryView]) -> maud::Markup {
    html! {
        aside class="sidebar" {
            h2 { "Categories" }
            ul {
                @for view in categories {
                    li {
                        a href={ "/categories/" (view.category.slug) } { (view.category.name) }
                        " (" (view.posts_count) ")"
                    }
                }
            }
        }
    }
}

pub async fn home(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Query(query): Query<HomeQuery>,
) -> PageResult<Html<String>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let posts_query = PublicPostQuery {
        search: search.map(str::to_string),
        sort: query.sort.clone(),
        page: query.page.clone(),
        ..PublicPostQuery::default()
    };

    let (page, categories) = tokio::try_join!(
        state.app.post_service.list_published(&posts_query),
        state.app.category_service.list(),
    )?;

    let pagination = Pagination::new(parse_page(query.page.as_deref()), page.total_pages, "/")
        .with_param("search", search)
        .with_param("sort", query.sort.as_deref());

    let content = html! {
        @if query.redirect.is_some() {
            p class="notice" { "Sign in with an administrator account to continue." }
        }
        form method="get" action="/" class="search" {
            input type="search" name="search" placeholder="Search posts" value=[search];
            select name="sort" {
                @for (value, label) in SORT_OPTIONS {
                    option value=(value) selected[query.sort.as_deref() == Some(value)] { (label) }
                }
            }
            button type="submit" { "Search" }
        }
        div class="with-sidebar" {
            section {
                @if let Some(term) = search {
                    h1 { "Results for \u{201c}" (term) "\u{201d}" }
                } @else {
                    h1 { "Latest posts" }
                }
                (post_grid(&page.posts, "No posts found."))
                (pagination)
            }
            (category_sidebar(&categories))
        }
    };

    Ok(render_page(&state, "Home", viewer.as_ref(), content))
}
