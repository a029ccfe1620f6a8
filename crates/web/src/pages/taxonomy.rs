//! Category, tag and archive pages.

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use folio_core::{PublicPostQuery, parse_page};
use maud::html;
use serde::Deserialize;

use super::render_page;
use crate::{
    PageError, PageResult, WebState,
    components::{Pagination, format_date, post_grid},
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a 1-based month.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Listing query for category and tag pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub sort: Option<String>,
    pub page: Option<String>,
}

pub async fn categories(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let categories = state.app.category_service.list().await?;

    let content = html! {
        h1 { "Categories" }
        @if categories.is_empty() {
            p class="empty" { "No categories yet." }
        } @else {
            ul class="category-list" {
                @for view in &categories {
                    @let category = &view.category;
                    li style=[category.color.as_ref().map(|c| format!("border-color: {c}"))] {
                        a href={ "/categories/" (category.slug) } { (category.name) }
                        span class="count" { " (" (view.posts_count) ")" }
                        @if let Some(description) = &category.description {
                            p { (description) }
                        }
                    }
                }
            }
        }
    };

    Ok(render_page(&state, "Categories", viewer.as_ref(), content))
}

pub async fn category_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Path(slug): Path<String>,
    Query(query): Query<ListingQuery>,
) -> PageResult<Html<String>> {
    let category = state
        .app
        .category_service
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| PageError::not_found("Category"))?;

    let page = state
        .app
        .post_service
        .list_published(&PublicPostQuery {
            category: Some(slug.clone()),
            sort: query.sort.clone(),
            page: query.page.clone(),
            ..PublicPostQuery::default()
        })
        .await?;

    let base_url = format!("/categories/{slug}");
    let pagination = Pagination::new(parse_page(query.page.as_deref()), page.total_pages, &base_url)
        .with_param("sort", query.sort.as_deref());

    let content = html! {
        h1 { (category.name) }
        @if let Some(description) = &category.description {
            p class="lead" { (description) }
        }
        p class="meta" { (page.total) " posts" }
        (post_grid(&page.posts, "No posts in this category yet."))
        (pagination)
    };

    Ok(render_page(&state, &category.name, viewer.as_ref(), content))
}

pub async fn tags(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let tags = state.app.post_service.tags().await?;

    let content = html! {
        h1 { "Tags" }
        @if tags.is_empty() {
            p class="empty" { "No tags yet." }
        } @else {
            ul class="tag-cloud" {
                @for tag in &tags {
                    li {
                        a href={ "/tags/" (urlencoding::encode(&tag.name)) } { "#" (tag.name) }
                        span class="count" { " (" (tag.count) ")" }
                    }
                }
            }
        }
    };

    Ok(render_page(&state, "Tags", viewer.as_ref(), content))
}

pub async fn tag_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Path(tag): Path<String>,
    Query(query): Query<ListingQuery>,
) -> PageResult<Html<String>> {
    let page = state
        .app
        .post_service
        .list_published(&PublicPostQuery {
            tag: Some(tag.clone()),
            sort: query.sort.clone(),
            page: query.page.clone(),
            ..PublicPostQuery::default()
        })
        .await?;

    if page.total == 0 {
        return Err(PageError::not_found("Tag"));
    }

    let base_url = format!("/tags/{}", urlencoding::encode(&tag));
    let pagination = Pagination::new(parse_page(query.page.as_deref()), page.total_pages, &base_url)
        .with_param("sort", query.sort.as_deref());
    let title = format!("#{tag}");

    let content = html! {
        h1 { (title) }
        p class="meta" { (page.total) " posts" }
        (post_grid(&page.posts, "No posts on this page."))
        (pagination)
    };

    Ok(render_page(&state, &title, viewer.as_ref(), content))
}

pub async fn archive(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let years = state.app.post_service.archive().await?;

    let content = html! {
        h1 { "Archive" }
        @if years.is_empty() {
            p class="empty" { "Nothing published yet." }
        }
        @for year in &years {
            section class="archive-year" {
                h2 { (year.year) }
                @for month in &year.months {
                    h3 { (month_name(month.month)) }
                    ul {
                        @for entry in &month.posts {
                            li {
                                time datetime=(entry.date.to_rfc3339()) { (format_date(&entry.date)) }
                                " "
                                a href={ "/posts/" (entry.slug) } { (entry.title) }
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(render_page(&state, "Archive", viewer.as_ref(), content))
}
