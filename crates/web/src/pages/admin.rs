//! Back office pages. The admin gate has already checked the role.

use axum::{
    extract::{Query, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use folio_core::{AdminPostQuery, parse_page};
use folio_db::entities::post::PostStatus;
use maud::{Markup, html};
use serde::Deserialize;

use super::{home::SORT_OPTIONS, render_page};
use crate::{
    PageResult, WebState,
    components::{Pagination, format_date},
};

/// Page query.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// User search query.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub page: Option<String>,
}

fn admin_nav() -> Markup {
    html! {
        nav class="admin-nav" {
            a href="/admin" { "Dashboard" }
            a href="/admin/posts" { "Posts" }
            a href="/admin/categories" { "Categories" }
            a href="/admin/comments" { "Comments" }
            a href="/admin/users" { "Users" }
        }
    }
}

fn delete_button(api: &str) -> Markup {
    html! {
        form data-api=(api) data-method="DELETE" class="inline" {
            button type="submit" class="danger" { "Delete" }
        }
    }
}

pub async fn dashboard(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let stats = state.app.dashboard_service.stats().await?;

    let cards = [
        ("Posts", stats.total_posts.to_string()),
        ("Published", stats.published_posts.to_string()),
        ("Comments", stats.total_comments.to_string()),
        ("Views", stats.total_views.to_string()),
        ("Users", stats.total_users.to_string()),
    ];

    let content = html! {
        (admin_nav())
        h1 { "Dashboard" }
        div class="stat-grid" {
            @for (label, value) in &cards {
                div class="stat" {
                    span class="value" { (value) }
                    span class="label" { (label) }
                }
            }
        }
    };

    Ok(render_page(&state, "Dashboard", viewer.as_ref(), content))
}

pub async fn posts(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Query(query): Query<AdminPostQuery>,
) -> PageResult<Html<String>> {
    let page = state.app.post_service.list_admin(&query).await?;

    let pagination = Pagination::new(parse_page(query.page.as_deref()), page.total_pages, "/admin/posts")
        .with_param("search", query.search.as_deref())
        .with_param("status", query.status.as_deref())
        .with_param("sort", query.sort.as_deref());
    let status = query.status.as_deref().unwrap_or("all");

    let content = html! {
        (admin_nav())
        h1 { "Posts (" (page.total) ")" }
        form method="get" action="/admin/posts" class="filters" {
            input type="search" name="search" placeholder="Title or tag" value=[query.search.as_deref()];
            select name="status" {
                @for value in ["all", "published", "draft"] {
                    option value=(value) selected[status == value] { (value) }
                }
            }
            select name="sort" {
                @for (value, label) in SORT_OPTIONS {
                    option value=(value) selected[query.sort.as_deref() == Some(value)] { (label) }
                }
            }
            button type="submit" { "Filter" }
        }
        form data-api="/api/admin/posts/batch" id="batch" {
            select name="action" {
                option value="publish" { "Publish" }
                option value="unpublish" { "Unpublish" }
                option value="delete" { "Delete" }
            }
            button type="submit" { "Apply to selected" }
        }
        table {
            thead {
                tr { th {} th { "Title" } th { "Status" } th { "Category" } th { "Views" } th { "Updated" } th {} }
            }
            tbody {
                @for view in &page.posts {
                    @let post = &view.post;
                    tr {
                        td { input type="checkbox" name="slugs" value=(post.slug) form="batch"; }
                        td { a href={ "/posts/" (post.slug) } { (post.title) } }
                        td {
                            @if post.status == PostStatus::Published { "published" } @else { "draft" }
                        }
                        td {
                            @if let Some(category) = &view.category_data { (category.name) }
                        }
                        td { (post.views) }
                        td { (format_date(&post.updated_at)) }
                        td { (delete_button(&format!("/api/admin/posts/{}", post.slug))) }
                    }
                }
            }
        }
        (pagination)
    };

    Ok(render_page(&state, "Posts", viewer.as_ref(), content))
}

pub async fn categories(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let categories = state.app.category_service.list_admin().await?;

    let content = html! {
        (admin_nav())
        h1 { "Categories" }
        form data-api="/api/admin/categories" class="create" {
            input name="name" placeholder="Name" required;
            input name="slug" placeholder="slug" pattern="[a-z0-9]+(-[a-z0-9]+)*" required;
            input name="description" placeholder="Description";
            button type="submit" { "Add category" }
        }
        table {
            thead { tr { th { "Name" } th { "Slug" } th { "Posts" } th {} } }
            tbody {
                @for view in &categories {
                    @let category = &view.category;
                    tr {
                        td { (category.name) }
                        td { code { (category.slug) } }
                        td { (view.posts_count) }
                        td {
                            @if view.posts_count == 0 {
                                (delete_button(&format!("/api/admin/categories/{}", category.id)))
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(render_page(&state, "Categories", viewer.as_ref(), content))
}

pub async fn comments(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Query(query): Query<PageQuery>,
) -> PageResult<Html<String>> {
    let current = parse_page(query.page.as_deref());
    let page = state.app.comment_service.list_admin(current).await?;
    let pagination = Pagination::new(current, page.total_pages, "/admin/comments");

    let content = html! {
        (admin_nav())
        h1 { "Comments (" (page.total) ")" }
        table {
            thead { tr { th { "Author" } th { "Post" } th { "Comment" } th { "Date" } th {} } }
            tbody {
                @for view in &page.comments {
                    @let comment = &view.comment;
                    tr {
                        td {
                            @if let Some(author) = &view.author { (author.username) } @else { "deleted user" }
                        }
                        td { a href={ "/posts/" (comment.post_slug) "#comment-" (comment.id) } { (comment.post_slug) } }
                        td { (comment.content) }
                        td { (format_date(&comment.created_at)) }
                        td { (delete_button(&format!("/api/admin/comments/{}", comment.id))) }
                    }
                }
            }
        }
        (pagination)
    };

    Ok(render_page(&state, "Comments", viewer.as_ref(), content))
}

pub async fn users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Query(query): Query<UserQuery>,
) -> PageResult<Html<String>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let current = parse_page(query.page.as_deref());
    let page = state.app.user_service.list(search, current).await?;
    let pagination =
        Pagination::new(current, page.total_pages, "/admin/users").with_param("search", search);
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());

    let content = html! {
        (admin_nav())
        h1 { "Users (" (page.total) ")" }
        form method="get" action="/admin/users" class="filters" {
            input type="search" name="search" placeholder="Username" value=[search];
            button type="submit" { "Search" }
        }
        table {
            thead {
                tr { th { "Username" } th { "Email" } th { "Comments" } th { "Likes" } th { "Role" } }
            }
            tbody {
                @for row in &page.users {
                    @let profile = &row.profile;
                    tr {
                        td { a href={ "/users/" (profile.username) } { (profile.username) } }
                        td { (row.email.as_deref().unwrap_or("-")) }
                        td { (row.stats.comments) }
                        td { (row.stats.likes) }
                        td {
                            @if Some(profile.id.as_str()) == viewer_id {
                                "admin (you)"
                            } @else {
                                form data-api={ "/api/admin/users/" (profile.id) } data-method="PATCH" class="inline" {
                                    select name="role" {
                                        option value="user" selected[!profile.is_admin()] { "user" }
                                        option value="admin" selected[profile.is_admin()] { "admin" }
                                    }
                                    button type="submit" { "Save" }
                                }
                            }
                        }
                    }
                }
            }
        }
        (pagination)
    };

    Ok(render_page(&state, "Users", viewer.as_ref(), content))
}
