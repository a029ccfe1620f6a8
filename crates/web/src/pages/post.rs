//! Post detail page.

use axum::{
    extract::{Path, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use folio_core::{InteractionKind, ToggleState};
use maud::{Markup, html};

use super::render_page;
use crate::{
    PageError, PageResult, WebState,
    components::{comment_section, format_date, paragraphs, post_card, tag_links},
};

fn toggle_button(slug: &str, kind: InteractionKind, state: ToggleState, signed_in: bool) -> Markup {
    let (endpoint, label) = match kind {
        InteractionKind::Like => ("like", "Like"),
        InteractionKind::Favorite => ("favorite", "Favorite"),
    };
    let api = format!("/api/posts/{slug}/{endpoint}");

    html! {
        @if signed_in {
            form data-api=(api) data-method=(if state.active { "DELETE" } else { "POST" }) class="toggle" {
                button type="submit" aria-pressed=(state.active) {
                    (label) " (" (state.count) ")"
                }
            }
        } @else {
            span class="toggle" { (label) " (" (state.count) ")" }
        }
    }
}

pub async fn post_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    let view = state
        .app
        .post_service
        .get_published(&slug)
        .await?
        .ok_or_else(|| PageError::not_found("Post"))?;

    state.app.post_service.record_view(&slug);

    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let interactions = &state.app.interaction_service;
    let (related, comments, liked, favorited) = tokio::try_join!(
        state.app.post_service.related(&view.post),
        state.app.comment_service.tree_for_post(&slug),
        interactions.status(InteractionKind::Like, &slug, viewer_id),
        interactions.status(InteractionKind::Favorite, &slug, viewer_id),
    )?;

    let post = &view.post;
    let signed_in = viewer.is_some();
    let date = post.published_at.unwrap_or(post.created_at);

    let content = html! {
        article class="post" {
            header {
                h1 { (post.title) }
                p class="meta" {
                    time datetime=(date.to_rfc3339()) { (format_date(&date)) }
                    @if let Some(category) = &view.category_data {
                        " · "
                        a href={ "/categories/" (category.slug) } { (category.name) }
                    }
                    @if let Some(author) = &view.author {
                        " · "
                        a href={ "/users/" (author.username) } { (author.username) }
                    }
                    " · " (post.views) " views"
                }
                (tag_links(&post.tags))
            }
            @if let Some(cover) = &post.cover_image {
                img class="cover" src=(cover) alt=(post.title);
            }
            div class="content" { (paragraphs(&post.content)) }
            div class="interactions" {
                (toggle_button(&slug, InteractionKind::Like, liked, signed_in))
                (toggle_button(&slug, InteractionKind::Favorite, favorited, signed_in))
            }
        }
        @if !related.is_empty() {
            section class="related" {
                h2 { "Related posts" }
                div class="post-grid" {
                    @for related_view in &related {
                        (post_card(related_view))
                    }
                }
            }
        }
        (comment_section(&slug, &comments, signed_in))
    };

    Ok(render_page(&state, &post.title, viewer.as_ref(), content))
}
