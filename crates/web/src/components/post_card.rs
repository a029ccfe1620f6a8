//! Post summaries and shared formatting.

use chrono::{DateTime, FixedOffset};
use folio_core::PostView;
use maud::{Markup, html};
use serde_json::Value;

/// `2024-03-09`.
#[must_use]
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// String entries of a JSON tag array.
#[must_use]
pub fn tag_list(tags: &Value) -> Vec<&str> {
    tags.as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Plain text split into paragraphs on blank lines.
#[must_use]
pub fn paragraphs(text: &str) -> Markup {
    html! {
        @for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
            p {
                @for (i, line) in block.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

/// Tag links.
#[must_use]
pub fn tag_links(tags: &Value) -> Markup {
    html! {
        @for tag in tag_list(tags) {
            a class="tag" href={ "/tags/" (urlencoding::encode(tag)) } { "#" (tag) }
            " "
        }
    }
}

/// Card for a post in a listing.
#[must_use]
pub fn post_card(view: &PostView) -> Markup {
    let post = &view.post;
    let date = post.published_at.unwrap_or(post.created_at);

    html! {
        article class="post-card" {
            @if let Some(cover) = &post.cover_image {
                img src=(cover) alt=(post.title) loading="lazy";
            }
            h3 { a href={ "/posts/" (post.slug) } { (post.title) } }
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
            }
            @if let Some(excerpt) = &post.excerpt {
                p { (excerpt) }
            }
            p class="stats" {
                (post.views) " views · " (post.likes_count) " likes · "
                (post.comments_count) " comments"
            }
            (tag_links(&post.tags))
        }
    }
}

/// Grid of post cards with an empty-state message.
#[must_use]
pub fn post_grid(posts: &[PostView], empty_message: &str) -> Markup {
    html! {
        @if posts.is_empty() {
            p class="empty" { (empty_message) }
        } @else {
            div class="post-grid" {
                @for view in posts {
                    (post_card(view))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_list_skips_non_strings() {
        let tags = json!(["rust", 3, "web"]);
        assert_eq!(tag_list(&tags), vec!["rust", "web"]);
        assert!(tag_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_paragraphs_escape_html() {
        let html = paragraphs("first <b>line</b>\nsecond\n\nnext").into_string();
        assert_eq!(
            html,
            "<p>first &lt;b&gt;line&lt;/b&gt;<br>second</p><p>next</p>"
        );
    }

    #[test]
    fn test_tag_links_encode() {
        let html = tag_links(&json!(["c sharp"])).into_string();
        assert!(html.contains(r#"href="/tags/c%20sharp""#));
    }
}
