//! Threaded comment rendering.

use folio_core::CommentNode;
use maud::{Markup, html};

use super::post_card::format_date;

/// Reply form posting to the comments API.
fn reply_form(post_slug: &str, parent_id: Option<&str>) -> Markup {
    html! {
        form data-api="/api/comments" class="comment-form" {
            input type="hidden" name="post_slug" value=(post_slug);
            @if let Some(parent_id) = parent_id {
                input type="hidden" name="parent_id" value=(parent_id);
            }
            textarea name="content" maxlength="1000" required {}
            button type="submit" { @if parent_id.is_some() { "Reply" } @else { "Comment" } }
        }
    }
}

fn render_node(node: &CommentNode, signed_in: bool) -> Markup {
    let comment = &node.comment.comment;
    let author = node
        .comment
        .author
        .as_ref()
        .map_or("deleted user", |a| a.username.as_str());

    html! {
        li class="comment" id={ "comment-" (comment.id) } data-depth=(node.depth) {
            p class="meta" {
                strong { (author) }
                " · "
                time datetime=(comment.created_at.to_rfc3339()) { (format_date(&comment.created_at)) }
            }
            p { (comment.content) }
            @if signed_in && node.can_reply {
                details {
                    summary { "Reply" }
                    (reply_form(&comment.post_slug, Some(&comment.id)))
                }
            }
            @if !node.replies.is_empty() {
                ol class="replies" {
                    @for reply in &node.replies {
                        (render_node(reply, signed_in))
                    }
                }
            }
        }
    }
}

/// Comment section for a post.
#[must_use]
pub fn comment_section(post_slug: &str, tree: &[CommentNode], signed_in: bool) -> Markup {
    let total: usize = tree.iter().map(CommentNode::len).sum();

    html! {
        section class="comments" {
            h2 { "Comments (" (total) ")" }
            @if signed_in {
                (reply_form(post_slug, None))
            } @else {
                p { "Sign in to join the discussion." }
            }
            @if tree.is_empty() {
                p class="empty" { "No comments yet." }
            } @else {
                ol class="comment-tree" {
                    @for node in tree {
                        (render_node(node, signed_in))
                    }
                }
            }
        }
    }
}
