//! Comment thread assembly.
//!
//! Comments are stored flat with an optional `parent_id`. The tree is built
//! at read time in two passes: index every row by id, then attach each row
//! to its parent. Rows whose parent is missing (deleted, or on another
//! post) become roots. Siblings keep their input order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::views::CommentView;

/// Replies are offered on nodes shallower than this.
pub const MAX_REPLY_DEPTH: usize = 3;

/// A comment and its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: CommentView,
    /// 0 for roots.
    pub depth: usize,
    /// Rendering hint for the reply affordance.
    pub can_reply: bool,
    pub replies: Vec<Self>,
}

impl CommentNode {
    /// Number of comments in this subtree, including the node itself.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.replies.iter().map(Self::len).sum::<usize>()
    }

    /// Always false: a node contains at least itself.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Build a forest from comments ordered by `created_at` ascending.
///
/// Every input row appears exactly once in the output.
#[must_use]
pub fn build_comment_tree(comments: Vec<CommentView>) -> Vec<CommentNode> {
    let index: HashMap<String, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.comment.id.clone(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (i, c) in comments.iter().enumerate() {
        match c
            .comment
            .parent_id
            .as_ref()
            .and_then(|p| index.get(p))
            .filter(|&&parent| parent != i)
        {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    let mut slots: Vec<Option<CommentView>> = comments.into_iter().map(Some).collect();
    let mut forest: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|i| take_subtree(i, 0, &mut slots, &children))
        .collect();

    // Parent cycles are unreachable from any root
    for i in 0..slots.len() {
        if let Some(node) = take_subtree(i, 0, &mut slots, &children) {
            forest.push(node);
        }
    }

    forest
}

fn take_subtree(
    i: usize,
    depth: usize,
    slots: &mut [Option<CommentView>],
    children: &[Vec<usize>],
) -> Option<CommentNode> {
    let comment = slots[i].take()?;
    let replies = children[i]
        .iter()
        .filter_map(|&child| take_subtree(child, depth + 1, slots, children))
        .collect();

    Some(CommentNode {
        comment,
        depth,
        can_reply: depth < MAX_REPLY_DEPTH,
        replies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::views::fixtures;

    fn view(id: &str, parent: Option<&str>) -> CommentView {
        CommentView {
            comment: fixtures::comment(id, "u1", parent),
            author: None,
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.comment.comment.id.as_str()).collect()
    }

    #[test]
    fn test_nests_replies_under_parents() {
        let tree = build_comment_tree(vec![
            view("a", None),
            view("b", Some("a")),
            view("c", None),
            view("d", Some("b")),
            view("e", Some("a")),
        ]);

        assert_eq!(ids(&tree), ["a", "c"]);
        assert_eq!(ids(&tree[0].replies), ["b", "e"]);
        assert_eq!(ids(&tree[0].replies[0].replies), ["d"]);
        assert_eq!(tree[0].replies[0].replies[0].depth, 2);
    }

    #[test]
    fn test_orphans_become_roots() {
        let tree = build_comment_tree(vec![view("a", Some("deleted")), view("b", Some("a"))]);

        assert_eq!(ids(&tree), ["a"]);
        assert_eq!(ids(&tree[0].replies), ["b"]);
    }

    #[test]
    fn test_every_row_appears_exactly_once() {
        let input = vec![
            view("a", None),
            view("b", Some("a")),
            view("self", Some("self")),
            view("x", Some("y")),
            view("y", Some("x")),
            view("z", Some("missing")),
        ];
        let n = input.len();

        let tree = build_comment_tree(input);
        let total: usize = tree.iter().map(CommentNode::len).sum();
        assert_eq!(total, n);
    }

    #[test]
    fn test_reply_hint_stops_at_max_depth() {
        let tree = build_comment_tree(vec![
            view("d0", None),
            view("d1", Some("d0")),
            view("d2", Some("d1")),
            view("d3", Some("d2")),
            view("d4", Some("d3")),
        ]);

        let d2 = &tree[0].replies[0].replies[0];
        assert!(d2.can_reply);
        let d3 = &d2.replies[0];
        assert!(!d3.can_reply);
        // Depth is unbounded
        assert_eq!(d3.replies[0].depth, 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_comment_tree(Vec::new()).is_empty());
    }
}
