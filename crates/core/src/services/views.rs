//! View models shared by the JSON API and the rendered pages.

use std::collections::HashMap;

use folio_db::entities::{category, comment, post, profile};
use serde::{Deserialize, Serialize};

/// Category summary attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl From<&category::Model> for CategoryRef {
    fn from(c: &category::Model) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            slug: c.slug.clone(),
            color: c.color.clone(),
            icon: c.icon.clone(),
        }
    }
}

/// Public author summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl From<&profile::Model> for AuthorRef {
    fn from(p: &profile::Model) -> Self {
        Self {
            id: p.id.clone(),
            username: p.username.clone(),
            avatar_url: p.avatar_url.clone(),
        }
    }
}

/// A post with its category and author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: post::Model,
    #[serde(rename = "categoryData")]
    pub category_data: Option<CategoryRef>,
    pub author: Option<AuthorRef>,
}

impl PostView {
    /// Join posts with already-fetched categories (by slug) and authors (by id).
    #[must_use]
    pub fn assemble(
        posts: Vec<post::Model>,
        categories: &[category::Model],
        authors: &[profile::Model],
    ) -> Vec<Self> {
        let categories: HashMap<&str, &category::Model> =
            categories.iter().map(|c| (c.slug.as_str(), c)).collect();
        let authors: HashMap<&str, &profile::Model> =
            authors.iter().map(|p| (p.id.as_str(), p)).collect();

        posts
            .into_iter()
            .map(|post| {
                let category_data = post
                    .category
                    .as_deref()
                    .and_then(|slug| categories.get(slug))
                    .map(|c| CategoryRef::from(*c));
                let author = post
                    .author_id
                    .as_deref()
                    .and_then(|id| authors.get(id))
                    .map(|p| AuthorRef::from(*p));
                Self {
                    post,
                    category_data,
                    author,
                }
            })
            .collect()
    }
}

/// A page of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub total: u64,
    pub page: i64,
    pub total_pages: u64,
}

impl PostPage {
    /// A page with no rows.
    #[must_use]
    pub const fn empty(total: u64, page: i64, total_pages: u64) -> Self {
        Self {
            posts: Vec::new(),
            total,
            page,
            total_pages,
        }
    }
}

/// A comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: comment::Model,
    #[serde(rename = "user", alias = "author")]
    pub author: Option<AuthorRef>,
}

impl CommentView {
    /// Join comments with already-fetched author profiles.
    #[must_use]
    pub fn assemble(comments: Vec<comment::Model>, authors: &[profile::Model]) -> Vec<Self> {
        let authors: HashMap<&str, &profile::Model> =
            authors.iter().map(|p| (p.id.as_str(), p)).collect();

        comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(comment.user_id.as_str()).map(|p| AuthorRef::from(*p));
                Self { comment, author }
            })
            .collect()
    }
}

/// A category with its post count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: category::Model,
    pub posts_count: i64,
}

/// Distinct ids in first-seen order.
pub(crate) fn distinct<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use folio_db::entities::{category, comment, post, post::PostStatus, profile};
    use serde_json::json;

    pub fn post(slug: &str, category: Option<&str>, status: PostStatus) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: format!("id-{slug}"),
            title: format!("Title {slug}"),
            slug: slug.to_string(),
            content: "Body".to_string(),
            excerpt: None,
            cover_image: None,
            published: status == PostStatus::Published,
            published_at: (status == PostStatus::Published).then(|| now.into()),
            created_at: now.into(),
            updated_at: now.into(),
            views: 0,
            tags: json!(["rust"]),
            category: category.map(str::to_string),
            comments_count: 0,
            likes_count: 0,
            favorites_count: 0,
            status,
            author_id: Some("author".to_string()),
        }
    }

    pub fn category(id: &str, slug: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            color: Some("#3b82f6".to_string()),
            icon: None,
            order_index: 0,
            created_at: Utc::now().into(),
        }
    }

    pub fn profile(id: &str, username: &str, role: profile::ProfileRole) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            username: username.to_string(),
            avatar_url: Some(format!("/files/avatars/{id}/a.png")),
            bio: None,
            website: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    pub fn comment(id: &str, user_id: &str, parent_id: Option<&str>) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_slug: "hello".to_string(),
            user_id: user_id.to_string(),
            parent_id: parent_id.map(str::to_string),
            content: format!("Comment {id}"),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }
}
