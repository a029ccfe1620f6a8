//! Comment service.

use chrono::Utc;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository, ProfileRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cache::{ContentCache, post_tag};
use super::comment_tree::{CommentNode, build_comment_tree};
use super::pagination::{ADMIN_PAGE_SIZE, PageInfo, page_offset};
use super::validation::{bounded_text, non_blank};
use super::views::{CommentView, distinct};

/// Longest accepted comment body, in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Input for creating a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentInput {
    pub post_slug: String,
    pub content: String,
    pub parent_id: Option<String>,
}

/// Input for editing a comment.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentInput {
    pub content: String,
}

/// A page of comments for moderation.
#[derive(Debug, Clone, Serialize)]
pub struct CommentPage {
    pub comments: Vec<CommentView>,
    pub total: u64,
    pub page: i64,
    pub total_pages: u64,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    profile_repo: ProfileRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        profile_repo: ProfileRepository,
        cache: ContentCache,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            profile_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    async fn attach_authors(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentView>> {
        let user_ids = distinct(comments.iter().map(|c| c.user_id.as_str()));
        let authors = self.profile_repo.find_by_ids(&user_ids).await?;
        Ok(CommentView::assemble(comments, &authors))
    }

    /// Comments on a post, flat and oldest first, with authors attached.
    pub async fn list_for_post(&self, post_slug: &str) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_post(post_slug).await?;
        self.attach_authors(comments).await
    }

    /// Comments on a post arranged as a reply tree.
    pub async fn tree_for_post(&self, post_slug: &str) -> AppResult<Vec<CommentNode>> {
        Ok(build_comment_tree(self.list_for_post(post_slug).await?))
    }

    /// Recompute the denormalized comment counter. Failures are logged only.
    async fn refresh_count(&self, post_slug: &str) {
        let result = async {
            let count = self.comment_repo.count_by_post(post_slug).await?;
            self.post_repo
                .set_comments_count(post_slug, i32::try_from(count).unwrap_or(i32::MAX))
                .await
        }
        .await;

        if let Err(e) = result {
            warn!(post_slug = %post_slug, error = %e, "Failed to refresh comment count");
        }
        self.cache.invalidate(&[&post_tag(post_slug)]).await;
    }

    /// Create a comment or a reply.
    pub async fn create(&self, user_id: &str, input: CreateCommentInput) -> AppResult<CommentView> {
        let post_slug = input.post_slug.trim().to_string();
        if post_slug.is_empty() {
            return Err(AppError::BadRequest("post_slug is required".to_string()));
        }
        let content = bounded_text(&input.content, "Content", 1, MAX_COMMENT_LENGTH)?;

        if self.post_repo.find_by_slug(&post_slug).await?.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let parent_id = non_blank(input.parent_id);
        if let Some(parent_id) = &parent_id {
            match self.comment_repo.find_by_id(parent_id).await? {
                Some(parent) if parent.post_slug == post_slug => {}
                _ => return Err(AppError::BadRequest("Invalid parent comment".to_string())),
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_slug: Set(post_slug.clone()),
            user_id: Set(user_id.to_string()),
            parent_id: Set(parent_id),
            content: Set(content),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;
        self.refresh_count(&post_slug).await;

        let mut views = self.attach_authors(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Comment view assembly failed".to_string()))
    }

    /// Edit the author's own comment.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        let content = bounded_text(&input.content, "Content", 1, MAX_COMMENT_LENGTH)?;

        let existing = self
            .comment_repo
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete the author's own comment and its replies.
    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        let existing = self
            .comment_repo
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        self.comment_repo.delete(id).await?;
        self.refresh_count(&existing.post_slug).await;
        Ok(())
    }

    /// Delete any comment (moderation).
    pub async fn delete_any(&self, id: &str) -> AppResult<()> {
        let existing = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        self.comment_repo.delete(id).await?;
        self.refresh_count(&existing.post_slug).await;
        Ok(())
    }

    /// All comments, newest first (moderation).
    pub async fn list_admin(&self, page: i64) -> AppResult<CommentPage> {
        let total = self.comment_repo.count_all().await?;
        let info = PageInfo::new(total, page, ADMIN_PAGE_SIZE);

        let comments = match page_offset(page, ADMIN_PAGE_SIZE, total) {
            Some(offset) => {
                let rows = self.comment_repo.find_all(ADMIN_PAGE_SIZE, offset).await?;
                self.attach_authors(rows).await?
            }
            None => vec![],
        };

        Ok(CommentPage {
            comments,
            total,
            page,
            total_pages: info.total_pages,
        })
    }
}
