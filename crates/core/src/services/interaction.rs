//! Like and favorite toggles.

use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::repositories::{PostFavoriteRepository, PostLikeRepository, PostRepository};
use serde::Serialize;
use tracing::warn;

use super::cache::{ContentCache, post_tag};
use super::pagination::{PageInfo, USER_PAGE_SIZE, page_offset};
use super::post::PostService;
use super::views::PostPage;

/// Which interaction a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Like,
    Favorite,
}

impl InteractionKind {
    /// Response field carrying the toggle state.
    #[must_use]
    pub const fn state_key(self) -> &'static str {
        match self {
            Self::Like => "liked",
            Self::Favorite => "favorited",
        }
    }

    const fn duplicate_message(self) -> &'static str {
        match self {
            Self::Like => "Already liked",
            Self::Favorite => "Already favorited",
        }
    }
}

/// Toggle state of one user on one post, with the fresh total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    pub active: bool,
    pub count: u64,
}

/// Interaction service for business logic.
#[derive(Clone)]
pub struct InteractionService {
    like_repo: PostLikeRepository,
    favorite_repo: PostFavoriteRepository,
    post_repo: PostRepository,
    post_service: PostService,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl InteractionService {
    /// Create a new interaction service.
    #[must_use]
    pub const fn new(
        like_repo: PostLikeRepository,
        favorite_repo: PostFavoriteRepository,
        post_repo: PostRepository,
        post_service: PostService,
        cache: ContentCache,
    ) -> Self {
        Self {
            like_repo,
            favorite_repo,
            post_repo,
            post_service,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    async fn exists(&self, kind: InteractionKind, slug: &str, user_id: &str) -> AppResult<bool> {
        match kind {
            InteractionKind::Like => self.like_repo.exists(slug, user_id).await,
            InteractionKind::Favorite => self.favorite_repo.exists(slug, user_id).await,
        }
    }

    async fn count(&self, kind: InteractionKind, slug: &str) -> AppResult<u64> {
        match kind {
            InteractionKind::Like => self.like_repo.count_by_post(slug).await,
            InteractionKind::Favorite => self.favorite_repo.count_by_post(slug).await,
        }
    }

    /// Rewrite the denormalized counter. Failures are logged only.
    async fn sync_counter(&self, kind: InteractionKind, slug: &str, count: u64) {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        let result = match kind {
            InteractionKind::Like => self.post_repo.set_likes_count(slug, count).await,
            InteractionKind::Favorite => self.post_repo.set_favorites_count(slug, count).await,
        };

        if let Err(e) = result {
            warn!(slug = %slug, kind = ?kind, error = %e, "Failed to sync interaction counter");
        }
        self.cache.invalidate(&[&post_tag(slug)]).await;
    }

    /// Current state for a viewer. Anonymous viewers are never active.
    pub async fn status(
        &self,
        kind: InteractionKind,
        slug: &str,
        user_id: Option<&str>,
    ) -> AppResult<ToggleState> {
        let count = self.count(kind, slug).await?;
        let active = match user_id {
            Some(user_id) => self.exists(kind, slug, user_id).await?,
            None => false,
        };
        Ok(ToggleState { active, count })
    }

    /// Add a like or favorite. Repeating it is a client error.
    pub async fn add(
        &self,
        kind: InteractionKind,
        slug: &str,
        user_id: &str,
    ) -> AppResult<ToggleState> {
        if self.post_repo.find_by_slug(slug).await?.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        if self.exists(kind, slug, user_id).await? {
            return Err(AppError::BadRequest(kind.duplicate_message().to_string()));
        }

        let id = self.id_gen.generate();
        let created = match kind {
            InteractionKind::Like => self.like_repo.create(id, slug, user_id).await.map(|_| ()),
            InteractionKind::Favorite => {
                self.favorite_repo.create(id, slug, user_id).await.map(|_| ())
            }
        };

        // A concurrent duplicate loses the unique index race
        if let Err(e) = created {
            return Err(match e {
                AppError::Conflict(msg) => AppError::BadRequest(msg),
                other => other,
            });
        }

        let count = self.count(kind, slug).await?;
        self.sync_counter(kind, slug, count).await;
        Ok(ToggleState {
            active: true,
            count,
        })
    }

    /// Remove a like or favorite. Removing a missing one is not an error.
    pub async fn remove(
        &self,
        kind: InteractionKind,
        slug: &str,
        user_id: &str,
    ) -> AppResult<ToggleState> {
        match kind {
            InteractionKind::Like => self.like_repo.delete(slug, user_id).await?,
            InteractionKind::Favorite => self.favorite_repo.delete(slug, user_id).await?,
        }

        let count = self.count(kind, slug).await?;
        self.sync_counter(kind, slug, count).await;
        Ok(ToggleState {
            active: false,
            count,
        })
    }

    /// Posts a user liked or favorited, most recent first.
    pub async fn posts_for_user(
        &self,
        kind: InteractionKind,
        user_id: &str,
        page: i64,
    ) -> AppResult<PostPage> {
        let total = match kind {
            InteractionKind::Like => self.like_repo.count_by_user(user_id).await?,
            InteractionKind::Favorite => self.favorite_repo.count_by_user(user_id).await?,
        };
        let info = PageInfo::new(total, page, USER_PAGE_SIZE);

        let Some(offset) = page_offset(page, USER_PAGE_SIZE, total) else {
            return Ok(PostPage::empty(total, page, info.total_pages));
        };

        let slugs: Vec<String> = match kind {
            InteractionKind::Like => self
                .like_repo
                .find_by_user(user_id, USER_PAGE_SIZE, offset)
                .await?
                .into_iter()
                .map(|l| l.post_slug)
                .collect(),
            InteractionKind::Favorite => self
                .favorite_repo
                .find_by_user(user_id, USER_PAGE_SIZE, offset)
                .await?
                .into_iter()
                .map(|f| f.post_slug)
                .collect(),
        };

        let mut posts = self.post_repo.find_by_slugs(&slugs).await?;
        posts.sort_by_key(|p| slugs.iter().position(|s| *s == p.slug));

        Ok(PostPage {
            posts: self.post_service.attach_views(posts).await?,
            total,
            page,
            total_pages: info.total_pages,
        })
    }
}
