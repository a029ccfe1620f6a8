//! Post service.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::{post, post::PostStatus},
    repositories::{
        CategoryRepository, PostFilter, PostRepository, PostSort, ProfileRepository, StatusFilter,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use super::cache::{ContentCache, TAG_CATEGORIES, TAG_POSTS, TTL_POST, TTL_POSTS, post_tag};
use super::pagination::{ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE, PageInfo, page_offset};
use super::validation::{non_blank, validate_slug};
use super::views::{PostPage, PostView, distinct};

/// Number of related posts shown under a post.
pub const RELATED_POSTS: u64 = 3;

/// Parse a sort key. Unknown keys fall back to newest.
#[must_use]
pub fn parse_sort(raw: Option<&str>) -> PostSort {
    match raw.map(str::trim) {
        Some("oldest") => PostSort::Oldest,
        Some("views") => PostSort::Views,
        Some("comments") => PostSort::Comments,
        _ => PostSort::Newest,
    }
}

/// Parse an admin status filter. Unknown values mean all.
#[must_use]
pub fn parse_status_filter(raw: Option<&str>) -> StatusFilter {
    match raw.map(str::trim) {
        Some("published") => StatusFilter::Published,
        Some("draft") => StatusFilter::Draft,
        _ => StatusFilter::All,
    }
}

fn parse_status(raw: &str) -> AppResult<PostStatus> {
    match raw.trim() {
        "draft" => Ok(PostStatus::Draft),
        "published" => Ok(PostStatus::Published),
        other => Err(AppError::Validation(format!("Invalid status: {other}"))),
    }
}

/// Admin listing query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPostQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// Public listing query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicPostQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(length(max = 500))]
    pub excerpt: Option<String>,

    #[validate(length(max = 1024))]
    pub cover_image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub category: Option<String>,

    /// `draft` or `published`. Defaults to draft.
    pub status: Option<String>,

    /// Legacy flag, used when `status` is absent.
    pub published: Option<bool>,
}

/// Input for updating a post. The slug is immutable.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,

    #[validate(length(max = 500))]
    pub excerpt: Option<String>,

    #[validate(length(max = 1024))]
    pub cover_image: Option<String>,

    pub tags: Option<Vec<String>>,

    /// Empty string clears the category.
    pub category: Option<String>,

    pub status: Option<String>,

    pub published: Option<bool>,
}

fn requested_status(status: Option<&str>, published: Option<bool>) -> AppResult<Option<PostStatus>> {
    match (status, published) {
        (Some(s), _) => parse_status(s).map(Some),
        (None, Some(true)) => Ok(Some(PostStatus::Published)),
        (None, Some(false)) => Ok(Some(PostStatus::Draft)),
        (None, None) => Ok(None),
    }
}

fn clean_tags(tags: Vec<String>) -> serde_json::Value {
    let mut seen = std::collections::HashSet::new();
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect();
    serde_json::json!(tags)
}

/// Apply a status change, stamping `published_at` on first publication.
pub fn apply_status(active: &mut post::ActiveModel, current: &post::Model, status: PostStatus) {
    active.status = Set(status);
    active.published = Set(status == PostStatus::Published);
    if status == PostStatus::Published && current.published_at.is_none() {
        active.published_at = Set(Some(Utc::now().into()));
    }
}

/// One archived post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub title: String,
    pub slug: String,
    pub date: chrono::DateTime<chrono::FixedOffset>,
}

/// Posts published in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMonth {
    pub month: u32,
    pub posts: Vec<ArchiveEntry>,
}

/// Posts published in one year, newest month first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveYear {
    pub year: i32,
    pub months: Vec<ArchiveMonth>,
}

/// Group posts by year and month of publication, both descending.
#[must_use]
pub fn group_archive(posts: Vec<post::Model>) -> Vec<ArchiveYear> {
    let mut years: BTreeMap<i32, BTreeMap<u32, Vec<ArchiveEntry>>> = BTreeMap::new();
    for p in posts {
        let date = p.published_at.unwrap_or(p.created_at);
        years
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_default()
            .push(ArchiveEntry {
                title: p.title,
                slug: p.slug,
                date,
            });
    }

    years
        .into_iter()
        .rev()
        .map(|(year, months)| ArchiveYear {
            year,
            months: months
                .into_iter()
                .rev()
                .map(|(month, mut posts)| {
                    posts.sort_by(|a, b| b.date.cmp(&a.date));
                    ArchiveMonth { month, posts }
                })
                .collect(),
        })
        .collect()
}

/// A tag and the number of published posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub count: u64,
}

/// Count tags across posts, most used first.
#[must_use]
pub fn count_tags(tag_arrays: Vec<serde_json::Value>) -> Vec<TagCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for tags in tag_arrays {
        let Some(tags) = tags.as_array() else {
            continue;
        };
        for tag in tags.iter().filter_map(serde_json::Value::as_str) {
            *counts.entry(tag.to_string()).or_default() += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    tags
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    category_repo: CategoryRepository,
    profile_repo: ProfileRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        category_repo: CategoryRepository,
        profile_repo: ProfileRepository,
        cache: ContentCache,
    ) -> Self {
        Self {
            post_repo,
            category_repo,
            profile_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve categories and authors for a batch of posts in two queries.
    pub async fn attach_views(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostView>> {
        let category_slugs = distinct(posts.iter().filter_map(|p| p.category.as_deref()));
        let author_ids = distinct(posts.iter().filter_map(|p| p.author_id.as_deref()));

        let (categories, authors) = tokio::try_join!(
            self.category_repo.find_by_slugs(&category_slugs),
            self.profile_repo.find_by_ids(&author_ids),
        )?;

        Ok(PostView::assemble(posts, &categories, &authors))
    }

    async fn page(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: i64,
        page_size: u64,
    ) -> AppResult<PostPage> {
        let total = self.post_repo.count(filter).await?;
        let info = PageInfo::new(total, page, page_size);

        let Some(offset) = page_offset(page, page_size, total) else {
            return Ok(PostPage::empty(total, page, info.total_pages));
        };

        let posts = self
            .post_repo
            .search(filter, sort, page_size, offset)
            .await?;

        Ok(PostPage {
            posts: self.attach_views(posts).await?,
            total,
            page,
            total_pages: info.total_pages,
        })
    }

    /// Admin listing over drafts and published posts.
    pub async fn list_admin(&self, query: &AdminPostQuery) -> AppResult<PostPage> {
        let filter = PostFilter {
            search: non_blank(query.search.clone()),
            status: parse_status_filter(query.status.as_deref()),
            ..PostFilter::default()
        };
        let page = super::pagination::parse_page(query.page.as_deref());

        self.page(
            &filter,
            parse_sort(query.sort.as_deref()),
            page,
            ADMIN_PAGE_SIZE,
        )
        .await
    }

    /// Public listing. Always restricted to published posts.
    pub async fn list_published(&self, query: &PublicPostQuery) -> AppResult<PostPage> {
        let filter = PostFilter {
            search: non_blank(query.search.clone()),
            category: non_blank(query.category.clone()),
            tag: non_blank(query.tag.clone()),
            ..PostFilter::published()
        };
        let sort = parse_sort(query.sort.as_deref());
        let page = super::pagination::parse_page(query.page.as_deref());

        // Free-text searches are unbounded, so they never become cache keys
        if filter.search.is_some() {
            return self.page(&filter, sort, page, PUBLIC_PAGE_SIZE).await;
        }

        let key = format!(
            "posts:list:{}:{}:{sort:?}:{page}",
            filter.category.as_deref().unwrap_or_default(),
            filter.tag.as_deref().unwrap_or_default(),
        );

        self.cache
            .get_or_load(&key, &[TAG_POSTS.to_string()], TTL_POSTS, || {
                self.page(&filter, sort, page, PUBLIC_PAGE_SIZE)
            })
            .await
    }

    /// Fetch any post by slug (admin).
    pub async fn get(&self, slug: &str) -> AppResult<PostView> {
        let post = self.post_repo.get_by_slug(slug).await?;
        let mut views = self.attach_views(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Post view assembly failed".to_string()))
    }

    /// Fetch a published post by slug.
    pub async fn get_published(&self, slug: &str) -> AppResult<Option<PostView>> {
        let key = format!("post:{slug}");
        self.cache
            .get_or_load(&key, &[post_tag(slug)], TTL_POST, || async {
                match self.post_repo.find_by_slug(slug).await? {
                    Some(post) if post.status == PostStatus::Published => {
                        Ok::<_, AppError>(self.attach_views(vec![post]).await?.pop())
                    }
                    _ => Ok(None),
                }
            })
            .await
    }

    /// Increment the view counter in the background.
    pub fn record_view(&self, slug: &str) {
        let repo = self.post_repo.clone();
        let slug = slug.to_string();
        tokio::spawn(async move {
            if let Err(e) = repo.increment_views(&slug).await {
                warn!(slug = %slug, error = %e, "Failed to record post view");
            }
        });
    }

    /// Other published posts in the same category, newest first.
    pub async fn related(&self, post: &post::Model) -> AppResult<Vec<PostView>> {
        let Some(category) = post.category.as_deref() else {
            return Ok(vec![]);
        };

        let posts = self
            .post_repo
            .find_related(category, &post.slug, RELATED_POSTS)
            .await?;
        self.attach_views(posts).await
    }

    /// Published posts grouped by year and month.
    pub async fn archive(&self) -> AppResult<Vec<ArchiveYear>> {
        self.cache
            .get_or_load("posts:archive", &[TAG_POSTS.to_string()], TTL_POSTS, || async {
                Ok::<_, AppError>(group_archive(
                    self.post_repo.find_published_for_archive().await?,
                ))
            })
            .await
    }

    /// Tags of published posts with usage counts.
    pub async fn tags(&self) -> AppResult<Vec<TagCount>> {
        self.cache
            .get_or_load("posts:tags", &[TAG_POSTS.to_string()], TTL_POSTS, || async {
                Ok::<_, AppError>(count_tags(self.post_repo.find_published_tags().await?))
            })
            .await
    }

    async fn ensure_category(&self, slug: &str) -> AppResult<()> {
        if self.category_repo.find_by_slug(slug).await?.is_none() {
            return Err(AppError::Validation(format!("Unknown category: {slug}")));
        }
        Ok(())
    }

    async fn invalidate(&self, slug: &str) {
        self.cache
            .invalidate(&[TAG_POSTS, TAG_CATEGORIES, &post_tag(slug)])
            .await;
    }

    /// Create a post.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let category = non_blank(input.category);
        if let Some(slug) = &category {
            self.ensure_category(slug).await?;
        }

        let status = requested_status(input.status.as_deref(), input.published)?
            .unwrap_or(PostStatus::Draft);
        let now = Utc::now();

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            slug: Set(input.slug.clone()),
            content: Set(input.content),
            excerpt: Set(non_blank(input.excerpt)),
            cover_image: Set(non_blank(input.cover_image)),
            published: Set(status == PostStatus::Published),
            published_at: Set((status == PostStatus::Published).then(|| now.into())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            views: Set(0),
            tags: Set(clean_tags(input.tags)),
            category: Set(category),
            comments_count: Set(0),
            likes_count: Set(0),
            favorites_count: Set(0),
            status: Set(status),
            author_id: Set(Some(author_id.to_string())),
        };

        let post = self.post_repo.create(model).await?;
        self.invalidate(&post.slug).await;
        Ok(post)
    }

    /// Update a post.
    pub async fn update(&self, slug: &str, input: UpdatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let current = self.post_repo.get_by_slug(slug).await?;
        let mut active: post::ActiveModel = current.clone().into();

        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = input.excerpt {
            active.excerpt = Set(non_blank(Some(excerpt)));
        }
        if let Some(cover_image) = input.cover_image {
            active.cover_image = Set(non_blank(Some(cover_image)));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(clean_tags(tags));
        }
        if let Some(category) = input.category {
            let category = non_blank(Some(category));
            if let Some(slug) = &category {
                self.ensure_category(slug).await?;
            }
            active.category = Set(category);
        }
        if let Some(status) = requested_status(input.status.as_deref(), input.published)? {
            apply_status(&mut active, &current, status);
        }
        active.updated_at = Set(Utc::now().into());

        let post = self.post_repo.update(active).await?;
        self.invalidate(slug).await;
        Ok(post)
    }

    /// Delete a post.
    pub async fn delete(&self, slug: &str) -> AppResult<()> {
        if self.post_repo.delete_by_slug(slug).await? == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        self.invalidate(slug).await;
        Ok(())
    }
}
