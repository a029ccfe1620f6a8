//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post, post::PostStatus};
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Status restriction for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Drafts and published posts.
    #[default]
    All,
    /// Published posts only.
    Published,
    /// Drafts only.
    Draft,
}

/// Sort order for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    /// Newest first by creation time.
    #[default]
    Newest,
    /// Oldest first by creation time.
    Oldest,
    /// Most viewed first.
    Views,
    /// Most commented first.
    Comments,
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive title substring, also matched as an exact tag.
    pub search: Option<String>,
    /// Status restriction.
    pub status: StatusFilter,
    /// Category slug.
    pub category: Option<String>,
    /// Exact tag.
    pub tag: Option<String>,
}

impl PostFilter {
    /// Filter for public listings.
    #[must_use]
    pub fn published() -> Self {
        Self {
            status: StatusFilter::Published,
            ..Self::default()
        }
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        match self.status {
            StatusFilter::All => {}
            StatusFilter::Published => {
                condition = condition.add(post::Column::Status.eq(PostStatus::Published));
            }
            StatusFilter::Draft => {
                condition = condition.add(post::Column::Status.eq(PostStatus::Draft));
            }
        }

        if let Some(category) = &self.category {
            condition = condition.add(post::Column::Category.eq(category.as_str()));
        }

        if let Some(tag) = &self.tag {
            condition = condition.add(tag_contains(tag));
        }

        if let Some(search) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            condition = condition.add(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((Post, post::Column::Title))))
                            .like(pattern),
                    )
                    .add(tag_equals_ignore_case(search)),
            );
        }

        condition
    }
}

/// `tags @> '["tag"]'`
fn tag_contains(tag: &str) -> SimpleExpr {
    Expr::cust_with_values(r#""post"."tags" @> $1"#, [serde_json::json!([tag])])
}

/// Any element of `tags` equal to `tag`, ignoring case.
fn tag_equals_ignore_case(tag: &str) -> SimpleExpr {
    Expr::cust_with_values(
        r#"EXISTS (SELECT 1 FROM jsonb_array_elements_text("post"."tags") AS t(tag) WHERE LOWER(t.tag) = $1)"#,
        [tag.to_lowercase()],
    )
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn apply_sort(query: Select<Post>, sort: PostSort) -> Select<Post> {
    match sort {
        PostSort::Newest => query.order_by_desc(post::Column::CreatedAt),
        PostSort::Oldest => query.order_by_asc(post::Column::CreatedAt),
        PostSort::Views => query
            .order_by_desc(post::Column::Views)
            .order_by_desc(post::Column::CreatedAt),
        PostSort::Comments => query
            .order_by_desc(post::Column::CommentsCount)
            .order_by_desc(post::Column::CreatedAt),
    }
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<post::Model>> {
        Post::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by slug, returning an error if not found.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<post::Model> {
        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Find posts by slugs. Order is unspecified.
    pub async fn find_by_slugs(&self, slugs: &[String]) -> AppResult<Vec<post::Model>> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::Slug.is_in(slugs.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| crate::write_error(e, "A post with this slug already exists"))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post by slug. Returns the number of rows removed.
    pub async fn delete_by_slug(&self, slug: &str) -> AppResult<u64> {
        let result = Post::delete_many()
            .filter(post::Column::Slug.eq(slug))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// List posts matching a filter.
    pub async fn search(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        apply_sort(Post::find().filter(filter.condition()), sort)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts matching a filter.
    pub async fn count(&self, filter: &PostFilter) -> AppResult<u64> {
        Post::find()
            .filter(filter.condition())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts in a category.
    pub async fn count_by_category(&self, category_slug: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::Category.eq(category_slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Post counts per category slug.
    pub async fn count_grouped_by_category(&self) -> AppResult<Vec<(String, i64)>> {
        Post::find()
            .select_only()
            .column(post::Column::Category)
            .column_as(Expr::col(post::Column::Id).count(), "posts_count")
            .filter(post::Column::Category.is_not_null())
            .group_by(post::Column::Category)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Published posts in a category other than `exclude_slug`, newest first.
    pub async fn find_related(
        &self,
        category_slug: &str,
        exclude_slug: &str,
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::Status.eq(PostStatus::Published))
            .filter(post::Column::Category.eq(category_slug))
            .filter(post::Column::Slug.ne(exclude_slug))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All published posts, newest publication first.
    pub async fn find_published_for_archive(&self) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::Status.eq(PostStatus::Published))
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tag arrays of every published post.
    pub async fn find_published_tags(&self) -> AppResult<Vec<serde_json::Value>> {
        Post::find()
            .select_only()
            .column(post::Column::Tags)
            .filter(post::Column::Status.eq(PostStatus::Published))
            .into_tuple::<serde_json::Value>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the view counter atomically.
    pub async fn increment_views(&self, slug: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Slug.eq(slug))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Overwrite the denormalized comment counter.
    pub async fn set_comments_count(&self, slug: &str, count: i32) -> AppResult<()> {
        self.set_counter(slug, post::Column::CommentsCount, count)
            .await
    }

    /// Overwrite the denormalized like counter.
    pub async fn set_likes_count(&self, slug: &str, count: i32) -> AppResult<()> {
        self.set_counter(slug, post::Column::LikesCount, count).await
    }

    /// Overwrite the denormalized favorite counter.
    pub async fn set_favorites_count(&self, slug: &str, count: i32) -> AppResult<()> {
        self.set_counter(slug, post::Column::FavoritesCount, count)
            .await
    }

    async fn set_counter(&self, slug: &str, column: post::Column, count: i32) -> AppResult<()> {
        Post::update_many()
            .col_expr(column, Expr::value(count))
            .filter(post::Column::Slug.eq(slug))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Count all posts.
    pub async fn count_all(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count published posts.
    pub async fn count_published(&self) -> AppResult<u64> {
        self.count(&PostFilter::published()).await
    }

    /// Sum of views across all posts.
    pub async fn sum_views(&self) -> AppResult<i64> {
        #[derive(FromQueryResult)]
        struct SumResult {
            total: Option<i64>,
        }

        let result = Post::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(views), 0)::BIGINT"), "total")
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_post(slug: &str, status: PostStatus) -> post::Model {
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
            category: Some("tech".to_string()),
            comments_count: 0,
            likes_count: 0,
            favorites_count: 0,
            status,
            author_id: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let post = create_test_post("hello", PostStatus::Published);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_slug("hello").await.unwrap();

        assert_eq!(result.unwrap().slug, "hello");
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_slug("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Post not found"));
    }

    #[tokio::test]
    async fn test_search_builds_case_insensitive_title_or_tag_match() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("a", PostStatus::Published)]])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        let filter = PostFilter {
            search: Some("Rust".to_string()),
            status: StatusFilter::Published,
            ..PostFilter::default()
        };
        let posts = repo.search(&filter, PostSort::Views, 10, 0).await.unwrap();
        assert_eq!(posts.len(), 1);
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("LOWER"));
        assert!(sql.contains("LIKE"));
        assert!(sql.contains("jsonb_array_elements_text"));
        assert!(sql.contains("%rust%"));
        assert!(sql.contains(r#"ORDER BY \"post\".\"views\" DESC"#));
    }

    #[tokio::test]
    async fn test_search_matches_mixed_case_tags() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        let filter = PostFilter {
            search: Some("RuSt".to_string()),
            ..PostFilter::default()
        };
        repo.search(&filter, PostSort::Newest, 10, 0).await.unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("LOWER(t.tag)"));
        assert!(!sql.contains("RuSt"));
        assert!(!sql.contains("@>"));
    }

    #[test]
    fn test_search_ignores_blank_search_term() {
        let filter = PostFilter {
            search: Some("   ".to_string()),
            ..PostFilter::default()
        };
        assert!(filter.condition().is_empty());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
    }

    #[tokio::test]
    async fn test_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(23)),
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let count = repo.count(&PostFilter::published()).await.unwrap();

        assert_eq!(count, 23);
    }

    #[tokio::test]
    async fn test_delete_by_slug_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert_eq!(repo.delete_by_slug("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(repo.increment_views("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_sum_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "total" => sea_orm::Value::BigInt(Some(1234)),
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert_eq!(repo.sum_views().await.unwrap(), 1234);
    }
}
