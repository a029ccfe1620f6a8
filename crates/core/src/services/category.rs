//! Category service.

use std::collections::HashMap;

use chrono::Utc;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::category,
    repositories::{CategoryRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::cache::{ContentCache, TAG_CATEGORIES, TAG_POSTS, TTL_STATIC};
use super::validation::{non_blank, validate_slug};
use super::views::CategoryView;

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(length(max = 32))]
    pub color: Option<String>,

    #[validate(length(max = 64))]
    pub icon: Option<String>,

    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a category.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(length(max = 32))]
    pub color: Option<String>,

    #[validate(length(max = 64))]
    pub icon: Option<String>,

    pub order_index: Option<i32>,
}

/// Category service for business logic.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    post_repo: PostRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        post_repo: PostRepository,
        cache: ContentCache,
    ) -> Self {
        Self {
            category_repo,
            post_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    async fn load_with_counts(&self) -> AppResult<Vec<CategoryView>> {
        let (categories, counts) = tokio::try_join!(
            self.category_repo.find_all(),
            self.post_repo.count_grouped_by_category(),
        )?;
        let counts: HashMap<String, i64> = counts.into_iter().collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let posts_count = counts.get(&category.slug).copied().unwrap_or(0);
                CategoryView {
                    category,
                    posts_count,
                }
            })
            .collect())
    }

    /// All categories with their post counts (admin, uncached).
    pub async fn list_admin(&self) -> AppResult<Vec<CategoryView>> {
        self.load_with_counts().await
    }

    /// All categories with their post counts.
    pub async fn list(&self) -> AppResult<Vec<CategoryView>> {
        self.cache
            .get_or_load(
                "categories:all",
                &[TAG_CATEGORIES.to_string(), TAG_POSTS.to_string()],
                TTL_STATIC,
                || self.load_with_counts(),
            )
            .await
    }

    /// Find a category by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<category::Model>> {
        self.category_repo.find_by_slug(slug).await
    }

    /// Create a category.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            slug: Set(input.slug),
            description: Set(non_blank(input.description)),
            color: Set(non_blank(input.color)),
            icon: Set(non_blank(input.icon)),
            order_index: Set(input.order_index),
            created_at: Set(Utc::now().into()),
        };

        let category = self.category_repo.create(model).await?;
        self.cache.invalidate(&[TAG_CATEGORIES]).await;
        Ok(category)
    }

    /// Update a category. Renaming the slug cascades to posts.
    pub async fn update(&self, id: &str, input: UpdateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let mut active: category::ActiveModel = self.category_repo.get_by_id(id).await?.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(color) = input.color {
            active.color = Set(non_blank(Some(color)));
        }
        if let Some(icon) = input.icon {
            active.icon = Set(non_blank(Some(icon)));
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }

        let category = self.category_repo.update(active).await?;
        self.cache.invalidate(&[TAG_CATEGORIES, TAG_POSTS]).await;
        Ok(category)
    }

    /// Delete a category. Refused while posts still reference it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let category = self.category_repo.get_by_id(id).await?;

        let posts = self.post_repo.count_by_category(&category.slug).await?;
        if posts > 0 {
            return Err(AppError::BadRequest(format!(
                "Cannot delete category with {posts} posts"
            )));
        }

        self.category_repo.delete(id).await?;
        self.cache.invalidate(&[TAG_CATEGORIES]).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::views::fixtures;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn service(
        category_db: Arc<DatabaseConnection>,
        post_db: Arc<DatabaseConnection>,
    ) -> CategoryService {
        CategoryService::new(
            CategoryRepository::new(category_db),
            PostRepository::new(post_db),
            ContentCache::in_memory(),
        )
    }

    #[tokio::test]
    async fn test_delete_blocked_when_posts_exist() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::category("c1", "tech", "Tech")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(2)]])
                .into_connection(),
        );

        let service = service(category_db.clone(), post_db);
        let result = service.delete("c1").await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("2 posts")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
        drop(service);

        // Only the lookup ran; no DELETE was issued
        let log = Arc::try_unwrap(category_db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::category("c1", "tech", "Tech")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let service = service(category_db, post_db);
        assert!(service.delete("c1").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_attaches_post_counts() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    fixtures::category("c1", "tech", "Tech"),
                    fixtures::category("c2", "life", "Life"),
                ]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "category" => sea_orm::Value::from("tech"),
                    "posts_count" => sea_orm::Value::BigInt(Some(3)),
                }]])
                .into_connection(),
        );

        let service = service(category_db, post_db);
        let categories = service.list().await.unwrap();

        assert_eq!(categories[0].posts_count, 3);
        assert_eq!(categories[1].posts_count, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_slug() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db.clone(), db);

        let result = service
            .create(CreateCategoryInput {
                name: "Tech".to_string(),
                slug: "-tech".to_string(),
                description: None,
                color: None,
                icon: None,
                order_index: 0,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
