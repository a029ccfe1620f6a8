//! Post favorite repository.

use std::sync::Arc;

use crate::entities::{PostFavorite, post_favorite};
use chrono::Utc;
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Post favorite repository for database operations.
#[derive(Clone)]
pub struct PostFavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl PostFavoriteRepository {
    /// Create a new post favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user favorited a post.
    pub async fn exists(&self, post_slug: &str, user_id: &str) -> AppResult<bool> {
        let found = PostFavorite::find()
            .filter(post_favorite::Column::PostSlug.eq(post_slug))
            .filter(post_favorite::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Record a favorite.
    ///
    /// A concurrent duplicate surfaces as [`AppError::Conflict`] from the
    /// unique (post, user) index.
    pub async fn create(
        &self,
        id: String,
        post_slug: &str,
        user_id: &str,
    ) -> AppResult<post_favorite::Model> {
        post_favorite::ActiveModel {
            id: Set(id),
            post_slug: Set(post_slug.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| crate::write_error(e, "Already favorited"))
    }

    /// Remove a favorite. Missing rows are not an error.
    pub async fn delete(&self, post_slug: &str, user_id: &str) -> AppResult<()> {
        PostFavorite::delete_many()
            .filter(post_favorite::Column::PostSlug.eq(post_slug))
            .filter(post_favorite::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count favorites on a post.
    pub async fn count_by_post(&self, post_slug: &str) -> AppResult<u64> {
        PostFavorite::find()
            .filter(post_favorite::Column::PostSlug.eq(post_slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Favorites by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post_favorite::Model>> {
        PostFavorite::find()
            .filter(post_favorite::Column::UserId.eq(user_id))
            .order_by_desc(post_favorite::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count favorites by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        PostFavorite::find()
            .filter(post_favorite::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_favorite(post_slug: &str, user_id: &str) -> post_favorite::Model {
        post_favorite::Model {
            id: format!("{post_slug}-{user_id}"),
            post_slug: post_slug.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_favorite("hello", "u1")]])
                .append_query_results([Vec::<post_favorite::Model>::new()])
                .into_connection(),
        );

        let repo = PostFavoriteRepository::new(db);
        assert!(repo.exists("hello", "u1").await.unwrap());
        assert!(!repo.exists("hello", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_favorite("hello", "u1")]])
                .into_connection(),
        );

        let repo = PostFavoriteRepository::new(db);
        let favorite = repo
            .create("hello-u1".to_string(), "hello", "u1")
            .await
            .unwrap();

        assert_eq!(favorite.user_id, "u1");
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_favorite("second", "u1"),
                    create_test_favorite("first", "u1"),
                ]])
                .into_connection(),
        );

        let repo = PostFavoriteRepository::new(db);
        let favorites = repo.find_by_user("u1", 10, 0).await.unwrap();

        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].post_slug, "second");
    }

    #[tokio::test]
    async fn test_count_by_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7)),
                }]])
                .into_connection(),
        );

        let repo = PostFavoriteRepository::new(db);
        assert_eq!(repo.count_by_post("hello").await.unwrap(), 7);
    }
}
