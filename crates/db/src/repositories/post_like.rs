//! Post like repository.

use std::sync::Arc;

use crate::entities::{PostLike, post_like};
use chrono::Utc;
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Post like repository for database operations.
#[derive(Clone)]
pub struct PostLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl PostLikeRepository {
    /// Create a new post like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user liked a post.
    pub async fn exists(&self, post_slug: &str, user_id: &str) -> AppResult<bool> {
        let found = PostLike::find()
            .filter(post_like::Column::PostSlug.eq(post_slug))
            .filter(post_like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Record a like.
    ///
    /// A concurrent duplicate surfaces as [`AppError::Conflict`] from the
    /// unique (post, user) index.
    pub async fn create(
        &self,
        id: String,
        post_slug: &str,
        user_id: &str,
    ) -> AppResult<post_like::Model> {
        post_like::ActiveModel {
            id: Set(id),
            post_slug: Set(post_slug.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| crate::write_error(e, "Already liked"))
    }

    /// Remove a like. Missing rows are not an error.
    pub async fn delete(&self, post_slug: &str, user_id: &str) -> AppResult<()> {
        PostLike::delete_many()
            .filter(post_like::Column::PostSlug.eq(post_slug))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes on a post.
    pub async fn count_by_post(&self, post_slug: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostSlug.eq(post_slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Likes by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post_like::Model>> {
        PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .order_by_desc(post_like::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(post_slug: &str, user_id: &str) -> post_like::Model {
        post_like::Model {
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
                .append_query_results([[create_test_like("hello", "u1")]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        assert!(repo.exists("hello", "u1").await.unwrap());
        assert!(!repo.exists("hello", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like("hello", "u1")]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        let like = repo
            .create("hello-u1".to_string(), "hello", "u1")
            .await
            .unwrap();

        assert_eq!(like.user_id, "u1");
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        assert!(repo.delete("hello", "u1").await.is_ok());
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

        let repo = PostLikeRepository::new(db);
        assert_eq!(repo.count_by_post("hello").await.unwrap(), 7);
    }
}
