//! Profile repository.

use std::sync::Arc;

use crate::entities::{Profile, profile, profile::ProfileRole};
use chrono::Utc;
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

const USERNAME_TAKEN: &str = "Username is already taken";

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<profile::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Find a profile by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<profile::Model>> {
        Profile::find()
            .filter(profile::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find profiles by IDs in one query.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<profile::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Profile::find()
            .filter(profile::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a profile.
    pub async fn update(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| crate::write_error(e, USERNAME_TAKEN))
    }

    /// Set the avatar URL. Returns the number of rows updated.
    pub async fn set_avatar_url(&self, id: &str, avatar_url: &str) -> AppResult<u64> {
        let result = Profile::update_many()
            .col_expr(profile::Column::AvatarUrl, Expr::value(avatar_url))
            .col_expr(profile::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(profile::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Set the role of a user.
    pub async fn set_role(&self, id: &str, role: ProfileRole) -> AppResult<profile::Model> {
        let mut active: profile::ActiveModel = self.get_by_id(id).await?.into();
        active.role = sea_orm::Set(role);
        active.updated_at = sea_orm::Set(Some(Utc::now().into()));
        self.update(active).await
    }

    fn search_condition(search: Option<&str>) -> Condition {
        let mut condition = Condition::all();
        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((Profile, profile::Column::Username))))
                    .like(pattern),
            );
        }
        condition
    }

    /// Profiles whose username contains `search`, newest first.
    pub async fn search(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<profile::Model>> {
        Profile::find()
            .filter(Self::search_condition(search))
            .order_by_desc(profile::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count profiles whose username contains `search`.
    pub async fn count_search(&self, search: Option<&str>) -> AppResult<u64> {
        Profile::find()
            .filter(Self::search_condition(search))
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

    fn create_test_profile(id: &str, username: &str, role: ProfileRole) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            username: username.to_string(),
            avatar_url: None,
            bio: None,
            website: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_profile("u1", "alice", ProfileRole::Admin),
                    create_test_profile("u2", "bob", ProfileRole::User),
                ]])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let profiles = repo
            .find_by_ids(&["u1".to_string(), "u2".to_string()])
            .await
            .unwrap();

        assert_eq!(profiles.len(), 2);
        assert!(profiles[0].is_admin());
    }

    #[tokio::test]
    async fn test_set_role() {
        let before = create_test_profile("u2", "bob", ProfileRole::User);
        let after = profile::Model {
            role: ProfileRole::Admin,
            ..before.clone()
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before]])
                .append_query_results([[after]])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let updated = repo.set_role("u2", ProfileRole::Admin).await.unwrap();

        assert!(updated.is_admin());
    }

    #[tokio::test]
    async fn test_set_role_missing_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let result = repo.set_role("ghost", ProfileRole::Admin).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_search_condition_skips_blank_terms() {
        assert!(ProfileRepository::search_condition(None).is_empty());
        assert!(ProfileRepository::search_condition(Some(" ")).is_empty());
        assert!(!ProfileRepository::search_condition(Some("Alice")).is_empty());
    }
}
