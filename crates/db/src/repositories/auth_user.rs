//! Auth user repository.
//!
//! Reads the auth service's user table. Must be constructed over the
//! service connection: the public role cannot see `auth.users`.

use std::sync::Arc;

use crate::entities::{AuthUser, auth_user};
use folio_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Auth user repository for database operations.
#[derive(Clone)]
pub struct AuthUserRepository {
    db: Arc<DatabaseConnection>,
}

impl AuthUserRepository {
    /// Create a new auth user repository over the service connection.
    #[must_use]
    pub const fn new(service_db: Arc<DatabaseConnection>) -> Self {
        Self { db: service_db }
    }

    /// Find an auth user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<auth_user::Model>> {
        AuthUser::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Email address of a user, if any.
    pub async fn find_email(&self, id: &str) -> AppResult<Option<String>> {
        Ok(self.find_by_id(id).await?.and_then(|u| u.email))
    }

    /// Count all auth users.
    pub async fn count_all(&self) -> AppResult<u64> {
        AuthUser::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find auth users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<auth_user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        AuthUser::find()
            .filter(auth_user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
