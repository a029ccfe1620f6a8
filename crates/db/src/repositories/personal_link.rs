//! Personal link repository.

use std::sync::Arc;

use crate::entities::{PersonalLink, personal_link};
use folio_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Personal link repository for database operations.
#[derive(Clone)]
pub struct PersonalLinkRepository {
    db: Arc<DatabaseConnection>,
}

impl PersonalLinkRepository {
    /// Create a new personal link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All links in display order.
    pub async fn find_all(&self) -> AppResult<Vec<personal_link::Model>> {
        PersonalLink::find()
            .order_by_asc(personal_link::Column::OrderIndex)
            .order_by_asc(personal_link::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a link by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<personal_link::Model> {
        PersonalLink::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Link not found".to_string()))
    }

    /// Create a new link.
    pub async fn create(
        &self,
        model: personal_link::ActiveModel,
    ) -> AppResult<personal_link::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a link.
    pub async fn update(
        &self,
        model: personal_link::ActiveModel,
    ) -> AppResult<personal_link::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        PersonalLink::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<personal_link::Model>::new()])
                .into_connection(),
        );

        let repo = PersonalLinkRepository::new(db);
        assert!(matches!(
            repo.get_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
