//! External link repository.

use std::sync::Arc;

use crate::entities::{ExternalLink, external_link};
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

/// External link repository for database operations.
#[derive(Clone)]
pub struct ExternalLinkRepository {
    db: Arc<DatabaseConnection>,
}

impl ExternalLinkRepository {
    /// Create a new external link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All links by ascending `order` (admin).
    pub async fn find_all(&self) -> AppResult<Vec<external_link::Model>> {
        ExternalLink::find()
            .order_by_asc(external_link::Column::Order)
            .order_by_asc(external_link::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Visible links by ascending `order`.
    pub async fn find_visible(&self) -> AppResult<Vec<external_link::Model>> {
        ExternalLink::find()
            .filter(external_link::Column::IsVisible.eq(true))
            .order_by_asc(external_link::Column::Order)
            .order_by_asc(external_link::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a link by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<external_link::Model> {
        ExternalLink::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Link not found".to_string()))
    }

    /// Create a new link.
    pub async fn create(
        &self,
        model: external_link::ActiveModel,
    ) -> AppResult<external_link::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a link.
    pub async fn update(
        &self,
        model: external_link::ActiveModel,
    ) -> AppResult<external_link::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        ExternalLink::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set the sort key of one link. A missing link is an error.
    pub async fn set_order(&self, id: &str, order: i32) -> AppResult<()> {
        let result = ExternalLink::update_many()
            .col_expr(external_link::Column::Order, Expr::value(order))
            .filter(external_link::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Link {id} not found")));
        }
        Ok(())
    }
}
