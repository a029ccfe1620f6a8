//! HTML module repository.

use std::sync::Arc;

use crate::entities::{HtmlModule, html_module};
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

const SLUG_TAKEN: &str = "A module with this slug already exists";

/// HTML module repository for database operations.
#[derive(Clone)]
pub struct HtmlModuleRepository {
    db: Arc<DatabaseConnection>,
}

impl HtmlModuleRepository {
    /// Create a new HTML module repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All modules in display order (admin).
    pub async fn find_all(&self) -> AppResult<Vec<html_module::Model>> {
        HtmlModule::find()
            .order_by_asc(html_module::Column::OrderIndex)
            .order_by_desc(html_module::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active modules in display order.
    pub async fn find_active(&self) -> AppResult<Vec<html_module::Model>> {
        HtmlModule::find()
            .filter(html_module::Column::IsActive.eq(true))
            .order_by_asc(html_module::Column::OrderIndex)
            .order_by_desc(html_module::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a module by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<html_module::Model> {
        HtmlModule::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))
    }

    /// Find an active module by slug.
    pub async fn find_active_by_slug(&self, slug: &str) -> AppResult<Option<html_module::Model>> {
        HtmlModule::find()
            .filter(html_module::Column::Slug.eq(slug))
            .filter(html_module::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new module.
    pub async fn create(
        &self,
        model: html_module::ActiveModel,
    ) -> AppResult<html_module::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| crate::write_error(e, SLUG_TAKEN))
    }

    /// Update a module.
    pub async fn update(
        &self,
        model: html_module::ActiveModel,
    ) -> AppResult<html_module::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| crate::write_error(e, SLUG_TAKEN))
    }

    /// Delete a module.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        HtmlModule::delete_by_id(id)
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
    use chrono::Utc;
    use html_module::LinkType;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_active_by_slug() {
        let module = html_module::Model {
            id: "m1".to_string(),
            title: "Clock".to_string(),
            slug: "clock".to_string(),
            description: None,
            content: "<div>tick</div>".to_string(),
            category_id: None,
            tags: json!(["toy"]),
            link_type: LinkType::Page,
            external_url: None,
            cover_image: None,
            is_active: true,
            order_index: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[module]])
                .append_query_results([Vec::<html_module::Model>::new()])
                .into_connection(),
        );

        let repo = HtmlModuleRepository::new(db);
        let found = repo.find_active_by_slug("clock").await.unwrap().unwrap();
        assert_eq!(found.link_type, LinkType::Page);
        assert!(repo.find_active_by_slug("hidden").await.unwrap().is_none());
    }
}
