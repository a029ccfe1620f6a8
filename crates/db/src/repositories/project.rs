//! Project repository.

use std::sync::Arc;

use crate::entities::{Project, project};
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

/// Project repository for database operations.
#[derive(Clone)]
pub struct ProjectRepository {
    db: Arc<DatabaseConnection>,
}

impl ProjectRepository {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All projects in display order (admin).
    pub async fn find_all(&self) -> AppResult<Vec<project::Model>> {
        Project::find()
            .order_by_asc(project::Column::OrderIndex)
            .order_by_desc(project::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Published projects in display order.
    pub async fn find_published(&self) -> AppResult<Vec<project::Model>> {
        Project::find()
            .filter(project::Column::IsPublished.eq(true))
            .order_by_asc(project::Column::OrderIndex)
            .order_by_desc(project::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a project by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<project::Model> {
        Project::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    /// Create a new project.
    pub async fn create(&self, model: project::ActiveModel) -> AppResult<project::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a project.
    pub async fn update(&self, model: project::ActiveModel) -> AppResult<project::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a project.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Project::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the download counter atomically.
    pub async fn increment_downloads(&self, id: &str) -> AppResult<()> {
        Project::update_many()
            .col_expr(
                project::Column::Downloads,
                Expr::col(project::Column::Downloads).add(1),
            )
            .filter(project::Column::Id.eq(id))
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
    use project::ProjectCategory;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_project(id: &str, is_published: bool) -> project::Model {
        project::Model {
            id: id.to_string(),
            title: format!("Project {id}"),
            description: None,
            category: ProjectCategory::App,
            icon: None,
            file_url: Some("/files/projects/app.apk".to_string()),
            qr_code_url: None,
            web_url: None,
            tags: json!([]),
            downloads: 0,
            views: 0,
            is_published,
            order_index: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_published() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_project("p1", true)]])
                .into_connection(),
        );

        let repo = ProjectRepository::new(db);
        let projects = repo.find_published().await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].category, ProjectCategory::App);
    }

    #[tokio::test]
    async fn test_increment_downloads() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ProjectRepository::new(db);
        assert!(repo.increment_downloads("p1").await.is_ok());
    }
}
