//! Project showcase service.

use chrono::Utc;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::{project, project::ProjectCategory},
    repositories::ProjectRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::cache::{ContentCache, TAG_PROJECTS, TTL_SHOWCASE};
use super::validation::non_blank;

/// Input for creating a project.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category: ProjectCategory,

    pub icon: Option<String>,
    pub file_url: Option<String>,
    pub qr_code_url: Option<String>,

    #[validate(url)]
    pub web_url: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_published: bool,

    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a project.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category: Option<ProjectCategory>,

    pub icon: Option<String>,
    pub file_url: Option<String>,
    pub qr_code_url: Option<String>,

    #[validate(url)]
    pub web_url: Option<String>,

    pub tags: Option<Vec<String>>,

    pub is_published: Option<bool>,

    pub order_index: Option<i32>,
}

/// Where a download should send the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTarget {
    pub url: String,
}

/// Project service for business logic.
#[derive(Clone)]
pub struct ProjectService {
    project_repo: ProjectRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl ProjectService {
    /// Create a new project service.
    #[must_use]
    pub const fn new(project_repo: ProjectRepository, cache: ContentCache) -> Self {
        Self {
            project_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    /// All projects (admin).
    pub async fn list_admin(&self) -> AppResult<Vec<project::Model>> {
        self.project_repo.find_all().await
    }

    /// Published projects.
    pub async fn list_published(&self) -> AppResult<Vec<project::Model>> {
        self.cache
            .get_or_load(
                "projects:published",
                &[TAG_PROJECTS.to_string()],
                TTL_SHOWCASE,
                || self.project_repo.find_published(),
            )
            .await
    }

    /// Create a project.
    pub async fn create(&self, input: CreateProjectInput) -> AppResult<project::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = project::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            description: Set(non_blank(input.description)),
            category: Set(input.category),
            icon: Set(non_blank(input.icon)),
            file_url: Set(non_blank(input.file_url)),
            qr_code_url: Set(non_blank(input.qr_code_url)),
            web_url: Set(non_blank(input.web_url)),
            tags: Set(serde_json::json!(input.tags)),
            downloads: Set(0),
            views: Set(0),
            is_published: Set(input.is_published),
            order_index: Set(input.order_index),
            created_at: Set(now.into()),
            updated_at: Set(Some(now.into())),
        };

        let project = self.project_repo.create(model).await?;
        self.cache.invalidate(&[TAG_PROJECTS]).await;
        Ok(project)
    }

    /// Update a project.
    pub async fn update(&self, id: &str, input: UpdateProjectInput) -> AppResult<project::Model> {
        input.validate()?;

        let mut active: project::ActiveModel = self.project_repo.get_by_id(id).await?.into();
        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(non_blank(Some(icon)));
        }
        if let Some(file_url) = input.file_url {
            active.file_url = Set(non_blank(Some(file_url)));
        }
        if let Some(qr_code_url) = input.qr_code_url {
            active.qr_code_url = Set(non_blank(Some(qr_code_url)));
        }
        if let Some(web_url) = input.web_url {
            active.web_url = Set(non_blank(Some(web_url)));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(serde_json::json!(tags));
        }
        if let Some(is_published) = input.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let project = self.project_repo.update(active).await?;
        self.cache.invalidate(&[TAG_PROJECTS]).await;
        Ok(project)
    }

    /// Delete a project.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.project_repo.get_by_id(id).await?;
        self.project_repo.delete(id).await?;
        self.cache.invalidate(&[TAG_PROJECTS]).await;
        Ok(())
    }

    /// Count a download and return where it points.
    pub async fn download(&self, id: &str) -> AppResult<DownloadTarget> {
        let project = self.project_repo.get_by_id(id).await?;
        if !project.is_published {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        let url = project
            .file_url
            .or(project.web_url)
            .ok_or_else(|| AppError::BadRequest("Project has nothing to download".to_string()))?;

        self.project_repo.increment_downloads(id).await?;
        Ok(DownloadTarget { url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_project(id: &str, is_published: bool) -> project::Model {
        project::Model {
            id: id.to_string(),
            title: "Notes".to_string(),
            description: None,
            category: ProjectCategory::App,
            icon: None,
            file_url: Some("/files/projects/notes.apk".to_string()),
            qr_code_url: None,
            web_url: Some("https://notes.example.com".to_string()),
            tags: serde_json::json!([]),
            downloads: 3,
            views: 0,
            is_published,
            order_index: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_download_prefers_file_url() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_project("p1", true)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ProjectService::new(ProjectRepository::new(db), ContentCache::in_memory());
        let target = service.download("p1").await.unwrap();

        assert_eq!(target.url, "/files/projects/notes.apk");
    }

    #[tokio::test]
    async fn test_download_unpublished_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_project("p1", false)]])
                .into_connection(),
        );

        let service = ProjectService::new(ProjectRepository::new(db), ContentCache::in_memory());
        assert!(matches!(
            service.download("p1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_category_deserializes_lowercase() {
        let input: CreateProjectInput = serde_json::from_value(serde_json::json!({
            "title": "Mini",
            "category": "miniprogram",
        }))
        .unwrap();
        assert_eq!(input.category, ProjectCategory::Miniprogram);
        assert!(!input.is_published);
    }
}
