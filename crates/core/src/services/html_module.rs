//! HTML module service.

use chrono::Utc;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::{html_module, html_module::LinkType},
    repositories::HtmlModuleRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::cache::{ContentCache, TAG_MODULES, TTL_SHOWCASE};
use super::validation::{non_blank, validate_slug};

/// Input for creating a module.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateHtmlModuleInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub content: String,

    pub category_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub link_type: LinkType,

    #[validate(url)]
    pub external_url: Option<String>,

    pub cover_image: Option<String>,

    pub is_active: Option<bool>,

    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a module.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHtmlModuleInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub content: Option<String>,

    /// Empty string clears the category.
    pub category_id: Option<String>,

    pub tags: Option<Vec<String>>,

    pub link_type: Option<LinkType>,

    /// Empty string clears the URL.
    pub external_url: Option<String>,

    pub cover_image: Option<String>,

    pub is_active: Option<bool>,

    pub order_index: Option<i32>,
}

fn check_link(link_type: LinkType, external_url: Option<&str>) -> AppResult<()> {
    if link_type == LinkType::External && external_url.is_none() {
        return Err(AppError::Validation(
            "External modules require external_url".to_string(),
        ));
    }
    Ok(())
}

/// HTML module service for business logic.
#[derive(Clone)]
pub struct HtmlModuleService {
    module_repo: HtmlModuleRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl HtmlModuleService {
    /// Create a new HTML module service.
    #[must_use]
    pub const fn new(module_repo: HtmlModuleRepository, cache: ContentCache) -> Self {
        Self {
            module_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    /// All modules (admin).
    pub async fn list_admin(&self) -> AppResult<Vec<html_module::Model>> {
        self.module_repo.find_all().await
    }

    /// Active modules for the public gallery.
    pub async fn list_active(&self) -> AppResult<Vec<html_module::Model>> {
        self.cache
            .get_or_load(
                "modules:active",
                &[TAG_MODULES.to_string()],
                TTL_SHOWCASE,
                || self.module_repo.find_active(),
            )
            .await
    }

    /// An active module shown on its own page.
    pub async fn page(&self, slug: &str) -> AppResult<Option<html_module::Model>> {
        Ok(self
            .module_repo
            .find_active_by_slug(slug)
            .await?
            .filter(|m| m.link_type == LinkType::Page))
    }

    /// Create a module.
    pub async fn create(&self, input: CreateHtmlModuleInput) -> AppResult<html_module::Model> {
        input.validate()?;

        let external_url = non_blank(input.external_url);
        check_link(input.link_type, external_url.as_deref())?;

        let now = Utc::now();
        let model = html_module::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            slug: Set(input.slug),
            description: Set(non_blank(input.description)),
            content: Set(input.content),
            category_id: Set(non_blank(input.category_id)),
            tags: Set(serde_json::json!(input.tags)),
            link_type: Set(input.link_type),
            external_url: Set(external_url),
            cover_image: Set(non_blank(input.cover_image)),
            is_active: Set(input.is_active.unwrap_or(true)),
            order_index: Set(input.order_index),
            created_at: Set(now.into()),
            updated_at: Set(Some(now.into())),
        };

        let module = self.module_repo.create(model).await?;
        self.cache.invalidate(&[TAG_MODULES]).await;
        Ok(module)
    }

    /// Update a module.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateHtmlModuleInput,
    ) -> AppResult<html_module::Model> {
        input.validate()?;

        let current = self.module_repo.get_by_id(id).await?;

        let link_type = input.link_type.unwrap_or(current.link_type);
        let external_url = match input.external_url {
            Some(url) => non_blank(Some(url)),
            None => current.external_url.clone(),
        };
        if let Some(url) = &external_url {
            if url::Url::parse(url).is_err() {
                return Err(AppError::Validation("external_url must be a URL".to_string()));
            }
        }
        check_link(link_type, external_url.as_deref())?;

        let mut active: html_module::ActiveModel = current.into();
        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(non_blank(Some(category_id)));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(serde_json::json!(tags));
        }
        if let Some(cover_image) = input.cover_image {
            active.cover_image = Set(non_blank(Some(cover_image)));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }
        active.link_type = Set(link_type);
        active.external_url = Set(external_url);
        active.updated_at = Set(Some(Utc::now().into()));

        let module = self.module_repo.update(active).await?;
        self.cache.invalidate(&[TAG_MODULES]).await;
        Ok(module)
    }

    /// Delete a module.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.module_repo.get_by_id(id).await?;
        self.module_repo.delete(id).await?;
        self.cache.invalidate(&[TAG_MODULES]).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_module(slug: &str, link_type: LinkType) -> html_module::Model {
        html_module::Model {
            id: format!("m-{slug}"),
            title: "Clock".to_string(),
            slug: slug.to_string(),
            description: None,
            content: "<p>tick</p>".to_string(),
            category_id: None,
            tags: serde_json::json!([]),
            link_type,
            external_url: None,
            cover_image: None,
            is_active: true,
            order_index: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn input(link_type: LinkType, external_url: Option<&str>) -> CreateHtmlModuleInput {
        CreateHtmlModuleInput {
            title: "Clock".to_string(),
            slug: "clock".to_string(),
            description: None,
            content: String::new(),
            category_id: None,
            tags: vec![],
            link_type,
            external_url: external_url.map(str::to_string),
            cover_image: None,
            is_active: None,
            order_index: 0,
        }
    }

    #[tokio::test]
    async fn test_external_module_requires_url() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = HtmlModuleService::new(HtmlModuleRepository::new(db), ContentCache::in_memory());

        let result = service.create(input(LinkType::External, None)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.create(input(LinkType::External, Some("  "))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_to_external_without_url() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_module("clock", LinkType::Modal)]])
                .into_connection(),
        );
        let service = HtmlModuleService::new(HtmlModuleRepository::new(db), ContentCache::in_memory());

        let result = service
            .update(
                "m-clock",
                UpdateHtmlModuleInput {
                    link_type: Some(LinkType::External),
                    ..UpdateHtmlModuleInput::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_page_only_serves_page_modules() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_module("clock", LinkType::Modal)]])
                .append_query_results([[create_test_module("about", LinkType::Page)]])
                .into_connection(),
        );
        let service = HtmlModuleService::new(HtmlModuleRepository::new(db), ContentCache::in_memory());

        assert!(service.page("clock").await.unwrap().is_none());
        assert_eq!(service.page("about").await.unwrap().unwrap().slug, "about");
    }
}
