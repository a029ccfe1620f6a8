//! External and personal link services.

use chrono::Utc;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::{
    entities::{external_link, personal_link},
    repositories::{ExternalLinkRepository, PersonalLinkRepository},
};
use futures::future::join_all;
use sea_orm::Set;
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use super::cache::{ContentCache, TAG_LINKS, TTL_STATIC};
use super::validation::non_blank;

/// Input for creating an external link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExternalLinkInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(url)]
    pub url: String,

    #[validate(length(max = 1024))]
    pub icon: Option<String>,

    #[serde(default)]
    pub order: i32,

    pub is_visible: Option<bool>,
}

/// Input for updating an external link.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateExternalLinkInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    #[validate(length(max = 1024))]
    pub icon: Option<String>,

    pub order: Option<i32>,

    pub is_visible: Option<bool>,
}

/// New position of one link.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkOrder {
    pub id: String,
    pub order: i32,
}

/// Input for creating a personal link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonalLinkInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(url)]
    pub url: String,

    #[validate(length(max = 1024))]
    pub icon: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a personal link.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePersonalLinkInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    #[validate(length(max = 1024))]
    pub icon: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub order_index: Option<i32>,
}

/// Link service for business logic.
#[derive(Clone)]
pub struct LinkService {
    external_repo: ExternalLinkRepository,
    personal_repo: PersonalLinkRepository,
    cache: ContentCache,
    id_gen: IdGenerator,
}

impl LinkService {
    /// Create a new link service.
    #[must_use]
    pub const fn new(
        external_repo: ExternalLinkRepository,
        personal_repo: PersonalLinkRepository,
        cache: ContentCache,
    ) -> Self {
        Self {
            external_repo,
            personal_repo,
            cache,
            id_gen: IdGenerator::new(),
        }
    }

    // === External links ===

    /// All external links (admin).
    pub async fn list_external(&self) -> AppResult<Vec<external_link::Model>> {
        self.external_repo.find_all().await
    }

    /// Visible external links in display order.
    pub async fn visible_external(&self) -> AppResult<Vec<external_link::Model>> {
        self.cache
            .get_or_load(
                "links:external",
                &[TAG_LINKS.to_string()],
                TTL_STATIC,
                || self.external_repo.find_visible(),
            )
            .await
    }

    /// Create an external link.
    pub async fn create_external(
        &self,
        input: CreateExternalLinkInput,
    ) -> AppResult<external_link::Model> {
        input.validate()?;

        let model = external_link::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            url: Set(input.url),
            icon: Set(non_blank(input.icon)),
            order: Set(input.order),
            is_visible: Set(input.is_visible.unwrap_or(true)),
            created_at: Set(Utc::now().into()),
        };

        let link = self.external_repo.create(model).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(link)
    }

    /// Update an external link.
    pub async fn update_external(
        &self,
        id: &str,
        input: UpdateExternalLinkInput,
    ) -> AppResult<external_link::Model> {
        input.validate()?;

        let mut active: external_link::ActiveModel = self.external_repo.get_by_id(id).await?.into();
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(url) = input.url {
            active.url = Set(url);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(non_blank(Some(icon)));
        }
        if let Some(order) = input.order {
            active.order = Set(order);
        }
        if let Some(is_visible) = input.is_visible {
            active.is_visible = Set(is_visible);
        }

        let link = self.external_repo.update(active).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(link)
    }

    /// Delete an external link.
    pub async fn delete_external(&self, id: &str) -> AppResult<()> {
        self.external_repo.get_by_id(id).await?;
        self.external_repo.delete(id).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(())
    }

    /// Apply new positions. Updates run concurrently; any failure fails the call.
    pub async fn reorder_external(&self, orders: &[LinkOrder]) -> AppResult<()> {
        let results = join_all(
            orders
                .iter()
                .map(|o| self.external_repo.set_order(&o.id, o.order)),
        )
        .await;
        self.cache.invalidate(&[TAG_LINKS]).await;

        let failures: Vec<String> = results
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();
        if !failures.is_empty() {
            error!(failed = failures.len(), errors = ?failures, "Link reorder failed");
            return Err(AppError::Internal("Failed to reorder links".to_string()));
        }
        Ok(())
    }

    // === Personal links ===

    /// All personal links in display order.
    pub async fn list_personal(&self) -> AppResult<Vec<personal_link::Model>> {
        self.personal_repo.find_all().await
    }

    /// Personal links for public pages.
    pub async fn public_personal(&self) -> AppResult<Vec<personal_link::Model>> {
        self.cache
            .get_or_load(
                "links:personal",
                &[TAG_LINKS.to_string()],
                TTL_STATIC,
                || self.personal_repo.find_all(),
            )
            .await
    }

    /// Create a personal link.
    pub async fn create_personal(
        &self,
        input: CreatePersonalLinkInput,
    ) -> AppResult<personal_link::Model> {
        input.validate()?;

        let model = personal_link::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            icon: Set(non_blank(input.icon)),
            url: Set(input.url),
            description: Set(non_blank(input.description)),
            order_index: Set(input.order_index),
            created_at: Set(Utc::now().into()),
        };

        let link = self.personal_repo.create(model).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(link)
    }

    /// Update a personal link.
    pub async fn update_personal(
        &self,
        id: &str,
        input: UpdatePersonalLinkInput,
    ) -> AppResult<personal_link::Model> {
        input.validate()?;

        let mut active: personal_link::ActiveModel = self.personal_repo.get_by_id(id).await?.into();
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(url) = input.url {
            active.url = Set(url);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(non_blank(Some(icon)));
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }

        let link = self.personal_repo.update(active).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(link)
    }

    /// Delete a personal link.
    pub async fn delete_personal(&self, id: &str) -> AppResult<()> {
        self.personal_repo.get_by_id(id).await?;
        self.personal_repo.delete(id).await?;
        self.cache.invalidate(&[TAG_LINKS]).await;
        Ok(())
    }
}
