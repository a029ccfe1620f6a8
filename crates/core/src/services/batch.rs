//! Batch operations over posts.

use chrono::Utc;
use folio_common::{AppError, AppResult};
use folio_db::{entities::post::PostStatus, repositories::PostRepository};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cache::{ContentCache, TAG_CATEGORIES, TAG_POSTS, post_tag};
use super::post::apply_status;

/// Most slugs accepted in one batch.
pub const MAX_BATCH_SIZE: usize = 100;

/// Operation applied to every slug in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Delete,
    Publish,
    Unpublish,
}

/// Raw batch request body.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub action: Option<String>,
    #[serde(default)]
    pub slugs: Value,
}

/// One failed slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub slug: String,
    pub error: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<BatchFailure>>,
}

fn parse_action(raw: Option<&str>) -> AppResult<BatchAction> {
    match raw.map(str::trim) {
        Some("delete") => Ok(BatchAction::Delete),
        Some("publish") => Ok(BatchAction::Publish),
        Some("unpublish") => Ok(BatchAction::Unpublish),
        _ => Err(AppError::BadRequest(
            "Invalid action. Must be one of: delete, publish, unpublish".to_string(),
        )),
    }
}

/// Validate the slug list before any work is done.
pub fn parse_slugs(slugs: &Value) -> AppResult<Vec<String>> {
    let Some(items) = slugs.as_array() else {
        return Err(AppError::BadRequest("slugs must be an array".to_string()));
    };
    if items.is_empty() {
        return Err(AppError::BadRequest("slugs must not be empty".to_string()));
    }
    if items.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "Cannot process more than {MAX_BATCH_SIZE} posts at once"
        )));
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| AppError::BadRequest("slugs must be strings".to_string()))
        })
        .collect()
}

/// Batch service for business logic.
#[derive(Clone)]
pub struct BatchService {
    post_repo: PostRepository,
    cache: ContentCache,
}

impl BatchService {
    /// Create a new batch service.
    #[must_use]
    pub const fn new(post_repo: PostRepository, cache: ContentCache) -> Self {
        Self { post_repo, cache }
    }

    async fn apply(&self, action: BatchAction, slug: &str) -> AppResult<()> {
        match action {
            BatchAction::Delete => {
                if self.post_repo.delete_by_slug(slug).await? == 0 {
                    return Err(AppError::NotFound("Post not found".to_string()));
                }
            }
            BatchAction::Publish | BatchAction::Unpublish => {
                let current = self
                    .post_repo
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

                let status = if action == BatchAction::Publish {
                    PostStatus::Published
                } else {
                    PostStatus::Draft
                };
                let mut active: folio_db::entities::post::ActiveModel = current.clone().into();
                apply_status(&mut active, &current, status);
                active.updated_at = sea_orm::Set(Utc::now().into());
                self.post_repo.update(active).await?;
            }
        }
        Ok(())
    }

    /// Run a batch request. Every slug is processed independently.
    pub async fn execute(&self, request: BatchRequest) -> AppResult<BatchReport> {
        let action = parse_action(request.action.as_deref())?;
        let slugs = parse_slugs(&request.slugs)?;

        let results = join_all(slugs.iter().map(|slug| self.apply(action, slug))).await;

        let failures: Vec<BatchFailure> = slugs
            .iter()
            .zip(results)
            .filter_map(|(slug, result)| {
                result.err().map(|e| BatchFailure {
                    slug: slug.clone(),
                    error: e.client_message(),
                })
            })
            .collect();

        let mut tags: Vec<String> = vec![TAG_POSTS.to_string(), TAG_CATEGORIES.to_string()];
        tags.extend(slugs.iter().map(|s| post_tag(s)));
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        self.cache.invalidate(&tags).await;

        let total = slugs.len();
        let failed = failures.len();
        Ok(BatchReport {
            total,
            successful: total - failed,
            failed,
            failures: (!failures.is_empty()).then_some(failures),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::views::fixtures;
    use folio_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_slugs_limits() {
        let too_many: Vec<String> = (0..=MAX_BATCH_SIZE).map(|i| format!("p{i}")).collect();
        assert!(matches!(
            parse_slugs(&json!(too_many)),
            Err(AppError::BadRequest(_))
        ));

        let exact: Vec<String> = (0..MAX_BATCH_SIZE).map(|i| format!("p{i}")).collect();
        assert_eq!(parse_slugs(&json!(exact)).unwrap().len(), MAX_BATCH_SIZE);

        assert!(parse_slugs(&json!("a,b")).is_err());
        assert!(parse_slugs(&json!([])).is_err());
        assert!(parse_slugs(&json!(["a", 1])).is_err());
        assert!(parse_slugs(&Value::Null).is_err());
    }

    #[tokio::test]
    async fn test_oversized_batch_does_no_work() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = BatchService::new(PostRepository::new(db.clone()), ContentCache::in_memory());

        let slugs: Vec<String> = (0..=MAX_BATCH_SIZE).map(|i| format!("p{i}")).collect();
        let result = service
            .execute(BatchRequest {
                action: Some("delete".to_string()),
                slugs: json!(slugs),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        drop(service);
        assert!(Arc::try_unwrap(db).unwrap().into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = BatchService::new(PostRepository::new(db), ContentCache::in_memory());

        let result = service
            .execute(BatchRequest {
                action: Some("archive".to_string()),
                slugs: json!(["a"]),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_publish_reports_missing_slug() {
        let draft_a = fixtures::post("a", None, post::PostStatus::Draft);
        let draft_b = fixtures::post("b", None, post::PostStatus::Draft);
        let published = |p: &post::Model| post::Model {
            status: post::PostStatus::Published,
            published: true,
            published_at: Some(Utc::now().into()),
            ..p.clone()
        };

        // The mock answers queries in arrival order; any successful row
        // satisfies an update, so only the missing lookup must come first
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![],
                    vec![draft_a.clone()],
                    vec![published(&draft_a)],
                    vec![draft_b.clone()],
                    vec![published(&draft_b)],
                ])
                .into_connection(),
        );

        let service = BatchService::new(PostRepository::new(db), ContentCache::in_memory());
        let report = service
            .execute(BatchRequest {
                action: Some("publish".to_string()),
                slugs: json!(["missing", "a", "b"]),
            })
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.failures.unwrap(),
            vec![BatchFailure {
                slug: "missing".to_string(),
                error: "Post not found".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_all_successful_omits_failures() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = BatchService::new(PostRepository::new(db), ContentCache::in_memory());
        let report = service
            .execute(BatchRequest {
                action: Some("delete".to_string()),
                slugs: json!(["a", "b"]),
            })
            .await
            .unwrap();

        assert_eq!(report.successful, 2);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("failures").is_none());
    }
}
