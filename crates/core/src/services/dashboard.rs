//! Admin dashboard statistics.

use folio_common::AppResult;
use folio_db::repositories::{AuthUserRepository, CommentRepository, PostRepository};
use serde::Serialize;

/// Site-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub total_comments: u64,
    pub total_views: i64,
    pub total_users: u64,
}

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    auth_user_repo: AuthUserRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        auth_user_repo: AuthUserRepository,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            auth_user_repo,
        }
    }

    /// Gather all totals concurrently.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let (total_posts, published_posts, total_comments, total_views, total_users) = tokio::try_join!(
            self.post_repo.count_all(),
            self.post_repo.count_published(),
            self.comment_repo.count_all(),
            self.post_repo.sum_views(),
            self.auth_user_repo.count_all(),
        )?;

        Ok(DashboardStats {
            total_posts,
            published_posts,
            total_comments,
            total_views,
            total_users,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_stats() {
        // try_join! polls in declaration order and the mock never yields
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(12)]])
                .append_query_results([[count_row(9)]])
                .append_query_results([[maplit::btreemap! {
                    "total" => sea_orm::Value::BigInt(Some(340)),
                }]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(30)]])
                .into_connection(),
        );
        let auth_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(4)]])
                .into_connection(),
        );

        let service = DashboardService::new(
            PostRepository::new(post_db),
            CommentRepository::new(comment_db),
            AuthUserRepository::new(auth_db),
        );
        let stats = service.stats().await.unwrap();

        assert_eq!(
            stats,
            DashboardStats {
                total_posts: 12,
                published_posts: 9,
                total_comments: 30,
                total_views: 340,
                total_users: 4,
            }
        );
    }
}
