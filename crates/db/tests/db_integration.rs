//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `folio_test`)
//!   `TEST_DB_PASSWORD` (default: `folio_test`)
//!   `TEST_DB_NAME` (default: `folio_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Utc;
use folio_common::AppError;
use folio_db::entities::{category, post, post::PostStatus, profile, profile::ProfileRole};
use folio_db::repositories::{
    CategoryRepository, PostFilter, PostLikeRepository, PostRepository, PostSort, ProfileRepository,
};
use folio_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

async fn seed_post(db: &TestDatabase, slug: &str, title: &str, tags: serde_json::Value) {
    let now = Utc::now();
    post::ActiveModel {
        id: Set(format!("post-{slug}")),
        title: Set(title.to_string()),
        slug: Set(slug.to_string()),
        content: Set("Body".to_string()),
        excerpt: Set(None),
        cover_image: Set(None),
        published: Set(true),
        published_at: Set(Some(now.into())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        views: Set(0),
        tags: Set(tags),
        category: Set(Some("tech".to_string())),
        comments_count: Set(0),
        likes_count: Set(0),
        favorites_count: Set(0),
        status: Set(PostStatus::Published),
        author_id: Set(None),
    }
    .insert(db.connection())
    .await
    .expect("insert post");
}

async fn seed_category(db: &TestDatabase) {
    category::ActiveModel {
        id: Set("cat-tech".to_string()),
        name: Set("Tech".to_string()),
        slug: Set("tech".to_string()),
        description: Set(None),
        color: Set(None),
        icon: Set(None),
        order_index: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(db.connection())
    .await
    .expect("insert category");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_search_matches_title_or_tag() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    seed_category(&db).await;
    seed_post(&db, "intro", "Learning RUST", json!(["beginners"])).await;
    seed_post(&db, "async", "Futures explained", json!(["rust"])).await;
    seed_post(&db, "cooking", "Pasta", json!(["food"])).await;

    let repo = PostRepository::new(db.shared());
    let filter = PostFilter {
        search: Some("rust".to_string()),
        ..PostFilter::published()
    };

    let posts = repo.search(&filter, PostSort::Oldest, 10, 0).await.unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["intro", "async"]);
    assert_eq!(repo.count(&filter).await.unwrap(), 2);

    let grouped = repo.count_grouped_by_category().await.unwrap();
    assert_eq!(grouped, vec![("tech".to_string(), 3)]);

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_slug_is_conflict() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    seed_category(&db).await;

    let repo = CategoryRepository::new(db.shared());
    let duplicate = category::ActiveModel {
        id: Set("cat-other".to_string()),
        name: Set("Other".to_string()),
        slug: Set("tech".to_string()),
        description: Set(None),
        color: Set(None),
        icon: Set(None),
        order_index: Set(1),
        created_at: Set(Utc::now().into()),
    };

    let result = repo.create(duplicate).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_pair_is_unique() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    seed_category(&db).await;
    seed_post(&db, "hello", "Hello", json!([])).await;

    profile::ActiveModel {
        id: Set("u1".to_string()),
        username: Set("alice".to_string()),
        avatar_url: Set(None),
        bio: Set(None),
        website: Set(None),
        role: Set(ProfileRole::User),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(db.connection())
    .await
    .unwrap();

    let conn = db.shared();
    let likes = PostLikeRepository::new(conn.clone());
    likes.create("l1".to_string(), "hello", "u1").await.unwrap();
    let again = likes.create("l2".to_string(), "hello", "u1").await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(likes.count_by_post("hello").await.unwrap(), 1);

    let profiles = ProfileRepository::new(conn);
    assert_eq!(profiles.count_search(Some("ALI")).await.unwrap(), 1);

    db.cleanup().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
