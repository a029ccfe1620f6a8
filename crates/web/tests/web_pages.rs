//! Page rendering tests over mock database connections.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use folio_api::AppState;
use folio_common::LocalStorage;
use folio_core::{ACCESS_TOKEN_COOKIE, ContentCache, SessionService, SessionVerifier};
use folio_db::entities::{
    category, post,
    post::PostStatus,
    profile::{self, ProfileRole},
};
use folio_web::{SiteInfo, WebState, app};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

fn verifier() -> SessionVerifier {
    SessionVerifier::new("test-secret", "authenticated")
}

fn session_cookie(user_id: &str) -> String {
    let verifier = verifier();
    let token = verifier.sign(&verifier.claims_for(user_id, 3600)).unwrap();
    format!("{ACCESS_TOKEN_COOKIE}={token}")
}

fn profile(id: &str, role: ProfileRole) -> profile::Model {
    profile::Model {
        id: id.to_string(),
        username: format!("user-{id}"),
        avatar_url: None,
        bio: None,
        website: None,
        role,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    }
}

fn tech_category() -> category::Model {
    category::Model {
        id: "c1".to_string(),
        name: "Tech".to_string(),
        slug: "tech".to_string(),
        description: Some("Software & hardware".to_string()),
        color: None,
        icon: None,
        order_index: 0,
        created_at: chrono::Utc::now().into(),
    }
}

fn tech_post(slug: &str, title: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id: format!("id-{slug}"),
        title: title.to_string(),
        slug: slug.to_string(),
        content: "Body".to_string(),
        excerpt: None,
        cover_image: None,
        published: true,
        published_at: Some(now.into()),
        created_at: now.into(),
        updated_at: now.into(),
        views: 0,
        tags: serde_json::json!(["rust"]),
        category: Some("tech".to_string()),
        comments_count: 0,
        likes_count: 0,
        favorites_count: 0,
        status: PostStatus::Published,
        author_id: None,
    }
}

fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
    maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn create_app(db: DatabaseConnection, service_db: DatabaseConnection) -> Router {
    let storage_dir = std::env::temp_dir().join("folio-web-tests");
    let state = AppState::new(
        Arc::new(db),
        Arc::new(service_db),
        ContentCache::in_memory(),
        Arc::new(LocalStorage::new(storage_dir, "/files".to_string())),
        SessionService::new(verifier(), None),
    );
    app(WebState {
        app: state,
        site: SiteInfo::new("Folio", "http://localhost:3000"),
    })
}

async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_admin_redirects_anonymous_visitor() {
    let response = get(create_app(empty_db(), empty_db()), "/admin", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?redirect=%2Fadmin"
    );
}

#[tokio::test]
async fn test_admin_redirects_non_admin() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![profile("u1", ProfileRole::User)]])
        .into_connection();

    let response = get(
        create_app(db, empty_db()),
        "/admin/posts",
        Some(&session_cookie("u1")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?redirect=%2Fadmin%2Fposts"
    );
}

#[tokio::test]
async fn test_dashboard_for_admin() {
    // Gate lookup first, then the totals in declaration order
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![profile("a1", ProfileRole::Admin)]])
        .append_query_results([[count_row(12)]])
        .append_query_results([[count_row(9)]])
        .append_query_results([[count_row(30)]])
        .append_query_results([[maplit::btreemap! {
            "total" => sea_orm::Value::BigInt(Some(340)),
        }]])
        .into_connection();
    let service_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(4)]])
        .into_connection();

    let response = get(
        create_app(db, service_db),
        "/admin",
        Some(&session_cookie("a1")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<title>Dashboard - Folio</title>"));
    assert!(html.contains(r#"<span class="value">340</span>"#));
    assert!(html.contains(r#"<span class="value">4</span>"#));
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<folio_db::entities::post::Model>::new()])
        .into_connection();

    let response = get(create_app(db, empty_db()), "/posts/missing", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = get(create_app(empty_db(), empty_db()), "/nowhere", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_page_lists_counts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tech_category()]])
        .append_query_results([[maplit::btreemap! {
            "category" => sea_orm::Value::from("tech"),
            "posts_count" => sea_orm::Value::BigInt(Some(5)),
        }]])
        .into_connection();

    let response = get(create_app(db, empty_db()), "/categories", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<a href="/categories/tech">Tech</a>"#));
    assert!(html.contains(" (5)"));
    assert!(html.contains("Software &amp; hardware"));
}

#[tokio::test]
async fn test_category_page_lists_its_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Category lookup, then count, page and category data for the listing
        .append_query_results([[tech_category()]])
        .append_query_results([[count_row(1)]])
        .append_query_results([[tech_post("hello-world", "Hello World")]])
        .append_query_results([[tech_category()]])
        .into_connection();

    let response = get(create_app(db, empty_db()), "/categories/tech", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h1>Tech</h1>"));
    assert!(html.contains("1 posts"));
    assert!(html.contains(r#"<h3><a href="/posts/hello-world">Hello World</a></h3>"#));
    assert!(html.contains(r#"<a href="/categories/tech">Tech</a>"#));
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let response = get(create_app(db, empty_db()), "/categories/nope", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
