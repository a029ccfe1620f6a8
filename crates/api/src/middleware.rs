//! API middleware and shared state.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use folio_common::StorageBackend;
use folio_core::{
    ACCESS_TOKEN_COOKIE, BatchService, CategoryService, CommentService, ContentCache,
    DashboardService, HtmlModuleService, InteractionService, LinkService, PostService,
    ProjectService, SessionService, UploadService, UserService,
};
use folio_db::repositories::{
    AuthUserRepository, CategoryRepository, CommentRepository, ExternalLinkRepository,
    HtmlModuleRepository, PersonalLinkRepository, PostFavoriteRepository, PostLikeRepository,
    PostRepository, ProfileRepository, ProjectRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: PostService,
    pub category_service: CategoryService,
    pub comment_service: CommentService,
    pub interaction_service: InteractionService,
    pub batch_service: BatchService,
    pub upload_service: UploadService,
    pub link_service: LinkService,
    pub project_service: ProjectService,
    pub html_module_service: HtmlModuleService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
    pub session_service: SessionService,
}

impl AppState {
    /// Wire every service.
    ///
    /// `db` runs as the public role; `service_db` may read the auth schema.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        service_db: Arc<DatabaseConnection>,
        cache: ContentCache,
        storage: Arc<dyn StorageBackend>,
        session_service: SessionService,
    ) -> Self {
        let post_repo = PostRepository::new(Arc::clone(&db));
        let category_repo = CategoryRepository::new(Arc::clone(&db));
        let profile_repo = ProfileRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let like_repo = PostLikeRepository::new(Arc::clone(&db));
        let favorite_repo = PostFavoriteRepository::new(Arc::clone(&db));
        let external_link_repo = ExternalLinkRepository::new(Arc::clone(&db));
        let personal_link_repo = PersonalLinkRepository::new(Arc::clone(&db));
        let project_repo = ProjectRepository::new(Arc::clone(&db));
        let html_module_repo = HtmlModuleRepository::new(Arc::clone(&db));
        let auth_user_repo = AuthUserRepository::new(service_db);

        let post_service = PostService::new(
            post_repo.clone(),
            category_repo.clone(),
            profile_repo.clone(),
            cache.clone(),
        );

        Self {
            category_service: CategoryService::new(category_repo, post_repo.clone(), cache.clone()),
            comment_service: CommentService::new(
                comment_repo.clone(),
                post_repo.clone(),
                profile_repo.clone(),
                cache.clone(),
            ),
            interaction_service: InteractionService::new(
                like_repo.clone(),
                favorite_repo,
                post_repo.clone(),
                post_service.clone(),
                cache.clone(),
            ),
            batch_service: BatchService::new(post_repo.clone(), cache.clone()),
            upload_service: UploadService::new(storage, profile_repo.clone()),
            link_service: LinkService::new(external_link_repo, personal_link_repo, cache.clone()),
            project_service: ProjectService::new(project_repo, cache.clone()),
            html_module_service: HtmlModuleService::new(html_module_repo, cache),
            user_service: UserService::new(
                profile_repo,
                auth_user_repo.clone(),
                comment_repo.clone(),
                like_repo,
            ),
            dashboard_service: DashboardService::new(post_repo, comment_repo, auth_user_repo),
            post_service,
            session_service,
        }
    }
}

/// Access token from `Authorization: Bearer` or the session cookie.
#[must_use]
pub fn access_token(req: &Request<Body>) -> Option<String> {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(req.headers())
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Authentication middleware.
///
/// Inserts the [`folio_core::SessionUser`] into request extensions when the
/// token verifies. Anything else leaves the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = access_token(&req)
        && let Some(user) = state.session_service.authenticate(&token)
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
