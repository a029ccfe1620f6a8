//! User service: own profile and user administration.

use chrono::Utc;
use folio_common::{AppError, AppResult};
use folio_db::{
    entities::{profile, profile::ProfileRole},
    repositories::{AuthUserRepository, CommentRepository, PostLikeRepository, ProfileRepository},
};
use futures::future::try_join_all;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::pagination::{PageInfo, USER_PAGE_SIZE, page_offset};
use super::validation::{non_blank, validate_username};

/// Input for editing the caller's profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 3, max = 30), custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    /// Empty string clears the website.
    pub website: Option<String>,
}

/// Input for changing a user's role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleInput {
    pub role: String,
}

/// Activity counters shown next to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub comments: u64,
    pub likes: u64,
}

/// A profile with account details for administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    #[serde(flatten)]
    pub profile: profile::Model,
    pub email: Option<String>,
    pub stats: UserStats,
}

/// A page of users.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<UserRow>,
    pub total: u64,
    pub page: i64,
    pub total_pages: u64,
}

fn parse_role(raw: &str) -> AppResult<ProfileRole> {
    match raw.trim() {
        "user" => Ok(ProfileRole::User),
        "admin" => Ok(ProfileRole::Admin),
        _ => Err(AppError::BadRequest("Invalid role".to_string())),
    }
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    profile_repo: ProfileRepository,
    auth_user_repo: AuthUserRepository,
    comment_repo: CommentRepository,
    like_repo: PostLikeRepository,
}

impl UserService {
    /// Create a new user service.
    ///
    /// `auth_user_repo` must run over the service connection.
    #[must_use]
    pub const fn new(
        profile_repo: ProfileRepository,
        auth_user_repo: AuthUserRepository,
        comment_repo: CommentRepository,
        like_repo: PostLikeRepository,
    ) -> Self {
        Self {
            profile_repo,
            auth_user_repo,
            comment_repo,
            like_repo,
        }
    }

    /// The caller's profile.
    pub async fn me(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profile_repo.get_by_id(user_id).await
    }

    /// Public profile by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<profile::Model>> {
        self.profile_repo.find_by_username(username).await
    }

    /// Edit the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        let input = UpdateProfileInput {
            username: input.username.map(|u| u.trim().to_string()),
            ..input
        };
        input.validate()?;

        let website = input.website.map(|w| non_blank(Some(w)));
        if let Some(Some(url)) = &website {
            if url::Url::parse(url).is_err() {
                return Err(AppError::Validation("website must be a URL".to_string()));
            }
        }

        let mut active: profile::ActiveModel = self.profile_repo.get_by_id(user_id).await?.into();
        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(non_blank(Some(bio)));
        }
        if let Some(website) = website {
            active.website = Set(website);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.profile_repo.update(active).await
    }

    async fn enrich(&self, profile: profile::Model) -> AppResult<UserRow> {
        let (email, comments, likes) = tokio::try_join!(
            self.auth_user_repo.find_email(&profile.id),
            self.comment_repo.count_by_user(&profile.id),
            self.like_repo.count_by_user(&profile.id),
        )?;

        Ok(UserRow {
            profile,
            email,
            stats: UserStats { comments, likes },
        })
    }

    /// Users matching `search`, newest first.
    pub async fn list(&self, search: Option<&str>, page: i64) -> AppResult<UserPage> {
        let total = self.profile_repo.count_search(search).await?;
        let info = PageInfo::new(total, page, USER_PAGE_SIZE);

        let users = match page_offset(page, USER_PAGE_SIZE, total) {
            Some(offset) => {
                let profiles = self
                    .profile_repo
                    .search(search, USER_PAGE_SIZE, offset)
                    .await?;
                try_join_all(profiles.into_iter().map(|p| self.enrich(p))).await?
            }
            None => vec![],
        };

        Ok(UserPage {
            users,
            total,
            page,
            total_pages: info.total_pages,
        })
    }

    /// One user with account details.
    pub async fn get(&self, id: &str) -> AppResult<UserRow> {
        let profile = self.profile_repo.get_by_id(id).await?;
        self.enrich(profile).await
    }

    /// Change another user's role.
    pub async fn set_role(
        &self,
        acting_user_id: &str,
        target_id: &str,
        input: &UpdateRoleInput,
    ) -> AppResult<profile::Model> {
        let role = parse_role(&input.role)?;
        if acting_user_id == target_id {
            return Err(AppError::BadRequest("Cannot change your own role".to_string()));
        }

        let profile = self.profile_repo.set_role(target_id, role).await?;
        info!(target_id = %target_id, role = ?role, by = %acting_user_id, "User role changed");
        Ok(profile)
    }
}
