//! Repository layer for database operations.

mod auth_user;
mod category;
mod comment;
mod external_link;
mod html_module;
mod personal_link;
mod post;
mod post_favorite;
mod post_like;
mod profile;
mod project;

pub use auth_user::AuthUserRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use external_link::ExternalLinkRepository;
pub use html_module::HtmlModuleRepository;
pub use personal_link::PersonalLinkRepository;
pub use post::{PostFilter, PostRepository, PostSort, StatusFilter};
pub use post_favorite::PostFavoriteRepository;
pub use post_like::PostLikeRepository;
pub use profile::ProfileRepository;
pub use project::ProjectRepository;
