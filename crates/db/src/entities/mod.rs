//! Database entities.

#![allow(missing_docs)]

pub mod auth_user;
pub mod category;
pub mod comment;
pub mod external_link;
pub mod html_module;
pub mod personal_link;
pub mod post;
pub mod post_favorite;
pub mod post_like;
pub mod profile;
pub mod project;

pub use auth_user::Entity as AuthUser;
pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use external_link::Entity as ExternalLink;
pub use html_module::Entity as HtmlModule;
pub use personal_link::Entity as PersonalLink;
pub use post::Entity as Post;
pub use post_favorite::Entity as PostFavorite;
pub use post_like::Entity as PostLike;
pub use profile::Entity as Profile;
pub use project::Entity as Project;
