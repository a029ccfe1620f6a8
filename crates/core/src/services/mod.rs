//! Business logic services.

#![allow(missing_docs)]

pub mod batch;
pub mod cache;
pub mod category;
pub mod comment;
pub mod comment_tree;
pub mod dashboard;
pub mod html_module;
pub mod interaction;
pub mod link;
pub mod pagination;
pub mod post;
pub mod project;
pub mod session;
pub mod upload;
pub mod user;
pub mod validation;
pub mod views;

pub use batch::{BatchFailure, BatchReport, BatchRequest, BatchService, MAX_BATCH_SIZE};
pub use cache::ContentCache;
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use comment::{CommentPage, CommentService, CreateCommentInput, UpdateCommentInput};
pub use comment_tree::{CommentNode, MAX_REPLY_DEPTH, build_comment_tree};
pub use dashboard::{DashboardService, DashboardStats};
pub use html_module::{CreateHtmlModuleInput, HtmlModuleService, UpdateHtmlModuleInput};
pub use interaction::{InteractionKind, InteractionService, ToggleState};
pub use link::{
    CreateExternalLinkInput, CreatePersonalLinkInput, LinkOrder, LinkService,
    UpdateExternalLinkInput, UpdatePersonalLinkInput,
};
pub use pagination::{PageInfo, parse_page};
pub use post::{
    AdminPostQuery, ArchiveYear, CreatePostInput, PostService, PublicPostQuery, TagCount,
    UpdatePostInput,
};
pub use project::{CreateProjectInput, DownloadTarget, ProjectService, UpdateProjectInput};
pub use session::{
    ACCESS_TOKEN_COOKIE, AuthClient, Claims, REFRESH_TOKEN_COOKIE, RefreshedSession,
    ResolvedSession, SessionService, SessionUser, SessionVerifier, TokenStatus,
};
pub use upload::{FileUpload, StoredFile, UploadService};
pub use user::{UpdateProfileInput, UpdateRoleInput, UserPage, UserRow, UserService};
pub use views::{AuthorRef, CategoryRef, CategoryView, CommentView, PostPage, PostView};
