//! Reusable page components.

pub mod comment_tree;
pub mod layout;
pub mod pagination;
pub mod post_card;

pub use comment_tree::comment_section;
pub use layout::{BaseLayout, bare_layout};
pub use pagination::Pagination;
pub use post_card::{format_date, paragraphs, post_card, post_grid, tag_links, tag_list};
