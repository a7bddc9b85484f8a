//! Content module - posts, their compilation, storage and queries

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod query;
mod store;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{split_slug, Post};
pub use store::ContentStore;
