//! Content module - discovers posts and turns them into renderable data

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod slug;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, MORE_MARKER};
pub use post::{NavLink, Post};
