//! Post model

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A blog post, built once during content discovery
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Routable identifier, e.g. `/hello-world/`
    pub slug: String,

    /// Post title (front-matter, or the file stem)
    pub title: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Plain-text preview
    pub excerpt: String,

    /// Rendered HTML body
    pub content: String,

    /// Whether the post is marked as a draft
    pub draft: bool,

    /// Source file path relative to the content directory
    pub source: String,
}

impl Post {
    /// Create a post with empty body fields
    pub fn new(slug: String, title: String, date: DateTime<FixedOffset>, source: String) -> Self {
        Self {
            slug,
            title,
            date,
            tags: Vec::new(),
            excerpt: String::new(),
            content: String::new(),
            draft: false,
            source,
        }
    }

    /// Neighbour link data for page contexts
    pub fn nav_link(&self) -> NavLink {
        NavLink {
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

/// The slug and title of a neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}
