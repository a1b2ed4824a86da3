//! Build errors surfaced by content discovery and page rendering

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid base_path {base_path:?}: {reason}")]
    InvalidBasePath {
        base_path: String,
        reason: &'static str,
    },

    #[error("{path:?} is not inside the content directory {base:?}")]
    OutsideBasePath { path: PathBuf, base: PathBuf },

    #[error("slug {slug:?} is produced by both {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("{file:?} maps to {slug:?}, which is reserved for the index page")]
    ReservedSlug { slug: String, file: String },

    #[error("{path:?} has no date in its front-matter")]
    MissingDate { path: PathBuf },

    #[error("{path:?}: cannot parse date {value:?}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error("no post found for slug {0:?}")]
    MissingPost(String),
}
