//! Create a new post

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a post under the content directory and return its path.
///
/// The file name comes from `name` when given, otherwise from the
/// `new_post_name` pattern. Existing files are never overwritten.
pub fn create_post(site: &Site, title: &str, tags: &[String], name: Option<&str>) -> Result<PathBuf> {
    let now = Local::now();

    let filename = match name {
        Some(n) if n.ends_with(".md") || n.ends_with(".mdx") || n.ends_with(".markdown") => {
            n.to_string()
        }
        Some(n) => format!("{}.md", n),
        None => post_filename(&site.config.new_post_name, title, &now),
    };

    let file_path = site.content_dir.join(filename.trim_start_matches('/'));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, scaffold(title, tags, &now)?)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

/// Expand a `new_post_name` pattern such as `:year/:title.md`
fn post_filename(pattern: &str, title: &str, now: &DateTime<Local>) -> String {
    pattern
        .replace(":title", &slug::slugify(title))
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":i_month", &now.format("%-m").to_string())
        .replace(":i_day", &now.format("%-d").to_string())
}

fn scaffold(title: &str, tags: &[String], now: &DateTime<Local>) -> Result<String> {
    // JSON strings are valid YAML scalars, so quotes and colons survive
    let title = serde_json::to_string(title)?;
    let tags = serde_json::to_string(tags)?;

    Ok(format!(
        "---\ntitle: {}\ndate: {}\ntags: {}\n---\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S"),
        tags
    ))
}
