//! Slug assignment from a post's location under the content directory

use std::path::{Component, Path, PathBuf};

use crate::error::BuildError;

/// File extensions treated as post sources
pub const POST_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Derive the routable slug for `path`, which must live under `base`.
///
/// `base/hello-world.md` → `/hello-world/`, `base/2021/trip/index.mdx` →
/// `/2021/trip/`, `base/index.md` → `/`.
pub fn slug_for(base: &Path, path: &Path) -> Result<String, BuildError> {
    let mut segments = relative_segments(base, path)?;

    if let Some(last) = segments.pop() {
        let stem = strip_post_extension(&last);
        if stem != "index" {
            segments.push(stem.to_string());
        }
    }

    let parts = slugify_segments(&segments);
    if parts.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(format!("/{}/", parts.join("/")))
    }
}

/// Output location of a non-post file under `base`, relative to the output root.
///
/// Directories are slugified the same way as post slugs so a bundle such as
/// `My Trip/index.md` + `My Trip/pic.png` stays together under `my-trip/`.
/// The file name itself is kept.
pub fn asset_path_for(base: &Path, path: &Path) -> Result<PathBuf, BuildError> {
    let mut segments = relative_segments(base, path)?;
    let Some(file_name) = segments.pop() else {
        return Err(BuildError::OutsideBasePath {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        });
    };

    let mut out: PathBuf = slugify_segments(&segments).into_iter().collect();
    out.push(file_name);
    Ok(out)
}

fn relative_segments(base: &Path, path: &Path) -> Result<Vec<String>, BuildError> {
    let outside = || BuildError::OutsideBasePath {
        path: path.to_path_buf(),
        base: base.to_path_buf(),
    };
    let relative = path.strip_prefix(base).map_err(|_| outside())?;

    relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => Ok(part.to_string_lossy().into_owned()),
            _ => Err(outside()),
        })
        .collect()
}

fn slugify_segments(segments: &[String]) -> Vec<String> {
    segments
        .iter()
        .map(|s| slug::slugify(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check if a file is a post source
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn strip_post_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if POST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => stem,
        _ => file_name,
    }
}
