//! Generator module - renders pages to the public directory

mod pages;

pub use pages::{create_pages, IndexView, PageContext, PageDescriptor, Template};

use anyhow::{anyhow, Result};
use chrono::Datelike;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;
use walkdir::WalkDir;

use crate::content::slug::{asset_path_for, is_post_file};
use crate::content::Post;
use crate::error::BuildError;
use crate::templates::{NavPost, PostData, SiteData, TemplateRenderer};
use crate::Site;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    exclude: Vec<glob::Pattern>,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let exclude = site.config.exclude_patterns()?;

        Ok(Self {
            site: site.clone(),
            renderer,
            exclude,
        })
    }

    /// Generate the entire site from posts sorted newest first.
    ///
    /// Returns the page descriptors that were written.
    pub fn generate(&self, posts: &[Post]) -> Result<Vec<PageDescriptor>> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        let site_data = self.site_data(posts);
        let pages = create_pages(posts);

        // Every page is rendered before anything is written
        let mut outputs: Vec<(PathBuf, String)> = Vec::with_capacity(pages.len() + 2);
        outputs.push((public_dir.join("index.html"), self.render_index(posts, &site_data)?));

        let by_slug: HashMap<&str, &Post> = posts.iter().map(|p| (p.slug.as_str(), p)).collect();
        for page in &pages {
            let html = self.render_page(page, &by_slug, &site_data)?;
            outputs.push((page_output_path(public_dir, &page.path), html));
        }

        outputs.push((public_dir.join("css").join("style.css"), self.render_stylesheet()?));

        // Assets are copied first so generated pages win any path collision
        let mut copied = self.copy_static_assets()?;
        copied.extend(self.copy_content_assets()?);

        for (path, contents) in &outputs {
            if copied.contains(path) {
                tracing::warn!("Generated page replaces copied asset {:?}", path);
            }
            write_file(path, contents)?;
            tracing::debug!("Generated: {:?}", path);
        }

        tracing::info!("Generated {} post pages and the index", pages.len());
        Ok(pages)
    }

    /// Render the landing page; an empty post list yields the empty state
    pub fn render_index(&self, posts: &[Post], site_data: &SiteData) -> Result<String> {
        let view = IndexView::new(posts);
        let config = &self.site.config;

        let featured = view.featured.map(|p| PostData::summary(p, config));
        let listed: Vec<PostData> = view
            .rest
            .iter()
            .map(|p| PostData::summary(p, config))
            .collect();

        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("featured", &featured);
        context.insert("posts", &listed);

        self.renderer.render(Template::Index.name(), &context)
    }

    /// Render one post page, looking its post up by slug
    pub fn render_page(
        &self,
        page: &PageDescriptor,
        by_slug: &HashMap<&str, &Post>,
        site_data: &SiteData,
    ) -> Result<String> {
        let post = by_slug
            .get(page.context.slug.as_str())
            .ok_or_else(|| BuildError::MissingPost(page.context.slug.clone()))?;
        let config = &self.site.config;

        let previous = page
            .context
            .previous
            .as_ref()
            .map(|l| NavPost::new(l, config));
        let next = page.context.next.as_ref().map(|l| NavPost::new(l, config));

        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("post", &PostData::new(post, config));
        context.insert("previous", &previous);
        context.insert("next", &next);

        self.renderer.render(page.template.name(), &context)
    }

    /// Site-wide template data; the default copyright uses the newest post's year
    pub fn site_data(&self, posts: &[Post]) -> SiteData {
        let year = posts
            .first()
            .map(|p| p.date.year())
            .unwrap_or_else(|| chrono::Utc::now().year());
        SiteData::new(&self.site.config, year)
    }

    fn render_stylesheet(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("colors", &self.site.config.theme.colors);
        self.renderer.render("style.css", &context)
    }

    /// Copy the static directory to the output root
    fn copy_static_assets(&self) -> Result<HashSet<PathBuf>> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(HashSet::new());
        }

        let copied = copy_tree(static_dir, &self.site.public_dir, |path| {
            Ok(Some(path.strip_prefix(static_dir)?.to_path_buf()))
        })?;
        tracing::debug!("Copied {} static files", copied.len());
        Ok(copied)
    }

    /// Copy non-post files (images next to posts) into their post's slug directory
    fn copy_content_assets(&self) -> Result<HashSet<PathBuf>> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            return Ok(HashSet::new());
        }

        let copied = copy_tree(content_dir, &self.site.public_dir, |path| {
            let relative = path.strip_prefix(content_dir)?;
            if is_post_file(path) || self.exclude.iter().any(|p| p.matches_path(relative)) {
                return Ok(None);
            }
            Ok(Some(asset_path_for(content_dir, path)?))
        })?;
        tracing::debug!("Copied {} content assets", copied.len());
        Ok(copied)
    }
}

/// `/2021/trip/` → `<public>/2021/trip/index.html`
pub fn page_output_path(public_dir: &Path, page_path: &str) -> PathBuf {
    let clean_path = page_path.trim_matches('/');
    if clean_path.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(clean_path).join("index.html")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, contents).map_err(|e| anyhow!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}

/// Copy files under `from` to the location `dest` picks under `to`.
///
/// Hidden entries are skipped, as is every file `dest` maps to `None`.
/// Returns the destination paths written.
fn copy_tree(
    from: &Path,
    to: &Path,
    dest: impl Fn(&Path) -> Result<Option<PathBuf>>,
) -> Result<HashSet<PathBuf>> {
    let mut copied = HashSet::new();

    for entry in WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e
                    .file_name()
                    .to_str()
                    .map(|n| n.starts_with('.'))
                    .unwrap_or(false)
        })
    {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = dest(path)? else {
            continue;
        };

        let target = to.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)?;
        copied.insert(target);
    }

    Ok(copied)
}
