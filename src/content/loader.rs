//! Content loader - discovers posts under the content directory

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::slug::{is_post_file, slug_for};
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::error::BuildError;
use crate::helpers::plain_text_excerpt;
use crate::Site;

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
    tz: Tz,
    exclude: Vec<glob::Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Result<Self> {
        let renderer = MarkdownRenderer::with_options(&site.config.highlight);
        let tz = site.config.tz()?;
        let exclude = site.config.exclude_patterns()?;

        Ok(Self {
            site,
            renderer,
            tz,
            exclude,
        })
    }

    /// Load every post, sorted newest first.
    ///
    /// The sort is stable, so posts sharing a date keep their path order.
    /// Any unreadable post aborts the load.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        let walker = WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_post_file(path) {
                continue;
            }
            if self.is_excluded(path) {
                tracing::debug!("Excluded: {:?}", path);
                continue;
            }

            let Some(post) = self
                .load_published(path)
                .with_context(|| format!("Failed to load post {:?}", path))?
            else {
                tracing::debug!("Skipping draft: {:?}", path);
                continue;
            };

            if let Some(first) = seen.insert(post.slug.clone(), post.source.clone()) {
                return Err(BuildError::DuplicateSlug {
                    slug: post.slug,
                    first,
                    second: post.source,
                }
                .into());
            }

            posts.push(post);
        }

        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Load a single post from a file, drafts included
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;
        self.build_post(path, fm, body)
    }

    /// Like [`ContentLoader::load_post`], but hidden drafts yield `None`
    /// before their date or slug is checked
    fn load_published(&self, path: &Path) -> Result<Option<Post>> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;
        if fm.draft && !self.site.config.render_drafts {
            return Ok(None);
        }
        self.build_post(path, fm, body).map(Some)
    }

    fn build_post(&self, path: &Path, fm: FrontMatter, body: &str) -> Result<Post> {
        let slug = slug_for(&self.site.content_dir, path)?;
        let source = path
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if slug == "/" {
            return Err(BuildError::ReservedSlug { slug, file: source }.into());
        }

        let date = match fm.date.as_deref() {
            None => {
                return Err(BuildError::MissingDate {
                    path: path.to_path_buf(),
                }
                .into())
            }
            Some(value) => fm
                .parse_date(self.tz)
                .ok_or_else(|| BuildError::InvalidDate {
                    path: path.to_path_buf(),
                    value: value.to_string(),
                })?,
        };

        // Title from front-matter, falling back to the file name
        let title = fm
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Untitled")
                    .to_string()
            });

        let (more_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self.renderer.render(&full_md)?;

        let excerpt = match (&fm.excerpt, &more_md) {
            (Some(text), _) => text.split_whitespace().collect::<Vec<_>>().join(" "),
            (None, Some(md)) => self.renderer.excerpt(md, usize::MAX)?,
            (None, None) => plain_text_excerpt(&content_html, self.site.config.excerpt_length),
        };

        let mut post = Post::new(slug, title, date, source);
        post.tags = fm
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        post.excerpt = excerpt;
        post.content = content_html;
        post.draft = fm.draft;

        Ok(post)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.site.content_dir).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// Sort by date, newest first; ties keep their current order
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site_with(files: &[(&str, String)], config: SiteConfig) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), config).unwrap();
        for (rel, body) in files {
            let path = site.content_dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        (dir, site)
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let (_dir, site) = site_with(
            &[
                ("a.md", post("A", "2021-01-01")),
                ("b.md", post("B", "2021-02-01")),
                ("c.mdx", post("C", "2021-03-01")),
            ],
            SiteConfig::default(),
        );
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
        assert_eq!(posts[0].slug, "/c/");
        assert_eq!(posts[0].source, "c.mdx");
    }

    #[test]
    fn test_same_date_keeps_path_order() {
        let (_dir, site) = site_with(
            &[
                ("zeta.md", post("Zeta", "2021-01-01")),
                ("alpha.md", post("Alpha", "2021-01-01")),
                ("mid.md", post("Mid", "2021-01-01")),
            ],
            SiteConfig::default(),
        );
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default()).unwrap();
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_missing_date_aborts() {
        let (_dir, site) = site_with(
            &[("a.md", "---\ntitle: Undated\n---\nBody".to_string())],
            SiteConfig::default(),
        );
        let err = ContentLoader::new(&site).unwrap().load_posts().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MissingDate { .. })
        ));
    }

    #[test]
    fn test_invalid_date_aborts() {
        let (_dir, site) = site_with(
            &[("a.md", "---\ntitle: Odd\ndate: someday\n---\nBody".to_string())],
            SiteConfig::default(),
        );
        let err = ContentLoader::new(&site).unwrap().load_posts().unwrap_err();
        match err.downcast_ref::<BuildError>() {
            Some(BuildError::InvalidDate { value, .. }) => assert_eq!(value, "someday"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_slug_names_both_files() {
        let (_dir, site) = site_with(
            &[
                ("hello/index.md", post("One", "2021-01-01")),
                ("hello.md", post("Two", "2021-01-02")),
            ],
            SiteConfig::default(),
        );
        let err = ContentLoader::new(&site).unwrap().load_posts().unwrap_err();
        match err.downcast_ref::<BuildError>() {
            Some(BuildError::DuplicateSlug { slug, first, second }) => {
                assert_eq!(slug, "/hello/");
                // `hello/` sorts before `hello.md`, so its index is seen first
                assert_eq!(first, "hello/index.md");
                assert_eq!(second, "hello.md");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_root_index_is_reserved() {
        let (_dir, site) = site_with(&[("index.md", post("Home", "2021-01-01"))], SiteConfig::default());
        let err = ContentLoader::new(&site).unwrap().load_posts().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ReservedSlug { .. })
        ));
    }

    #[test]
    fn test_drafts_hidden_and_excludes_applied() {
        let draft = "---\ntitle: Draft\ndate: 2021-05-01\ndraft: true\n---\nWIP";
        let config = SiteConfig {
            exclude: vec!["notes/**".to_string()],
            ..Default::default()
        };
        let (_dir, site) = site_with(
            &[
                ("draft.md", draft.to_string()),
                ("notes/todo.md", post("Todo", "2021-01-01")),
                ("kept.md", post("Kept", "2021-01-01")),
                ("image.png", "not markdown".to_string()),
            ],
            config.clone(),
        );
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept"]);

        let site = Site {
            config: SiteConfig {
                render_drafts: true,
                ..config
            },
            ..site
        };
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts[0].draft);
    }

    #[test]
    fn test_unfinished_draft_does_not_abort() {
        // Drafts are skipped before their date is required
        let wip = "---\ntitle: WIP\ndraft: true\n---\nNot dated yet";
        let (_dir, site) = site_with(
            &[
                ("ok.md", post("Ok", "2021-01-01")),
                ("wip.md", wip.to_string()),
            ],
            SiteConfig::default(),
        );
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Ok"]);

        // Rendering drafts makes the missing date an error again
        let site = Site {
            config: SiteConfig {
                render_drafts: true,
                ..SiteConfig::default()
            },
            ..site
        };
        let err = ContentLoader::new(&site).unwrap().load_posts().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MissingDate { .. })
        ));
    }

    #[test]
    fn test_post_fields() {
        let body = "---\ntitle: Tagged\ndate: 2021-03-01\ntags: [rust, ' web ', '']\n---\n\nFirst paragraph.\n\n<!-- more -->\n\nSecond paragraph.\n";
        let (_dir, site) = site_with(&[("2021/tagged.md", body.to_string())], SiteConfig::default());
        let loader = ContentLoader::new(&site).unwrap();
        let post = loader
            .load_post(&site.content_dir.join("2021/tagged.md"))
            .unwrap();

        assert_eq!(post.slug, "/2021/tagged/");
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(post.excerpt, "First paragraph.");
        assert!(post.content.contains("Second paragraph."));
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2021-03-01");
        assert_eq!(post.source, "2021/tagged.md");
    }

    #[test]
    fn test_title_and_excerpt_fallbacks() {
        let long_body = "word ".repeat(60);
        let body = format!("---\ndate: 2021-03-01\n---\n\n{}", long_body);
        let config = SiteConfig {
            excerpt_length: 20,
            ..Default::default()
        };
        let (_dir, site) = site_with(&[("my-notes.md", body)], config);
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();

        assert_eq!(posts[0].title, "my-notes");
        assert_eq!(posts[0].excerpt, "word word word word…");
    }

    #[test]
    fn test_frontmatter_excerpt_wins() {
        let body = "---\ntitle: T\ndate: 2021-03-01\nexcerpt: |\n  Hand written\n  preview\n---\n\nBody text.";
        let (_dir, site) = site_with(&[("t.md", body.to_string())], SiteConfig::default());
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        assert_eq!(posts[0].excerpt, "Hand written preview");
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let date = crate::content::parse_date_string("2021-01-01", Tz::UTC).unwrap();
        let mut posts: Vec<Post> = ["x", "y"]
            .iter()
            .map(|n| Post::new(format!("/{}/", n), n.to_string(), date, format!("{}.md", n)))
            .collect();
        sort_newest_first(&mut posts);
        assert_eq!(posts[0].title, "x");
        assert_eq!(posts[1].source, "y.md");
    }
}
