//! Built-in blog templates using the Tera template engine
//!
//! The layout, the post and index pages, the shared partials and the
//! stylesheet are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{NavLink, Post};
use crate::helpers::{date_xml, format_date, full_url_for, html_escape, url_for};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's HTML escaping also rewrites `/` in URLs; text fields are
        // escaped when the view data is built instead.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("style.css", include_str!("blog/style.css")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
            (
                "partials/post_item.html",
                include_str!("blog/partials/post_item.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
    pub permalink: String,
    pub stylesheet: String,
    pub copyright: String,
}

impl SiteData {
    /// `year` fills in the default copyright line
    pub fn new(config: &SiteConfig, year: i32) -> Self {
        let copyright = config
            .copyright
            .clone()
            .unwrap_or_else(|| format!("Copyright © {} {}", year, config.author));

        Self {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            author: html_escape(&config.author),
            language: config.language.clone(),
            root: url_for(config, "/"),
            permalink: full_url_for(config, "/"),
            stylesheet: url_for(config, "/css/style.css"),
            copyright: html_escape(&copyright),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub url: String,
    pub permalink: String,
    pub title: String,
    pub date: String,
    pub date_iso: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub content: String,
}

impl PostData {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        Self {
            slug: post.slug.clone(),
            url: url_for(config, &post.slug),
            permalink: full_url_for(config, &post.slug),
            title: html_escape(&post.title),
            date: format_date(&post.date, &config.date_format),
            date_iso: date_xml(&post.date),
            tags: post.tags.iter().map(|t| html_escape(t)).collect(),
            excerpt: html_escape(&post.excerpt),
            content: post.content.clone(),
        }
    }

    /// Listing entries don't need the rendered body
    pub fn summary(post: &Post, config: &SiteConfig) -> Self {
        Self {
            content: String::new(),
            ..Self::new(post, config)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl NavPost {
    pub fn new(link: &NavLink, config: &SiteConfig) -> Self {
        Self {
            title: html_escape(&link.title),
            url: url_for(config, &link.slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut names: Vec<_> = renderer.tera.get_template_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "index.html",
                "layout.html",
                "partials/footer.html",
                "partials/header.html",
                "partials/post_item.html",
                "post.html",
                "style.css",
            ]
        );
    }

    #[test]
    fn test_site_data_copyright() {
        let config = SiteConfig {
            author: "Jonah".to_string(),
            ..Default::default()
        };
        assert_eq!(SiteData::new(&config, 2021).copyright, "Copyright © 2021 Jonah");

        let config = SiteConfig {
            copyright: Some("Copyright © 2021 Jonah's website".to_string()),
            ..config
        };
        assert_eq!(
            SiteData::new(&config, 1999).copyright,
            "Copyright © 2021 Jonah&#39;s website"
        );
    }

    #[test]
    fn test_stylesheet_lists_palette_in_order() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let mut context = Context::new();
        context.insert("colors", &config.theme.colors);
        let css = renderer.render("style.css", &context).unwrap();

        let primary = css.find("--color-primary: #41393c;").unwrap();
        let accent = css.find("--color-accent: #E83F6F;").unwrap();
        assert!(primary < accent);
    }
}
