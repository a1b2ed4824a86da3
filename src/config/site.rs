//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use crate::error::BuildError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    /// Directory under `source_dir` that holds posts; slugs are relative to it
    pub base_path: String,
    pub static_dir: String,
    pub public_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    pub new_post_name: String,
    pub render_drafts: bool,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Moment.js-style format, see [`crate::helpers::format_date`] for the tokens
    pub date_format: String,

    // Footer
    pub copyright: Option<String>,

    // Styling
    #[serde(default)]
    pub theme: ThemeConfig,

    // Unrecognised keys, reported when the file is loaded
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            base_path: "pages".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            exclude: Vec::new(),

            new_post_name: ":title.md".to_string(),
            render_drafts: false,
            excerpt_length: 140,
            highlight: HighlightConfig::default(),

            date_format: "MMMM DD, YYYY".to_string(),

            copyright: None,

            theme: ThemeConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        for key in config.unknown_keys() {
            tracing::warn!("Ignoring unknown config key `{}`", key);
        }
        Ok(config)
    }

    /// Top-level keys quillpost does not understand, sorted
    pub fn unknown_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.extra.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Compiled `exclude` globs, matched against paths relative to the content directory
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern {:?}", p))
            })
            .collect()
    }

    /// Check the settings a build depends on before any content is read
    pub fn validate(&self) -> Result<(), BuildError> {
        let base = self.base_path.trim_matches('/');
        if base.is_empty() {
            return Err(BuildError::InvalidBasePath {
                base_path: self.base_path.clone(),
                reason: "must not be empty",
            });
        }
        if Path::new(&self.base_path).is_absolute() {
            return Err(BuildError::InvalidBasePath {
                base_path: self.base_path.clone(),
                reason: "must be relative to the source directory",
            });
        }
        if Path::new(base)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(BuildError::InvalidBasePath {
                base_path: self.base_path.clone(),
                reason: "must not contain '.' or '..' segments",
            });
        }

        self.tz()?;
        Ok(())
    }

    /// Timezone used to interpret dates without an offset (UTC when unset)
    pub fn tz(&self) -> Result<Tz, BuildError> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|_| BuildError::InvalidTimezone(name.to_string()))
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub line_number: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            line_number: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Palette used to build the site stylesheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Named colors, emitted as CSS custom properties in declaration order
    pub colors: IndexMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let colors = [
            ("white", "#fff"),
            ("primary", "#41393c"),
            ("accent", "#E83F6F"),
            ("secondary", "#32936F"),
            ("default", "#3f3f3f"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { colors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.base_path, "pages");
        assert_eq!(config.excerpt_length, 140);
        assert_eq!(config.date_format, "MMMM DD, YYYY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r##"
title: Jonah's website
author: Jonah
base_path: posts
timezone: Europe/Berlin
theme:
  colors:
    primary: "#000"
    accent: "#f00"
"##;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Jonah's website");
        assert_eq!(config.base_path, "posts");
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Berlin);
        let names: Vec<_> = config.theme.colors.keys().cloned().collect();
        assert_eq!(names, vec!["primary", "accent"]);
        // untouched keys keep their defaults
        assert_eq!(config.public_dir, "public");
        assert!(config.unknown_keys().is_empty());
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let yaml = "title: T\npermalink: ':year/:title/'\ndeploy:\n  type: git\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.unknown_keys(), vec!["deploy", "permalink"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let config = SiteConfig {
            exclude: vec!["notes/**".to_string()],
            ..Default::default()
        };
        let patterns = config.exclude_patterns().unwrap();
        assert!(patterns[0].matches("notes/todo.md"));

        let config = SiteConfig {
            exclude: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(config.exclude_patterns().is_err());
    }

    #[test]
    fn test_reject_malformed_base_path() {
        for bad in ["", "/", "/abs/pages", "../pages", "pages/../.."] {
            let config = SiteConfig {
                base_path: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(BuildError::InvalidBasePath { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_nested_base_path_is_fine() {
        let config = SiteConfig {
            base_path: "content/blog/".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BuildError::InvalidTimezone(_))
        ));
    }
}
