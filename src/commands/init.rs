//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: My Blog
description: ''
author: John Doe
language: en
timezone: ''

# URL
url: http://example.com
root: /

# Directory
source_dir: source
base_path: pages
static_dir: static
public_dir: public

# Writing
new_post_name: ':title.md'
render_drafts: false
excerpt_length: 140
exclude: []
highlight:
  enable: true
  line_number: false
  theme: base16-ocean.dark

# Date format (Moment.js style)
date_format: MMMM DD, YYYY

# Footer text; defaults to "Copyright © <year> <author>"
# copyright: ''

# Palette written to css/style.css
theme:
  colors:
    white: '#ffffff'
    primary: '#41393c'
    accent: '#E83F6F'
    secondary: '#32936F'
    default: '#3f3f3f'
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("A site already exists at {:?}", target_dir);
    }

    let config: SiteConfig = serde_yaml::from_str(DEFAULT_CONFIG)?;
    let content_dir = target_dir
        .join(&config.source_dir)
        .join(config.base_path.trim_matches('/'));

    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(target_dir.join(&config.static_dir))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags: [welcome]
---

Welcome to your new blog! This is your very first post.

<!-- more -->

## Quick Start

### Create a new post

```bash
$ quillpost new "My New Post"
```

### Run server

```bash
$ quillpost server
```

### Generate static files

```bash
$ quillpost generate
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(content_dir.join("hello-world.md"), sample_post)?;
    tracing::info!("Initialized site in {:?}", target_dir);

    Ok(())
}
