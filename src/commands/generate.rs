//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::{Generator, PageDescriptor};
use crate::Site;

/// Build the whole site: discover and sort posts, then render every page
pub fn run(site: &Site) -> Result<()> {
    build(site).map(|_| ())
}

/// Like [`run`], returning the page descriptors that were written
pub fn build(site: &Site) -> Result<Vec<PageDescriptor>> {
    let start = Instant::now();

    let loader = ContentLoader::new(site)?;
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(site)?;
    let pages = generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(pages)
}

/// Watch the sources and rebuild on change until the watcher stops
pub async fn watch(site: &Site) -> Result<()> {
    let site = site.clone();
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");
    tokio::task::spawn_blocking(move || watch_and_rebuild(&site, || {})).await?
}

/// Rebuild after every debounced batch of relevant changes, calling
/// `on_rebuilt` after each successful build.
///
/// Blocks the calling thread. Changes made while a build runs are queued by
/// the debouncer and trigger another build afterwards.
pub fn watch_and_rebuild(site: &Site, on_rebuilt: impl Fn()) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    for result in rx {
        match result {
            Ok(events) => {
                let changed = relevant_paths(&events);
                if changed.is_empty() {
                    continue;
                }
                for path in &changed {
                    tracing::info!("File changed: {}", path.display());
                }

                match rebuild(site) {
                    Ok(()) => {
                        tracing::info!("Regenerated successfully");
                        on_rebuilt();
                    }
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Drop editor backups and VCS noise
fn relevant_paths(events: &[DebouncedEvent]) -> Vec<&Path> {
    events
        .iter()
        .map(|e| e.path.as_path())
        .filter(|p| is_relevant(p))
        .collect()
}

fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// Reload the configuration before building so edits to `_config.yml` apply
fn rebuild(site: &Site) -> Result<()> {
    let site = Site::new(&site.base_dir)?;
    run(&site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_builds_pages_from_content_dir() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("source/pages");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("first.md"),
            "---\ntitle: First\ndate: 2021-01-01\n---\nHello",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        let pages = build(&site).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/first/");
        assert!(dir.path().join("public/first/index.html").is_file());
    }

    #[test]
    fn test_editor_noise_is_ignored() {
        assert!(is_relevant(Path::new("/site/source/pages/post.md")));
        assert!(!is_relevant(Path::new("/site/source/pages/.post.md.swp")));
        assert!(!is_relevant(Path::new("/site/source/pages/post.md~")));
        assert!(!is_relevant(Path::new("/site/.git/index")));
    }

    #[test]
    fn test_rebuild_picks_up_config_changes() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("source/pages");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("first.md"),
            "---\ntitle: First\ndate: 2021-01-01\n---\nHello",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();

        fs::write(dir.path().join("_config.yml"), "title: Renamed Blog\n").unwrap();
        rebuild(&site).unwrap();

        let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("<title>Renamed Blog</title>"));
    }

    #[test]
    fn test_failed_build_propagates() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("source/pages");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("undated.md"), "---\ntitle: Undated\n---\nHello").unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site).is_err());
        assert!(!dir.path().join("public/index.html").exists());
    }
}
