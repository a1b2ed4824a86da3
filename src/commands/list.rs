//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::content::{ContentLoader, Post};
use crate::generator::create_pages;
use crate::Site;

/// Tag names with their post counts, most used first then alphabetical
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<_> = tags
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    tags
}

/// Every path a build writes a page to
pub fn routes(posts: &[Post]) -> Vec<String> {
    std::iter::once("/".to_string())
        .chain(create_pages(posts).into_iter().map(|p| p.path))
        .collect()
}

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let posts = ContentLoader::new(site)?.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source
                );
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(&posts);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "route" | "routes" => {
            let routes = routes(&posts);
            println!("Routes ({}):", routes.len());
            for route in routes {
                println!("  {}", route);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, route",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_date_string;
    use chrono_tz::Tz;

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        let date = parse_date_string(date, Tz::UTC).unwrap();
        let mut post = Post::new(slug.to_string(), slug.to_string(), date, String::new());
        post.tags = tags.iter().map(|t| t.to_string()).collect();
        post
    }

    #[test]
    fn test_tag_counts() {
        let posts = vec![
            post("/c/", "2021-03-01", &["web", "rust"]),
            post("/b/", "2021-02-01", &["rust"]),
            post("/a/", "2021-01-01", &["css"]),
        ];
        assert_eq!(
            tag_counts(&posts),
            vec![
                ("rust".to_string(), 2),
                ("css".to_string(), 1),
                ("web".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_routes_start_with_index() {
        let posts = vec![post("/b/", "2021-02-01", &[]), post("/a/", "2021-01-01", &[])];
        assert_eq!(routes(&posts), vec!["/", "/b/", "/a/"]);
        assert_eq!(routes(&[]), vec!["/"]);
    }
}
