//! Mapping from the sorted post sequence to output pages

use serde::Serialize;

use crate::content::{NavLink, Post};

/// Templates a page can be rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Template {
    Post,
    Index,
}

impl Template {
    /// Name the template is registered under
    pub fn name(self) -> &'static str {
        match self {
            Template::Post => "post.html",
            Template::Index => "index.html",
        }
    }
}

/// Per-page data computed from a post's position in the sorted sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub slug: String,
    /// The newer neighbour; absent for the newest post
    pub previous: Option<NavLink>,
    /// The older neighbour; absent for the oldest post
    pub next: Option<NavLink>,
}

/// One page to emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    /// Output path, equal to the post slug
    pub path: String,
    pub template: Template,
    pub context: PageContext,
}

/// Create one page per post.
///
/// `posts` must already be sorted newest first. `previous` is the entry one
/// position earlier in that order and `next` the entry one position later.
pub fn create_pages(posts: &[Post]) -> Vec<PageDescriptor> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| PageDescriptor {
            path: post.slug.clone(),
            template: Template::Post,
            context: PageContext {
                slug: post.slug.clone(),
                previous: i.checked_sub(1).map(|j| posts[j].nav_link()),
                next: posts.get(i + 1).map(Post::nav_link),
            },
        })
        .collect()
}

/// The landing page split: newest post featured, the rest listed
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    pub featured: Option<&'a Post>,
    pub rest: &'a [Post],
}

impl<'a> IndexView<'a> {
    /// `posts` must be sorted newest first
    pub fn new(posts: &'a [Post]) -> Self {
        match posts.split_first() {
            Some((featured, rest)) => Self {
                featured: Some(featured),
                rest,
            },
            None => Self {
                featured: None,
                rest: &[],
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{loader::sort_newest_first, parse_date_string};
    use chrono_tz::Tz;

    fn post(name: &str, date: &str) -> Post {
        let date = parse_date_string(date, Tz::UTC).unwrap();
        Post::new(format!("/{}/", name), name.to_uppercase(), date, format!("{}.md", name))
    }

    fn link(name: &str) -> Option<NavLink> {
        Some(NavLink {
            slug: format!("/{}/", name),
            title: name.to_uppercase(),
        })
    }

    fn three_posts() -> Vec<Post> {
        let mut posts = vec![
            post("a", "2021-01-01"),
            post("b", "2021-02-01"),
            post("c", "2021-03-01"),
        ];
        sort_newest_first(&mut posts);
        posts
    }

    #[test]
    fn test_three_post_neighbours() {
        let posts = three_posts();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/c/", "/b/", "/a/"]);

        let pages = create_pages(&posts);
        assert_eq!(pages.len(), 3);

        // C is the newest post
        assert_eq!(pages[0].context.previous, None);
        assert_eq!(pages[0].context.next, link("b"));

        // B sits between the newer C and the older A
        assert_eq!(pages[1].path, "/b/");
        assert_eq!(pages[1].context.slug, "/b/");
        assert_eq!(pages[1].context.previous, link("c"));
        assert_eq!(pages[1].context.next, link("a"));

        // A is the oldest post
        assert_eq!(pages[2].context.previous, link("b"));
        assert_eq!(pages[2].context.next, None);
    }

    #[test]
    fn test_page_path_is_slug() {
        let posts = three_posts();
        for (page, post) in create_pages(&posts).iter().zip(&posts) {
            assert_eq!(page.path, post.slug);
            assert_eq!(page.template, Template::Post);
            assert_eq!(page.template.name(), "post.html");
        }
    }

    #[test]
    fn test_single_post_has_no_neighbours() {
        let posts = vec![post("only", "2021-01-01")];
        let pages = create_pages(&posts);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].context.previous, None);
        assert_eq!(pages[0].context.next, None);
    }

    #[test]
    fn test_no_posts_no_pages() {
        assert!(create_pages(&[]).is_empty());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let posts = three_posts();
        assert_eq!(create_pages(&posts), create_pages(&posts));
    }

    #[test]
    fn test_index_view_features_newest() {
        let posts = three_posts();
        let view = IndexView::new(&posts);
        assert_eq!(view.featured.map(|p| p.slug.as_str()), Some("/c/"));
        let rest: Vec<_> = view.rest.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(rest, vec!["/b/", "/a/"]);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_index_view_empty() {
        let view = IndexView::new(&[]);
        assert!(view.is_empty());
        assert!(view.featured.is_none());
        assert!(view.rest.is_empty());
    }
}
