//! Immutable post collection

use std::collections::HashMap;

use super::{query, ContentError, Post};

/// The full set of posts for one build.
///
/// Constructed once from loaded posts and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
}

impl ContentStore {
    /// Build a store, rejecting empty, unsafe or duplicate slugs
    pub fn new(posts: Vec<Post>) -> Result<Self, ContentError> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(posts.len());

        for post in &posts {
            if post.slug.is_empty() || post.slug_as_params.is_empty() {
                return Err(ContentError::EmptySlug {
                    path: post.source.clone(),
                });
            }

            if let Some(segment) = post.slug.iter().find(|s| *s == "." || *s == "..") {
                return Err(ContentError::InvalidSegment {
                    path: post.source.clone(),
                    segment: segment.clone(),
                });
            }

            if let Some(first) = seen.insert(&post.slug_as_params, &post.source) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug_as_params.clone(),
                    first: first.to_string(),
                    second: post.source.clone(),
                });
            }
        }

        Ok(Self { posts })
    }

    /// All posts, in load order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts visible to readers
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.published)
    }

    pub fn find_by_slug<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Post> {
        query::find_by_slug(&self.posts, segments)
    }

    pub fn static_params(&self) -> Vec<Vec<String>> {
        query::static_params(&self.posts)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(identifier: &str, source: &str) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Post::new(identifier, "T", date).with_source(source)
    }

    #[test]
    fn test_new_store() {
        let store = ContentStore::new(vec![post("a", "blog/a.mdx"), post("x/y", "blog/x/y.mdx")])
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_slug(&["x", "y"]).unwrap().source, "blog/x/y.mdx");
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let err = ContentStore::new(vec![post("a", "blog/a.md"), post("a", "blog/a/index.mdx")])
            .unwrap_err();
        match err {
            ContentError::DuplicateSlug {
                slug,
                first,
                second,
            } => {
                assert_eq!(slug, "a");
                assert_eq!(first, "blog/a.md");
                assert_eq!(second, "blog/a/index.mdx");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_slug_rejected() {
        let err = ContentStore::new(vec![post("/", "blog/index.md")]).unwrap_err();
        assert!(matches!(err, ContentError::EmptySlug { .. }));
    }

    #[test]
    fn test_parent_segment_rejected() {
        let err = ContentStore::new(vec![post("../etc", "blog/evil.md")]).unwrap_err();
        assert!(matches!(err, ContentError::InvalidSegment { .. }));
    }

    #[test]
    fn test_published_filter() {
        let store = ContentStore::new(vec![
            post("a", "a.md"),
            post("b", "b.md").with_published(false),
        ])
        .unwrap();
        let visible: Vec<_> = store.published().map(|p| p.slug_as_params.as_str()).collect();
        assert_eq!(visible, vec!["a"]);
        // Drafts still get a route
        assert_eq!(store.static_params().len(), 2);
    }
}
