//! Page renderers - turn store queries into HTML
//!
//! Renderers never touch the filesystem or the network; the generator and
//! the dev server decide where the HTML goes.

mod nav;

use anyhow::Result;
use tera::Context;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{query, ContentStore, Post};
use crate::helpers::{date_xml, post_url, url_for, validate_date_format};
use crate::templates::{PostDetail, PostSummary, SiteData, TemplateRenderer};

pub use nav::nav_links;

/// Why a post route produced no page. Readers see the same 404 for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("malformed post route")]
    Malformed,

    #[error("no post with slug `{slug}`")]
    Missing { slug: String },

    #[error("post `{slug}` exists but is not published")]
    Unpublished { slug: String },
}

/// Look up a post for public display.
///
/// Empty routes and blank segments are malformed. A post that exists but is
/// unpublished is reported separately from one that does not exist.
pub fn resolve_post<'a, S: AsRef<str>>(
    store: &'a ContentStore,
    segments: &[S],
) -> Result<&'a Post, NotFound> {
    if segments.is_empty() || segments.iter().any(|s| s.as_ref().trim().is_empty()) {
        return Err(NotFound::Malformed);
    }

    match store.find_by_slug(segments) {
        None => Err(NotFound::Missing {
            slug: segments
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join("/"),
        }),
        Some(post) if !post.published => Err(NotFound::Unpublished {
            slug: post.slug_as_params.clone(),
        }),
        Some(post) => Ok(post),
    }
}

/// Result of rendering a post route
#[derive(Debug)]
pub enum Rendered {
    Page(String),
    NotFound { reason: NotFound, html: String },
}

impl Rendered {
    pub fn is_found(&self) -> bool {
        matches!(self, Rendered::Page(_))
    }

    pub fn html(&self) -> &str {
        match self {
            Rendered::Page(html) | Rendered::NotFound { html, .. } => html,
        }
    }

    pub fn into_html(self) -> String {
        match self {
            Rendered::Page(html) | Rendered::NotFound { html, .. } => html,
        }
    }
}

/// Renders every page of the site against a content store
pub struct PageRenderer {
    config: SiteConfig,
    templates: TemplateRenderer,
}

impl PageRenderer {
    pub fn new(config: SiteConfig) -> Result<Self> {
        validate_date_format(&config.date_format)?;
        Ok(Self {
            config,
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Home page: the most recent published posts
    pub fn home(&self, store: &ContentStore) -> Result<String> {
        let latest = query::latest_n(store.published(), self.config.latest_posts);
        let posts: Vec<PostSummary> = latest.into_iter().map(|p| self.summary(p)).collect();

        let mut context = self.base_context(&url_for(&self.config, ""), None);
        context.insert("posts", &posts);
        self.templates.render("home.html", &context)
    }

    /// Blog index: every published post, newest first
    pub fn blog_index(&self, store: &ContentStore) -> Result<String> {
        let sorted = query::sort_by_date(store.published());
        let posts: Vec<PostSummary> = sorted.into_iter().map(|p| self.summary(p)).collect();

        let blog_path = url_for(&self.config, &self.config.blog_dir);
        let mut context = self.base_context(&blog_path, Some("Blog"));
        context.insert("posts", &posts);
        self.templates.render("blog.html", &context)
    }

    /// Post detail page, or the not-found page when the post is missing or hidden
    pub fn post<S: AsRef<str>>(&self, store: &ContentStore, segments: &[S]) -> Result<Rendered> {
        let post = match resolve_post(store, segments) {
            Ok(post) => post,
            Err(reason) => {
                tracing::debug!("Post route not found: {}", reason);
                let html = self.not_found()?;
                return Ok(Rendered::NotFound { reason, html });
            }
        };

        let detail = PostDetail {
            title: post.title.clone(),
            description: post.description.clone(),
            date: date_xml(&post.date),
            content: post.body.clone(),
        };

        let path = post_url(&self.config, &post.slug);
        let mut context = self.base_context(&path, Some(&post.title));
        context.insert("post", &detail);
        Ok(Rendered::Page(self.templates.render("post.html", &context)?))
    }

    /// About page from the configured author profile
    pub fn about(&self) -> Result<String> {
        let mut context = self.base_context(&url_for(&self.config, "about"), Some("About"));
        context.insert("author", &self.config.author);
        context.insert("avatar_url", &url_for(&self.config, &self.config.author.avatar));
        self.templates.render("about.html", &context)
    }

    pub fn not_found(&self) -> Result<String> {
        let context = self.base_context("", Some("Not Found"));
        self.templates.render("404.html", &context)
    }

    fn base_context(&self, current_path: &str, page_title: Option<&str>) -> Context {
        let site = SiteData {
            title: self.config.title.clone(),
            tagline: self.config.tagline.clone(),
            description: self.config.description.clone(),
            url: self.config.url.clone(),
            root: url_for(&self.config, ""),
            date_format: self.config.date_format.clone(),
        };

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("nav", &nav_links(&self.config, current_path));
        context.insert("current_path", current_path);
        context.insert("page_title", &page_title);
        context
    }

    fn summary(&self, post: &Post) -> PostSummary {
        PostSummary {
            title: post.title.clone(),
            description: post.description.clone(),
            date: date_xml(&post.date),
            path: post_url(&self.config, &post.slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(slug: &str, title: &str, y: i32, m: u32, d: u32) -> Post {
        let date = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        Post::new(slug, title, date).with_body(format!("<p>Body of {}</p>", title))
    }

    fn renderer() -> PageRenderer {
        PageRenderer::new(SiteConfig::default()).unwrap()
    }

    fn position(html: &str, needle: &str) -> usize {
        html.find(needle)
            .unwrap_or_else(|| panic!("{needle} not in output"))
    }

    #[test]
    fn test_home_lists_newest_first() {
        let store = ContentStore::new(vec![
            post("a", "Post A", 2024, 1, 1),
            post("b", "Post B", 2024, 2, 1),
        ])
        .unwrap();

        let html = renderer().home(&store).unwrap();
        assert!(position(&html, "Post B") < position(&html, "Post A"));
        assert!(html.contains(r#"href="/blog/b/""#));
        assert!(html.contains("February 01, 2024"));
    }

    #[test]
    fn test_home_limits_to_latest_posts() {
        let posts = (1..=7)
            .map(|i| post(&format!("p{i}"), &format!("Title {i}"), 2024, i, 1))
            .collect();
        let store = ContentStore::new(posts).unwrap();

        let html = renderer().home(&store).unwrap();
        assert_eq!(html.matches("<li>").count(), 5);
        assert!(html.contains("Title 7"));
        assert!(!html.contains("Title 2"));
    }

    #[test]
    fn test_home_hides_drafts() {
        let store = ContentStore::new(vec![
            post("a", "Public", 2024, 1, 1),
            post("b", "Draft", 2024, 2, 1).with_published(false),
        ])
        .unwrap();

        let html = renderer().home(&store).unwrap();
        assert!(html.contains("Public"));
        assert!(!html.contains("Draft"));
    }

    #[test]
    fn test_blog_index() {
        let store = ContentStore::new(vec![
            post("old", "Old", 2020, 1, 1),
            post("new", "New", 2024, 1, 1),
            post("hidden", "Hidden", 2024, 6, 1).with_published(false),
        ])
        .unwrap();

        let html = renderer().blog_index(&store).unwrap();
        assert!(position(&html, "New") < position(&html, "Old"));
        assert!(!html.contains("Hidden"));
        assert!(html.contains(r#"href="/blog" class="active""#));
    }

    #[test]
    fn test_post_detail() {
        let store = ContentStore::new(vec![
            post("x/y", "Nested", 2024, 1, 1).with_description("About nesting")
        ])
        .unwrap();

        let rendered = renderer().post(&store, &["x", "y"]).unwrap();
        assert!(rendered.is_found());
        let html = rendered.html();
        assert!(html.contains("<h1>Nested</h1>"));
        assert!(html.contains("About nesting"));
        assert!(html.contains("<p>Body of Nested</p>"));
    }

    #[test]
    fn test_unpublished_post_is_not_found() {
        let store = ContentStore::new(vec![
            post("x/y", "Secret", 2024, 1, 1).with_published(false)
        ])
        .unwrap();

        // The record exists...
        assert!(store.find_by_slug(&["x", "y"]).is_some());

        // ...but is not rendered
        match renderer().post(&store, &["x", "y"]).unwrap() {
            Rendered::NotFound { reason, html } => {
                assert_eq!(
                    reason,
                    NotFound::Unpublished {
                        slug: "x/y".to_string()
                    }
                );
                assert!(!html.contains("Secret"));
                assert!(html.contains("404"));
            }
            Rendered::Page(_) => panic!("unpublished post was rendered"),
        }
    }

    #[test]
    fn test_missing_and_malformed() {
        let store = ContentStore::new(vec![post("a", "A", 2024, 1, 1)]).unwrap();

        assert_eq!(
            resolve_post(&store, &["nonexistent"]),
            Err(NotFound::Missing {
                slug: "nonexistent".to_string()
            })
        );
        assert_eq!(resolve_post(&store, &[] as &[&str]), Err(NotFound::Malformed));
        assert_eq!(resolve_post(&store, &["a", ""]), Err(NotFound::Malformed));
        assert!(resolve_post(&store, &["a"]).is_ok());

        let rendered = renderer().post(&store, &["nonexistent"]).unwrap();
        assert!(!rendered.is_found());
    }

    #[test]
    fn test_not_found_pages_are_identical() {
        let store = ContentStore::new(vec![
            post("hidden", "Hidden", 2024, 1, 1).with_published(false)
        ])
        .unwrap();
        let renderer = renderer();

        let missing = renderer.post(&store, &["nope"]).unwrap().into_html();
        let hidden = renderer.post(&store, &["hidden"]).unwrap().into_html();
        assert_eq!(missing, hidden);
    }

    #[test]
    fn test_about_page() {
        let mut config = SiteConfig::default();
        config.author.name = "Ada".to_string();
        config.author.bio = vec!["Writes <code>".to_string()];
        let renderer = PageRenderer::new(config).unwrap();

        let html = renderer.about().unwrap();
        assert!(html.contains("<h2>Ada</h2>"));
        assert!(html.contains("Writes &lt;code&gt;"));
        assert!(html.contains(r#"src="/avatar.png""#));
        assert!(html.contains(r#"href="/about" class="active""#));
    }

    #[test]
    fn test_date_format_with_literal_percent() {
        let config = SiteConfig {
            date_format: "YYYY-MM-DD 100%".to_string(),
            ..SiteConfig::default()
        };
        let store = ContentStore::new(vec![post("a", "A", 2024, 2, 1)]).unwrap();

        let html = PageRenderer::new(config).unwrap().home(&store).unwrap();
        assert!(html.contains("2024-02-01 100%"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let store =
            ContentStore::new(vec![post("a", "<script>alert(1)</script>", 2024, 1, 1)]).unwrap();
        let html = renderer().home(&store).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
