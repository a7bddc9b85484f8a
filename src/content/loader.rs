//! Content loader - compiles post sources into `Post` records

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentError, ContentStore, FrontMatter, MarkdownRenderer, Post};
use crate::Folio;

/// Loads posts from `content_dir/blog_dir`
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        let highlight = &folio.config.highlight;
        let renderer = MarkdownRenderer::with_options(&highlight.theme, highlight.line_number);
        Self { folio, renderer }
    }

    /// Load every post and build the store
    pub fn load_store(&self) -> Result<ContentStore> {
        let posts = self.load_posts()?;
        Ok(ContentStore::new(posts)?)
    }

    /// Load all posts, in file-name order; files that fail to load are skipped
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = &self.folio.posts_dir;
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_post_file(path) {
                match self.load_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Skipping post {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let source = relative_path(path, &self.folio.content_dir);

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ContentError::MissingField {
                path: source.clone(),
                field: "title",
            })?
            .to_string();

        let raw_date = fm.date.clone().ok_or_else(|| ContentError::MissingField {
            path: source.clone(),
            field: "date",
        })?;
        let date = fm.parse_date().ok_or_else(|| ContentError::InvalidDate {
            path: source.clone(),
            value: raw_date,
        })?;

        let identifier = match fm.slug.as_deref() {
            Some(slug) => slug.to_string(),
            None => identifier_from_path(path, &self.folio.posts_dir),
        };

        let body = self.renderer.render_mdx(body)?;

        Ok(Post::new(&identifier, title, date)
            .with_description(fm.description.unwrap_or_default())
            .with_published(fm.published)
            .with_body(body)
            .with_source(source))
    }
}

/// Check if a file is a post source
fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "mdx" | "markdown"))
        .unwrap_or(false)
}

/// `/`-separated path of `path` relative to `base`
fn relative_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive a slug identifier from the file location: `x/y.mdx` -> `x/y`, `x/index.md` -> `x`
fn identifier_from_path(path: &Path, posts_dir: &Path) -> String {
    let without_ext = path.with_extension("");
    let identifier = relative_path(&without_ext, posts_dir);

    match identifier.strip_suffix("index") {
        Some(parent) if parent.is_empty() || parent.ends_with('/') => {
            parent.trim_end_matches('/').to_string()
        }
        _ => identifier,
    }
}
