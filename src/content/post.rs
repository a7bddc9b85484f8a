//! Post model

use chrono::{DateTime, Local};
use serde::Serialize;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Path segments identifying the post
    pub slug: Vec<String>,

    /// Slash-joined form of `slug`, unique across the store
    pub slug_as_params: String,

    /// Post title
    pub title: String,

    /// Short summary shown under the title
    pub description: Option<String>,

    /// Publication date
    pub date: DateTime<Local>,

    /// Unpublished posts are never rendered publicly
    pub published: bool,

    /// Compiled HTML body
    pub body: String,

    /// Source file path (relative to the content directory)
    pub source: String,
}

impl Post {
    /// Create a published post with an empty body from a slash-delimited identifier
    pub fn new(identifier: &str, title: impl Into<String>, date: DateTime<Local>) -> Self {
        let slug = split_slug(identifier);
        let slug_as_params = slug.join("/");
        Self {
            source: slug_as_params.clone(),
            slug,
            slug_as_params,
            title: title.into(),
            description: None,
            date,
            published: true,
            body: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Split a slash-delimited identifier into path segments, dropping empty ones
pub fn split_slug(identifier: &str) -> Vec<String> {
    identifier
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
