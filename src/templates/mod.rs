//! Built-in site templates using the Tera template engine
//!
//! Every template is embedded in the binary, so a site needs nothing but
//! its `_config.yml`, content and static assets.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::format_date;

/// Template renderer with the embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would mangle URLs; text fields use `| escape` explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("home.html", include_str!("folio/home.html")),
            ("blog.html", include_str!("folio/blog.html")),
            ("post.html", include_str!("folio/post.html")),
            ("about.html", include_str!("folio/about.html")),
            ("404.html", include_str!("folio/404.html")),
            ("partials/nav.html", include_str!("folio/partials/nav.html")),
            (
                "partials/macros.html",
                include_str!("folio/partials/macros.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format an RFC 3339 date string with a Moment.js-style format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    match chrono::DateTime::parse_from_rfc3339(&s) {
        Ok(date) => Ok(tera::Value::String(format_date(&date, &format))),
        // Not a full timestamp; leave it as written
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub url: String,
    pub root: String,
    pub date_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub name: String,
    pub path: String,
    pub active: bool,
}

/// A post as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339
    pub date: String,
    pub path: String,
}

/// A post as shown on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub content: String,
}
