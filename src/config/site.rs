//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    /// Posts live in `content_dir/blog_dir`; also the URL prefix of post routes
    pub blog_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Home page
    pub latest_posts: usize,

    // Date format (Moment.js style)
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Navigation, in display order after the home link
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuItem>,

    #[serde(default)]
    pub author: AuthorProfile,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Weilai's Blog".to_string(),
            tagline: String::new(),
            description: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            blog_dir: "blog".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            latest_posts: 5,

            date_format: "MMMM DD, YYYY".to_string(),
            highlight: HighlightConfig::default(),

            menu: default_menu(),
            author: AuthorProfile::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            name: "Blog".to_string(),
            path: "/blog".to_string(),
        },
        MenuItem {
            name: "about".to_string(),
            path: "/about".to_string(),
        },
    ]
}

/// A navigation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// The author profile rendered on the about page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorProfile {
    pub name: String,
    pub role: String,
    /// Avatar image path, relative to the site root
    pub avatar: String,
    /// Text shown when the avatar cannot be loaded
    pub avatar_fallback: String,
    pub bio: Vec<String>,
    #[serde(default)]
    pub links: Vec<AuthorLink>,
}

impl Default for AuthorProfile {
    fn default() -> Self {
        Self {
            name: "Weilai".to_string(),
            role: "Software Developer".to_string(),
            avatar: "avatar.png".to_string(),
            avatar_fallback: "Weilai".to_string(),
            bio: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// An external profile link (GitHub, email, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorLink {
    pub name: String,
    pub url: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Weilai's Blog");
        assert_eq!(config.latest_posts, 5);
        assert_eq!(config.blog_dir, "blog");
        assert_eq!(config.menu.len(), 2);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
latest_posts: 3
author:
  name: Test User
  bio:
    - Writes Rust.
    - Drinks tea.
  links:
    - name: GitHub
      url: https://github.com/test
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.latest_posts, 3);
        assert_eq!(config.author.name, "Test User");
        // Unset author fields fall back to their defaults
        assert_eq!(config.author.role, "Software Developer");
        assert_eq!(config.author.bio.len(), 2);
        assert_eq!(config.author.links[0].url, "https://github.com/test");
        assert_eq!(config.menu, default_menu());
    }

    #[test]
    fn test_custom_menu() {
        let yaml = r#"
menu:
  - name: Posts
    path: /blog
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.menu[0].name, "Posts");
    }
}
