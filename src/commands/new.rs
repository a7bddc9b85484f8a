//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a new `.mdx` post under the posts directory.
///
/// `path` overrides the file location (relative to the posts directory, no
/// extension); otherwise the slugified title is used.
pub fn create_post(folio: &Folio, title: &str, path: Option<&str>, draft: bool) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let name = match path {
        Some(p) => {
            let name = p.trim_matches('/');
            if name.split('/').any(|s| s == "." || s == "..") {
                anyhow::bail!("Post path {:?} must stay inside the blog directory", p);
            }
            name.to_string()
        }
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = folio.posts_dir.join(format!("{}.mdx", name));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!(
        r#"---
title: {}
description: ""
date: {}
published: {}
---
"#,
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d %H:%M:%S"),
        !draft
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let path = create_post(&folio, "Hello: World", None, false).unwrap();
        assert_eq!(path, folio.posts_dir.join("hello-world.mdx"));

        let posts = crate::content::loader::ContentLoader::new(&folio)
            .load_posts()
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello: World");
        assert!(posts[0].published);
        assert_eq!(posts[0].slug_as_params, "hello-world");
    }

    #[test]
    fn test_create_draft_with_path() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let path = create_post(&folio, "Nested", Some("notes/nested"), true).unwrap();
        assert_eq!(path, folio.posts_dir.join("notes/nested.mdx"));

        let store = folio.load_store().unwrap();
        let post = store.find_by_slug(&["notes", "nested"]).unwrap();
        assert!(!post.published);
    }

    #[test]
    fn test_rejects_path_outside_posts_dir() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        assert!(create_post(&folio, "Escape", Some("../../x"), false).is_err());
        assert!(create_post(&folio, "Escape", Some("notes/../x"), false).is_err());
        assert!(!tmp.path().join("x.mdx").exists());
        assert!(!folio.content_dir.join("x.mdx").exists());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        create_post(&folio, "Once", None, false).unwrap();
        assert!(create_post(&folio, "Once", None, false).is_err());
    }
}
