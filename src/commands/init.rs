//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Weilai's Blog
tagline: Notes on code, tools and everything in between.
description: ''

# URL
url: http://example.com
root: /

# Directory
content_dir: content
blog_dir: blog
static_dir: static
public_dir: public

# Home page
latest_posts: 5

# Date format
date_format: MMMM DD, YYYY

highlight:
  theme: base16-ocean.dark
  line_number: false

menu:
  - name: Blog
    path: /blog
  - name: about
    path: /about

author:
  name: Weilai
  role: Software Developer
  avatar: avatar.png
  avatar_fallback: Weilai
  bio:
    - Writes Hello World in many languages.
    - Fluent in spreadsheets.
  links: []
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
description: The first post on this site.
date: {}
---

Welcome! This post lives in `content/blog/hello-world.mdx`.

## Writing

```bash
$ folio new "My New Post"
```

## Previewing

```bash
$ folio server
```

## Publishing

```bash
$ folio generate
```

Set `published: false` in a post's front-matter to keep it off the site.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("content/blog/hello-world.mdx"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.config.latest_posts, 5);
        assert_eq!(folio.config.author.bio.len(), 2);

        let store = folio.load_store().unwrap();
        let post = store.find_by_slug(&["hello-world"]).unwrap();
        assert_eq!(post.title, "Hello World");
        assert!(post.body.contains("<h2>Writing</h2>"));
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        assert!(init_site(tmp.path()).is_err());
    }
}
