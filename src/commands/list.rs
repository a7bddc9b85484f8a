//! List site content

use anyhow::Result;

use crate::content::{query, ContentStore};
use crate::helpers::{post_url, url_for};
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let store = folio.load_store()?;

    let lines = match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", store.len());
            post_lines(&store)
        }
        "route" | "routes" => {
            let routes = route_lines(folio, &store);
            println!("Routes ({}):", routes.len());
            routes
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    };

    for line in lines {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per post, newest first; drafts are marked
fn post_lines(store: &ContentStore) -> Vec<String> {
    query::sort_by_date(store.posts())
        .into_iter()
        .map(|post| {
            format!(
                "{} - {} [{}]{}",
                post.date.format("%Y-%m-%d"),
                post.title,
                post.slug_as_params,
                if post.published { "" } else { " (draft)" }
            )
        })
        .collect()
}

/// Every route the generator writes
fn route_lines(folio: &Folio, store: &ContentStore) -> Vec<String> {
    let config = &folio.config;
    let mut routes = vec![
        url_for(config, ""),
        url_for(config, &format!("{}/", config.blog_dir)),
        url_for(config, "about/"),
    ];
    routes.extend(
        store
            .static_params()
            .iter()
            .map(|params| post_url(config, params)),
    );
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn store() -> ContentStore {
        let date = |m| Local.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap();
        ContentStore::new(vec![
            Post::new("a", "A", date(1)),
            Post::new("x/y", "Y", date(2)).with_published(false),
        ])
        .unwrap()
    }

    #[test]
    fn test_post_lines() {
        let lines = post_lines(&store());
        assert_eq!(
            lines,
            vec![
                "2024-02-01 - Y [x/y] (draft)".to_string(),
                "2024-01-01 - A [a]".to_string(),
            ]
        );
    }

    #[test]
    fn test_route_lines() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        let routes = route_lines(&folio, &store());
        assert_eq!(
            routes,
            vec!["/", "/blog/", "/about/", "/blog/a/", "/blog/x/y/"]
        );
    }

    #[test]
    fn test_unknown_type() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert!(run(&folio, "tags").is_err());
    }
}
