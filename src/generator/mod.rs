//! Generator module - writes every route of the site to the public directory

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::ContentStore;
use crate::pages::{PageRenderer, Rendered};
use crate::Folio;

/// Static site generator
pub struct Generator {
    folio: Folio,
    pages: PageRenderer,
}

/// What a generation pass wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Post routes rendered with their content
    pub posts: usize,
    /// Post routes written with the not-found page
    pub hidden: usize,
    /// Static files copied
    pub assets: usize,
}

impl Generator {
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            pages: PageRenderer::new(folio.config.clone())?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, store: &ContentStore) -> Result<GenerateReport> {
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = GenerateReport {
            assets: self.copy_static_assets()?,
            ..Default::default()
        };

        self.write_page(&public_dir.join("index.html"), &self.pages.home(store)?)?;
        self.write_page(
            &self.route_dir(&[self.folio.config.blog_dir.as_str()]).join("index.html"),
            &self.pages.blog_index(store)?,
        )?;
        self.write_page(
            &self.route_dir(&["about"]).join("index.html"),
            &self.pages.about()?,
        )?;
        self.write_page(&public_dir.join("404.html"), &self.pages.not_found()?)?;

        for params in store.static_params() {
            let rendered = self.pages.post(store, &params)?;
            if let Rendered::NotFound { reason, .. } = &rendered {
                // Routes are enumerated for every post, drafts included
                tracing::warn!(
                    "Route /{}/{} is generated as not-found: {}",
                    self.folio.config.blog_dir,
                    params.join("/"),
                    reason
                );
                report.hidden += 1;
            } else {
                report.posts += 1;
            }

            let mut segments = vec![self.folio.config.blog_dir.as_str()];
            segments.extend(params.iter().map(String::as_str));
            self.write_page(&self.route_dir(&segments).join("index.html"), rendered.html())?;
        }

        Ok(report)
    }

    /// Output directory of a route made of `segments`
    fn route_dir(&self, segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .flat_map(|s| s.split('/'))
            .filter(|s| !s.is_empty())
            .fold(self.folio.public_dir.clone(), |dir, s| dir.join(s))
    }

    fn write_page(&self, output_path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy static assets (avatar, images, ...) to the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.folio.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn post(slug: &str, title: &str, published: bool) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Post::new(slug, title, date)
            .with_published(published)
            .with_body(format!("<p>{} body</p>", title))
    }

    #[test]
    fn test_generate_site() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        fs::create_dir_all(folio.static_dir.join("img")).unwrap();
        fs::write(folio.static_dir.join("avatar.png"), b"png").unwrap();
        fs::write(folio.static_dir.join("img/a.jpg"), b"jpg").unwrap();

        let store = ContentStore::new(vec![
            post("hello", "Hello", true),
            post("x/y", "Draft", false),
        ])
        .unwrap();

        let report = Generator::new(&folio).unwrap().generate(&store).unwrap();
        assert_eq!(
            report,
            GenerateReport {
                posts: 1,
                hidden: 1,
                assets: 2
            }
        );

        let public = &folio.public_dir;
        for page in [
            "index.html",
            "404.html",
            "blog/index.html",
            "about/index.html",
            "blog/hello/index.html",
            "blog/x/y/index.html",
            "avatar.png",
            "img/a.jpg",
        ] {
            assert!(public.join(page).exists(), "{page} was not generated");
        }

        let hello = fs::read_to_string(public.join("blog/hello/index.html")).unwrap();
        assert!(hello.contains("<p>Hello body</p>"));

        // Unpublished routes exist but only hold the not-found page
        let draft = fs::read_to_string(public.join("blog/x/y/index.html")).unwrap();
        let not_found = fs::read_to_string(public.join("404.html")).unwrap();
        assert_eq!(draft, not_found);
        assert!(!draft.contains("Draft body"));
    }

    #[test]
    fn test_generate_empty_store() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let report = Generator::new(&folio)
            .unwrap()
            .generate(&ContentStore::default())
            .unwrap();
        assert_eq!(report, GenerateReport::default());
        assert!(folio.public_dir.join("index.html").exists());
    }
}
