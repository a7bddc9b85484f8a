//! Main navigation

use crate::config::SiteConfig;
use crate::helpers::url_for;
use crate::templates::NavLink;

/// Menu links for a page at `current_path`; the entry matching it is active
pub fn nav_links(config: &SiteConfig, current_path: &str) -> Vec<NavLink> {
    let current = normalize(current_path);
    config
        .menu
        .iter()
        .map(|item| {
            let path = url_for(config, &item.path);
            NavLink {
                name: item.name.clone(),
                active: normalize(&path) == current,
                path,
            }
        })
        .collect()
}

/// `/about/` and `/about` are the same page
fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_link() {
        let config = SiteConfig::default();
        let links = nav_links(&config, "/blog");
        assert_eq!(links.len(), 2);
        assert!(links[0].active);
        assert!(!links[1].active);

        let links = nav_links(&config, "/about/");
        assert!(!links[0].active);
        assert!(links[1].active);
    }

    #[test]
    fn test_post_pages_do_not_activate_blog() {
        let config = SiteConfig::default();
        let links = nav_links(&config, "/blog/x/y/");
        assert!(links.iter().all(|l| !l.active));
    }

    #[test]
    fn test_links_include_root() {
        let config = SiteConfig {
            root: "/site/".to_string(),
            ..SiteConfig::default()
        };
        let links = nav_links(&config, "/site/about");
        assert_eq!(links[1].path, "/site/about");
        assert!(links[1].active);
    }
}
