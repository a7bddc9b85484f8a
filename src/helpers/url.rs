//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/about") // -> "/blog-root/about"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Detail route of a post, built from its slug segments
///
/// # Examples
/// ```ignore
/// post_url(&config, &["x", "y"]) // -> "/blog/x/y/"
/// ```
pub fn post_url<S: AsRef<str>>(config: &SiteConfig, segments: &[S]) -> String {
    let encoded = segments
        .iter()
        .map(|s| utf8_percent_encode(s.as_ref(), PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    url_for(
        config,
        &format!("{}/{}/", config.blog_dir.trim_matches('/'), encoded),
    )
}
