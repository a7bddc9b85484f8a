//! Configuration module

mod site;

pub use site::AuthorLink;
pub use site::AuthorProfile;
pub use site::HighlightConfig;
pub use site::MenuItem;
pub use site::SiteConfig;
