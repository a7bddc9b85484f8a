//! Helper functions shared by the page renderers and templates

mod date;
mod url;

pub use date::*;
pub use url::*;
