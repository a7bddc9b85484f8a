//! Errors raised while building the content store

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("duplicate slug `{slug}` in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("post {path} has an empty slug")]
    EmptySlug { path: String },

    #[error("post {path} has an invalid slug segment `{segment}`")]
    InvalidSegment { path: String, segment: String },

    #[error("post {path} is missing required field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("post {path} has an unparseable date `{value}`")]
    InvalidDate { path: String, value: String },
}
