//! Errors raised inside the content stores and renderer
//!
//! None of these cross the resolver boundary. They exist so the stores can use
//! `?` internally and so log lines say what actually went wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid front-matter: {0}")]
    FrontMatter(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("remote backend is not configured (missing {0})")]
    NotConfigured(&'static str),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("failed to render markdown")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
