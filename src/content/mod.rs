//! Content module - records, dates, front-matter and markdown

pub mod date;
mod error;
mod frontmatter;
mod markdown;
mod record;

pub use error::{ContentError, Result};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use record::{from_record, Collection, Essay, InterestingItem, Projection, Record};
