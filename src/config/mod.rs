//! Configuration module

mod site;

pub use site::MarkdownConfig;
pub use site::RemoteConfig;
pub use site::SiteConfig;
pub use site::{ENV_REMOTE_KEY, ENV_REMOTE_URL};
