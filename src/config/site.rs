//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::Collection;

/// Environment variable overriding `remote.url`
pub const ENV_REMOTE_URL: &str = "FOLIO_REMOTE_URL";
/// Environment variable overriding `remote.key`
pub const ENV_REMOTE_KEY: &str = "FOLIO_REMOTE_KEY";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the local fallback documents, relative to the base directory
    pub content_dir: String,
    pub remote: RemoteConfig,
    pub markdown: MarkdownConfig,
    /// strftime pattern used when printing dates
    pub date_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            remote: RemoteConfig::default(),
            markdown: MarkdownConfig::default(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `FOLIO_REMOTE_URL` / `FOLIO_REMOTE_KEY` from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_REMOTE_URL).ok(),
            std::env::var(ENV_REMOTE_KEY).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, key: Option<String>) {
        if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Remote URL taken from {}", ENV_REMOTE_URL);
            self.remote.url = Some(url);
        }
        if let Some(key) = key.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Remote key taken from {}", ENV_REMOTE_KEY);
            self.remote.key = Some(key);
        }
    }
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    /// Anonymous access key
    pub key: Option<String>,
    /// Per-request timeout; none by default
    pub timeout_secs: Option<u64>,
    pub essays_table: String,
    pub interesting_table: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            timeout_secs: None,
            essays_table: Collection::Essays.default_table().to_string(),
            interesting_table: Collection::Interesting.default_table().to_string(),
        }
    }
}

impl RemoteConfig {
    pub fn table(&self, collection: Collection) -> &str {
        match collection {
            Collection::Essays => &self.essays_table,
            Collection::Interesting => &self.interesting_table,
        }
    }

    /// First few characters of the key, safe to print
    pub fn key_prefix(&self) -> Option<String> {
        self.key
            .as_ref()
            .map(|k| format!("{}...", k.chars().take(10).collect::<String>()))
    }
}

/// Markdown renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// syntect theme used for fenced code blocks
    pub highlight_theme: String,
    pub line_numbers: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.remote.url, None);
        assert_eq!(config.remote.table(Collection::Interesting), "interesting_items");
        assert!(!config.markdown.line_numbers);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
content_dir: posts
remote:
  url: https://example.supabase.co
  key: anon-key-1234567890
  essays_table: articles
markdown:
  line_numbers: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.remote.url.as_deref(), Some("https://example.supabase.co"));
        assert_eq!(config.remote.table(Collection::Essays), "articles");
        assert_eq!(config.remote.table(Collection::Interesting), "interesting_items");
        assert_eq!(config.remote.key_prefix().as_deref(), Some("anon-key-1..."));
        assert!(config.markdown.line_numbers);
        assert_eq!(config.markdown.highlight_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_overrides() {
        let mut config = SiteConfig::default();
        config.remote.key = Some("from-file".into());
        config.apply_overrides(Some("https://env.example".into()), Some("  ".into()));
        assert_eq!(config.remote.url.as_deref(), Some("https://env.example"));
        assert_eq!(config.remote.key.as_deref(), Some("from-file"));
    }
}
