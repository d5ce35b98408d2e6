//! Front-matter parsing

use super::error::{ContentError, Result};
use super::Record;

/// Metadata block at the head of a local document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Fields in the order the author wrote them
    pub data: Record,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str)> {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        // `---\n---` closes an empty block straight away
        if let Some(after) = rest.strip_prefix("---") {
            return Ok((FrontMatter::default(), after.trim_start_matches(['\n', '\r'])));
        }

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A leading --- may just be a thematic break in the markdown
        if !looks_like_yaml(yaml_content) {
            return Ok((FrontMatter::default(), content));
        }

        let data: Record = serde_yaml::from_str(yaml_content)
            .map_err(|e| ContentError::FrontMatter(e.to_string()))?;

        Ok((FrontMatter { data }, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        // ;;; delimited JSON
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or_else(|| ContentError::FrontMatter("unterminated ;;; block".into()))?;
            let json_content = rest[..end_pos].trim();
            let json_content = if json_content.starts_with('{') {
                json_content.to_string()
            } else {
                format!("{{{}}}", json_content)
            };
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            let data: Record = serde_json::from_str(&json_content)?;
            return Ok((FrontMatter { data }, remaining));
        }

        // A bare JSON object at the start of the file. Anything that is not
        // one is ordinary markdown that happens to open with a brace.
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    '\\' if !escaped => escaped = true,
                    '"' if !escaped => in_string = false,
                    _ => escaped = false,
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(match serde_json::from_str::<Record>(&content[..=i]) {
                            Ok(data) => {
                                let remaining = content[i + 1..].trim_start_matches(['\n', '\r']);
                                (FrontMatter { data }, remaining)
                            }
                            Err(e) => {
                                tracing::debug!("Leading braces are not JSON front-matter: {}", e);
                                (FrontMatter::default(), content)
                            }
                        });
                    }
                }
                _ => {}
            }
        }

        Ok((FrontMatter::default(), content))
    }
}

/// Whether a `---` block holds `key: value` lines rather than prose
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after = &trimmed[colon_pos + 1..];
        is_key && (after.is_empty() || after.starts_with(' '))
    })
}
