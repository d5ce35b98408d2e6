//! Content records, collections and field projection

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::error::Result;

/// A single essay or item, as an ordered field map.
///
/// Records stay dynamic so that callers can ask for any subset of fields;
/// use [`from_record`] to get a typed view.
pub type Record = IndexMap<String, Value>;

/// The kinds of content the site publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Long-form articles
    Essays,
    /// Curated external links
    Interesting,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Essays, Collection::Interesting];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Essays => "essays",
            Collection::Interesting => "interesting",
        }
    }

    /// Backend table used when the config does not override it
    pub fn default_table(&self) -> &'static str {
        match self {
            Collection::Essays => "essays",
            Collection::Interesting => "interesting_items",
        }
    }

    /// Directory below the content root holding local documents
    pub fn dir_name(&self) -> &'static str {
        self.name()
    }

    /// Primary key, also the filename stem of a local document
    pub fn id_field(&self) -> &'static str {
        match self {
            Collection::Essays => "slug",
            Collection::Interesting => "id",
        }
    }

    /// Field that receives the document body of a local file
    pub fn body_field(&self) -> &'static str {
        match self {
            Collection::Essays => "content",
            Collection::Interesting => "why",
        }
    }

    /// Fields matched by a substring search
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Essays => &["title", "content", "summary"],
            Collection::Interesting => &["title", "why", "type"],
        }
    }

    /// Identifier of a record; numeric backend ids are stringified
    pub fn identifier_of(&self, record: &Record) -> Option<String> {
        match record.get(self.id_field())? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "essay" | "essays" => Ok(Collection::Essays),
            "interesting" | "item" | "items" | "interesting_items" => Ok(Collection::Interesting),
            other => Err(format!(
                "unknown collection: {}. Available: essays, interesting",
                other
            )),
        }
    }
}

/// Which fields a caller wants back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// Every field the source has
    #[default]
    All,
    /// Only these fields, in this order
    Fields(Vec<String>),
}

impl Projection {
    /// Build a projection from field names; an empty list means all fields
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            Projection::All
        } else {
            Projection::Fields(fields)
        }
    }

    /// Parse a comma-separated list such as `title,date,slug`
    pub fn parse(list: &str) -> Self {
        Self::fields(
            list.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty()),
        )
    }

    /// Keep only the requested fields that the record actually has
    pub fn apply(&self, mut record: Record) -> Record {
        match self {
            Projection::All => record,
            Projection::Fields(fields) => fields
                .iter()
                .filter_map(|f| record.swap_remove_entry(f.as_str()))
                .collect(),
        }
    }
}

/// Deserialize a typed view out of a record
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    let object: serde_json::Map<String, Value> = record.into_iter().collect();
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// Accept identifiers stored either as text or as numbers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// A long-form article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Essay {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Raw markdown body, absent when not projected
    #[serde(default)]
    pub content: Option<String>,
}

/// A curated external link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestingItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Category label such as "Podcast" or "Research"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Why the link is worth reading
    #[serde(default)]
    pub why: Option<String>,
}
