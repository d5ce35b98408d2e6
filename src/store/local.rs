//! Local fallback store - front-matter markdown documents on disk

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::date::{self, DATE_FIELD};
use crate::content::{
    Collection, ContentError, FrontMatter, MarkdownRenderer, Projection, Record, Result,
};

const SUMMARY_FIELD: &str = "summary";

lazy_static! {
    /// A bare file stem: no separators, no leading dot
    static ref IDENTIFIER: Regex = Regex::new(r"^[^./\\\x00][^/\\\x00]*$").expect("valid identifier pattern");
}

/// Reads documents from `<root>/<collection>/<identifier>.md`.
///
/// The public operations never fail. This store is the last resort behind the
/// remote backend, so problems are logged and reported as "no data".
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Whether `id` names a file directly inside a collection directory
    pub fn is_valid_identifier(id: &str) -> bool {
        IDENTIFIER.is_match(id)
    }

    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.dir_name())
    }

    /// Identifiers of every document in a collection, sorted.
    ///
    /// A missing directory is created and yields an empty list.
    pub fn list_identifiers(&self, collection: Collection) -> Vec<String> {
        match self.try_list_identifiers(collection) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Error listing local {}: {}", collection, e);
                Vec::new()
            }
        }
    }

    fn try_list_identifiers(&self, collection: Collection) -> Result<Vec<String>> {
        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            tracing::debug!("Created empty content directory {:?}", dir);
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();

        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Look up one document.
    ///
    /// Returns `None` when the document does not exist, cannot be parsed, or
    /// has none of the requested fields.
    pub fn get_by_identifier(
        &self,
        collection: Collection,
        id: &str,
        projection: &Projection,
    ) -> Option<Record> {
        match self.load_document(collection, id) {
            Ok(Some(record)) => Some(projection.apply(record)).filter(|r| !r.is_empty()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error getting local {} document {:?}: {}", collection, id, e);
                None
            }
        }
    }

    /// Every document of a collection, newest first, capped to `limit`
    pub fn list_all(
        &self,
        collection: Collection,
        projection: &Projection,
        limit: Option<usize>,
    ) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .list_identifiers(collection)
            .iter()
            .filter_map(|id| match self.load_document(collection, id) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping local {} document {:?}: {}", collection, id, e);
                    None
                }
            })
            .collect();

        // Order on the full records so a projection without `date` still
        // comes back newest first
        date::sort_by_date_desc(&mut records);

        let records = records
            .into_iter()
            .map(|r| projection.apply(r))
            .filter(|r| !r.is_empty());

        match limit {
            Some(limit) => records.take(limit).collect(),
            None => records.collect(),
        }
    }

    /// Case-insensitive substring scan over the collection's search fields.
    ///
    /// An empty query returns every document.
    pub fn search(&self, collection: Collection, query: &str) -> Vec<Record> {
        let records = self.list_all(collection, &Projection::All, None);

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records;
        }

        records
            .into_iter()
            .filter(|record| matches_query(record, collection.search_fields(), &needle))
            .collect()
    }

    /// Read and parse a document into a full record
    fn load_document(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let id = strip_markdown_extension(id);
        if !Self::is_valid_identifier(id) {
            return Err(ContentError::InvalidIdentifier(id.to_string()));
        }

        let dir = self.collection_dir(collection);
        let Some(path) = ["md", "markdown"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", id, ext)))
            .find(|p| p.is_file())
        else {
            return Ok(None);
        };

        let raw = fs::read_to_string(&path)?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        Ok(Some(build_record(collection, id, fm, body)))
    }
}

/// Assemble a record: identifier from the filename, the document body in the
/// collection's body field, the date in canonical form, everything else as
/// written in the front-matter
fn build_record(collection: Collection, id: &str, fm: FrontMatter, body: &str) -> Record {
    let id_field = collection.id_field();
    let body_field = collection.body_field();

    let mut record = Record::new();
    record.insert(id_field.to_string(), Value::String(id.to_string()));

    let mut metadata_body = None;
    for (key, value) in fm.data {
        if value.is_null() || key == id_field {
            continue;
        }
        if key == body_field {
            metadata_body = Some(value);
            continue;
        }
        if key == DATE_FIELD {
            if let Some(date) = date::canonical_date_value(&value) {
                record.insert(key, date);
            }
            continue;
        }
        record.insert(key, value);
    }

    // Short items may keep their text in the front-matter and leave the body empty
    let body = match metadata_body {
        Some(value) if body.trim().is_empty() => value,
        _ => Value::String(body.to_string()),
    };

    // Essays without a summary borrow the text before `<!-- more -->`
    if collection == Collection::Essays && !record.contains_key(SUMMARY_FIELD) {
        if let Some(excerpt) = body.as_str().and_then(|b| MarkdownRenderer::split_excerpt(b).0) {
            record.insert(SUMMARY_FIELD.to_string(), Value::String(excerpt));
        }
    }

    record.insert(body_field.to_string(), body);

    record
}

/// `first-post.md` and `first-post.markdown` both name `first-post`
fn strip_markdown_extension(id: &str) -> &str {
    id.strip_suffix(".md")
        .or_else(|| id.strip_suffix(".markdown"))
        .unwrap_or(id)
}

fn matches_query(record: &Record, fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|field| {
        record
            .get(*field)
            .and_then(Value::as_str)
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
