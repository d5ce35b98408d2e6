//! Create a new local document

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::content::{Collection, Record};
use crate::store::LocalStore;
use crate::Folio;

/// Create a new essay or item in the local content directory.
///
/// The filename (and so the identifier) is the slugified title unless `path`
/// is given. A `scaffolds/<collection>.md` template in the base directory is
/// used when present, with `{{ title }}` and `{{ date }}` substituted.
pub fn create_document(
    folio: &Folio,
    collection: Collection,
    title: &str,
    path: Option<&str>,
) -> Result<PathBuf> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let stem = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if stem.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }
    if !LocalStore::is_valid_identifier(&stem) {
        anyhow::bail!("Invalid document name {:?}: must be a plain file name", stem);
    }

    let target_dir = folio.local_store().collection_dir(collection);
    fs::create_dir_all(&target_dir)?;
    let file_path = target_dir.join(format!("{}.md", stem));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = folio
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", collection.name()));
    let content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
            .replace("{{ title }}", title)
            .replace("{{ date }}", &today)
    } else {
        default_scaffold(collection, title, &today)?
    };

    fs::write(&file_path, content)?;
    tracing::info!("Created {} document {:?}", collection, file_path);

    Ok(file_path)
}

/// Front-matter with the fields the collection expects, left blank
fn default_scaffold(collection: Collection, title: &str, date: &str) -> Result<String> {
    let mut fm = Record::new();
    fm.insert("title".into(), Value::String(title.to_string()));
    match collection {
        Collection::Essays => {
            fm.insert("date".into(), Value::String(date.to_string()));
            fm.insert("summary".into(), Value::String(String::new()));
        }
        Collection::Interesting => {
            fm.insert("url".into(), Value::String(String::new()));
            fm.insert("date".into(), Value::String(date.to_string()));
            fm.insert("type".into(), Value::String(String::new()));
        }
    }

    Ok(format!("---\n{}---\n\n", serde_yaml::to_string(&fm)?))
}

/// Run the new command
pub fn run(folio: &Folio, collection: Collection, title: &str, path: Option<&str>) -> Result<()> {
    let file_path = create_document(folio, collection, title, path)?;
    println!("Created: {:?}", file_path);
    Ok(())
}
