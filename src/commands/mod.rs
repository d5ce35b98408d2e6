//! CLI commands and their shared output helpers

pub mod check;
pub mod list;
pub mod new;
pub mod search;
pub mod show;

use anyhow::Result;
use serde_json::Value;

use crate::content::{date, Collection, Record};

/// One line per record: date, title, label and identifier
pub fn format_records(collection: Collection, records: &[Record], date_format: &str) -> String {
    let mut out = format!("{} ({}):\n", capitalize(collection.name()), records.len());
    for record in records {
        let title = record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled");
        let id = collection.identifier_of(record).unwrap_or_else(|| "?".to_string());

        out.push_str("  ");
        if let Some(date) = date::display_date(record, date_format) {
            out.push_str(&date);
            out.push_str(" - ");
        }
        out.push_str(title);
        if let Some(kind) = record.get("type").and_then(Value::as_str) {
            out.push_str(&format!(" ({})", kind));
        }
        out.push_str(&format!(" [{}]\n", id));
    }
    out
}

/// Print records either as pretty JSON or as a listing
pub fn print_records(
    collection: Collection,
    records: &[Record],
    json: bool,
    date_format: &str,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        print!("{}", format_records(collection, records, date_format));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
