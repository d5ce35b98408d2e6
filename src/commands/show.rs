//! Show a single essay or item

use anyhow::Result;
use serde_json::Value;

use crate::content::{date, Collection, MarkdownRenderer, Projection, Record};
use crate::Folio;

/// Print one record, optionally with its body rendered to HTML
pub async fn run(
    folio: &Folio,
    collection: Collection,
    id: &str,
    projection: &Projection,
    html: bool,
    json: bool,
) -> Result<()> {
    let resolver = folio.resolver()?;

    let Some(mut record) = resolver.get_by_id(collection, id, projection).await else {
        anyhow::bail!("No {} found with identifier {:?}", collection, id);
    };

    if html {
        render_body(&mut record, collection, &folio.renderer());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", format_record(collection, &record, &folio.config.date_format));
    }

    Ok(())
}

/// Replace the markdown body with its HTML rendering
pub fn render_body(record: &mut Record, collection: Collection, renderer: &MarkdownRenderer) {
    let field = collection.body_field();
    let html = match record.get(field) {
        Some(Value::String(markdown)) => renderer.render(markdown),
        _ => return,
    };
    record.insert(field.to_string(), Value::String(html));
}

/// Header lines for every metadata field, then the body
pub fn format_record(collection: Collection, record: &Record, date_format: &str) -> String {
    let body_field = collection.body_field();
    let mut out = String::new();

    for (key, value) in record {
        if key == body_field {
            continue;
        }
        let text = match (key.as_str(), value) {
            (date::DATE_FIELD, _) => date::display_date(record, date_format).unwrap_or_default(),
            (_, Value::String(s)) => s.clone(),
            (_, Value::Null) => continue,
            (_, other) => other.to_string(),
        };
        out.push_str(&format!("{}: {}\n", key, text));
    }

    if let Some(body) = record.get(body_field).and_then(Value::as_str) {
        out.push('\n');
        out.push_str(body.trim_end());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn essay() -> Record {
        serde_json::from_value(json!({
            "slug": "value-ai",
            "title": "Value Investing in the Age of AI",
            "date": "2023-09-21",
            "summary": null,
            "content": "# Heading\n\n<aside>raw</aside>\n"
        }))
        .unwrap()
    }

    #[test]
    fn test_render_body() {
        let mut record = essay();
        render_body(&mut record, Collection::Essays, &MarkdownRenderer::new());
        let html = record["content"].as_str().unwrap();
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<aside>raw</aside>"));
        assert_eq!(record["title"], json!("Value Investing in the Age of AI"));
    }

    #[test]
    fn test_format_record() {
        let out = format_record(Collection::Essays, &essay(), "%d/%m/%Y");
        assert_eq!(
            out,
            "slug: value-ai\ntitle: Value Investing in the Age of AI\ndate: 21/09/2023\n\n# Heading\n\n<aside>raw</aside>\n"
        );
    }
}
