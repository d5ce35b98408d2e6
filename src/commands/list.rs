//! List a collection

use anyhow::Result;

use crate::content::{Collection, Projection};
use crate::Folio;

/// List records of a collection, newest first
pub async fn run(
    folio: &Folio,
    collection: Collection,
    projection: &Projection,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let resolver = folio.resolver()?;
    let records = resolver.get_all(collection, projection, limit).await;

    if records.is_empty() {
        tracing::info!("No {} found in either source", collection);
    }

    super::print_records(collection, &records, json, &folio.config.date_format)
}
