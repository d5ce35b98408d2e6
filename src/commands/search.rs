//! Search a collection

use anyhow::Result;

use crate::content::Collection;
use crate::Folio;

/// Print records whose title, body or summary contain `query`
pub async fn run(folio: &Folio, collection: Collection, query: &str, json: bool) -> Result<()> {
    let resolver = folio.resolver()?;
    let records = resolver.search(collection, query).await;

    if records.is_empty() && !json {
        println!("No {} matching {:?}", collection, query);
        return Ok(());
    }

    super::print_records(collection, &records, json, &folio.config.date_format)
}
