//! Check the connection to the remote backend

use anyhow::Result;

use crate::config::{ENV_REMOTE_KEY, ENV_REMOTE_URL};
use crate::content::Collection;
use crate::Folio;

/// Report which credentials are set and whether every table answers
pub async fn run(folio: &Folio) -> Result<()> {
    let remote_config = &folio.config.remote;

    println!(
        "Remote URL: {}",
        remote_config.url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Remote key: {}",
        remote_config.key_prefix().as_deref().unwrap_or("(not set)")
    );
    if remote_config.url.is_none() || remote_config.key.is_none() {
        println!(
            "Hint: set remote.url and remote.key in _config.yml, or {} and {}",
            ENV_REMOTE_URL, ENV_REMOTE_KEY
        );
    }

    let remote = folio.remote_store()?;
    let mut failures = 0;
    for collection in Collection::ALL {
        let table = remote_config.table(collection);
        match remote.ping(collection).await {
            Ok(rows) => println!("  {} ({}): ok, {} row(s) sampled", collection, table, rows),
            Err(e) => {
                failures += 1;
                tracing::error!("Remote check failed for {}: {}", table, e);
                println!("  {} ({}): FAILED - {}", collection, table, e);
            }
        }
    }

    let local = folio.local_store();
    for collection in Collection::ALL {
        println!(
            "  local {}: {} document(s) in {:?}",
            collection,
            local.list_identifiers(collection).len(),
            local.collection_dir(collection)
        );
    }

    if failures > 0 {
        anyhow::bail!(
            "{} of {} remote tables unreachable; pages will use local content",
            failures,
            Collection::ALL.len()
        );
    }

    println!("Successfully connected to the remote backend");
    Ok(())
}
