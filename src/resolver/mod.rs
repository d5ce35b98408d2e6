//! Content resolver - the single entry point for presentation code
//!
//! Every operation asks the remote backend first and falls back to the local
//! documents when the backend fails or has nothing. The two tiers are never
//! mixed in one answer, and no error ever reaches the caller: the worst case
//! is an empty result.

use crate::content::{Collection, Projection, Record};
use crate::store::{LocalStore, RemoteSource};

/// Remote-first, local-fallback access to essays and interesting items
pub struct Resolver<R> {
    remote: R,
    local: LocalStore,
}

impl<R: RemoteSource> Resolver<R> {
    pub fn new(remote: R, local: LocalStore) -> Self {
        Self { remote, local }
    }

    /// All records of a collection, newest first, capped to `limit`
    pub async fn get_all(
        &self,
        collection: Collection,
        projection: &Projection,
        limit: Option<usize>,
    ) -> Vec<Record> {
        match self.remote.list_all(collection, limit).await {
            Ok(records) if !records.is_empty() => {
                return records.into_iter().map(|r| projection.apply(r)).collect();
            }
            Ok(_) => tracing::warn!("Falling back to local {} data", collection),
            Err(e) => tracing::error!(
                "Error fetching {} from remote, falling back to local data: {}",
                collection,
                e
            ),
        }

        self.local.list_all(collection, projection, limit)
    }

    /// One record by identifier, `None` when neither tier has it
    pub async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
        projection: &Projection,
    ) -> Option<Record> {
        match self.remote.get_by_identifier(collection, id).await {
            Ok(Some(record)) if !record.is_empty() => return Some(projection.apply(record)),
            Ok(_) => tracing::warn!(
                "Falling back to local data for {} with identifier {:?}",
                collection,
                id
            ),
            Err(e) => tracing::error!(
                "Error fetching {} {:?} from remote, falling back to local data: {}",
                collection,
                id,
                e
            ),
        }

        self.local.get_by_identifier(collection, id, projection)
    }

    /// Case-insensitive substring search; a blank query lists everything
    pub async fn search(&self, collection: Collection, query: &str) -> Vec<Record> {
        let query = query.trim();

        match self.remote.search(collection, query).await {
            Ok(records) if !records.is_empty() => return records,
            Ok(_) => tracing::warn!("Falling back to local {} search", collection),
            Err(e) => tracing::error!(
                "Error searching {} on remote, falling back to local search: {}",
                collection,
                e
            ),
        }

        self.local.search(collection, query)
    }
}
