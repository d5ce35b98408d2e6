//! Content stores: the remote backend and the local fallback documents

mod local;
mod remote;

use std::future::Future;

use crate::content::{Collection, Record, Result};

pub use local::LocalStore;
pub use remote::RemoteStore;

/// A hosted source of records, queried before the local documents.
///
/// Implementations report failures as errors; deciding what to do about them
/// (falling back to local files) is the resolver's job. Every method must
/// return rows newest first.
pub trait RemoteSource: Send + Sync {
    /// All records of a collection, optionally capped to `limit` rows
    fn list_all(
        &self,
        collection: Collection,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// The record with this identifier, `None` if there is none
    fn get_by_identifier(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Record>>> + Send;

    /// Case-insensitive substring search over the collection's search
    /// fields; an empty query lists everything
    fn search(
        &self,
        collection: Collection,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;
}
