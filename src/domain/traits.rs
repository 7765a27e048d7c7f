use crate::domain::error::RecapError;
use crate::domain::model::{CacheEntry, CacheKey};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Persistent storage for cached upstream payloads.
///
/// Implementations decide insert-once vs upsert from the key's resource
/// type and stamp `stored_at` themselves at write time.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Look up the entry for a key.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, RecapError>;

    /// Write a payload under a key.
    async fn put(&self, key: &CacheKey, payload: &serde_json::Value) -> Result<(), RecapError>;

    /// Remove every cached entry. Returns the number of rows deleted.
    async fn purge_all(&self) -> Result<usize, RecapError>;

    /// Remove match-ID lists written before `cutoff`.
    async fn delete_match_id_lists_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RecapError>;

    /// Row count per table, for status output.
    async fn table_counts(&self) -> Result<Vec<(&'static str, usize)>, RecapError>;
}

/// Raw upstream response, before classification.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub retry_after: Option<Duration>,
    pub body: String,
}

/// Performs a single authenticated GET.
///
/// `Err` means the request never produced an HTTP response (connect,
/// TLS, timeout); any status code comes back as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, api_key: &str) -> Result<HttpResponse, RecapError>;
}
