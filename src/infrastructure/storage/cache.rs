// Typed, TTL-aware access to the resource store
use crate::domain::error::RecapError;
use crate::domain::model::{Account, CacheKey, LeagueEntry, Match, Summoner};
use crate::domain::policy::{self, ResourceType, Ttl};
use crate::domain::traits::ResourceStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Hit(T),
    Miss,
    Expired,
}

impl<T> Lookup<T> {
    pub fn hit(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Expired => None,
        }
    }
}

/// The only writer of cached entries.
///
/// Without a store every read is a miss and every write is dropped. Store
/// failures are logged and treated the same way; they never reach callers.
#[derive(Clone, Default)]
pub struct CacheGateway {
    store: Option<Arc<dyn ResourceStore>>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A gateway that always misses.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub async fn read_account(&self, region: &str, game_name: &str, tag_line: &str) -> Lookup<Account> {
        self.lookup(&CacheKey::account(region, game_name, tag_line)).await
    }

    pub async fn write_account(&self, region: &str, game_name: &str, tag_line: &str, account: &Account) {
        self.store(&CacheKey::account(region, game_name, tag_line), account)
            .await
    }

    pub async fn read_profile(&self, region: &str, puuid: &str) -> Lookup<Summoner> {
        self.lookup(&CacheKey::profile(region, puuid)).await
    }

    pub async fn write_profile(&self, region: &str, summoner: &Summoner) {
        self.store(&CacheKey::profile(region, &summoner.puuid), summoner)
            .await
    }

    /// A cached list only counts as a hit when it holds at least `min_count`
    /// IDs; the hit is truncated to exactly `min_count`.
    pub async fn read_match_ids(
        &self,
        region: &str,
        puuid: &str,
        min_count: usize,
    ) -> Lookup<Vec<String>> {
        let key = CacheKey::match_ids(region, puuid);
        match self.lookup::<Vec<String>>(&key).await {
            Lookup::Hit(mut ids) if ids.len() >= min_count => {
                ids.truncate(min_count);
                Lookup::Hit(ids)
            }
            Lookup::Hit(ids) => {
                debug!(
                    key = %key,
                    cached = ids.len(),
                    requested = min_count,
                    "cache short"
                );
                Lookup::Miss
            }
            other => other,
        }
    }

    /// Replaces any cached list for this player.
    pub async fn write_match_ids(&self, region: &str, puuid: &str, ids: &[String]) {
        self.store(&CacheKey::match_ids(region, puuid), &ids).await
    }

    pub async fn read_match(&self, region: &str, match_id: &str) -> Lookup<Match> {
        self.lookup(&CacheKey::match_detail(region, match_id)).await
    }

    pub async fn write_match(&self, region: &str, game: &Match) {
        self.store(
            &CacheKey::match_detail(region, &game.metadata.match_id),
            game,
        )
        .await
    }

    pub async fn read_ranked(&self, region: &str, summoner_id: &str) -> Lookup<Vec<LeagueEntry>> {
        self.lookup(&CacheKey::ranked(region, summoner_id)).await
    }

    pub async fn write_ranked(&self, region: &str, summoner_id: &str, entries: &[LeagueEntry]) {
        self.store(&CacheKey::ranked(region, summoner_id), &entries)
            .await
    }

    /// Drop every cached entry. Returns rows removed (0 without a store).
    pub async fn purge_all(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        match store.purge_all().await {
            Ok(count) => {
                debug!(count, "cache purged");
                count
            }
            Err(e) => {
                warn!(error = %e, "cache purge failed");
                0
            }
        }
    }

    /// Delete match-ID lists past their TTL.
    pub async fn cleanup_expired_match_lists(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        let Ttl::For(ttl) = ResourceType::MatchIds.ttl() else {
            return 0;
        };
        match store.delete_match_id_lists_older_than(Utc::now() - ttl).await {
            Ok(count) => {
                if count > 0 {
                    debug!(count, "removed expired match ID lists");
                }
                count
            }
            Err(e) => {
                warn!(error = %e, "cache cleanup failed");
                0
            }
        }
    }

    /// Per-table row counts; unlike reads, this reports a missing store.
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, usize)>, RecapError> {
        match &self.store {
            Some(store) => store.table_counts().await,
            None => Err(RecapError::NotConfigured),
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Lookup<T> {
        let Some(store) = &self.store else {
            return Lookup::Miss;
        };

        let entry = match store.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(key = %key, "cache miss");
                return Lookup::Miss;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                return Lookup::Miss;
            }
        };

        let now = Utc::now();
        if !policy::is_valid(key.resource(), entry.stored_at, now) {
            debug!(key = %key, "cache expired");
            return Lookup::Expired;
        }

        match serde_json::from_value(entry.payload) {
            Ok(value) => {
                let age = now.signed_duration_since(entry.stored_at);
                debug!(key = %key, age_secs = age.num_seconds(), "cache hit");
                Lookup::Hit(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cached payload unreadable");
                Lookup::Miss
            }
        }
    }

    // Best effort: the caller already has its value.
    async fn store<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) {
        let Some(store) = &self.store else {
            return;
        };

        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "cache payload not serializable");
                return;
            }
        };

        match store.put(key, &payload).await {
            Ok(()) => debug!(key = %key, "cache stored"),
            Err(e) => warn!(key = %key, error = %e, "cache write failed"),
        }
    }
}
