use crate::application::inflight::RequestCoordinator;
use crate::domain::error::RecapError;
use crate::domain::model::{Account, CacheKey, LeagueEntry, Match, Summoner};
use crate::domain::region::RiotId;
use crate::infrastructure::network::client::RiotClient;
use crate::infrastructure::storage::cache::CacheGateway;
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Upper bound on match IDs requested for a date range.
pub const MAX_MATCH_FETCH: usize = 100;

/// Match-ID count used when the caller does not ask for one.
pub const DEFAULT_MATCH_COUNT: usize = 20;

struct Inner {
    client: RiotClient,
    gateway: CacheGateway,
    accounts: RequestCoordinator<Account>,
    profiles: RequestCoordinator<Summoner>,
    match_ids: RequestCoordinator<Vec<String>>,
    matches: RequestCoordinator<Match>,
    ranked: RequestCoordinator<Vec<LeagueEntry>>,
}

/// Entry point for every upstream resource.
///
/// Each lookup is deduplicated per cache key, served from the cache when
/// fresh, and otherwise fetched upstream and written back.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<Inner>,
}

impl Resolver {
    pub fn new(client: RiotClient, gateway: CacheGateway, dedup_window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                gateway,
                accounts: RequestCoordinator::new(dedup_window),
                profiles: RequestCoordinator::new(dedup_window),
                match_ids: RequestCoordinator::new(dedup_window),
                matches: RequestCoordinator::new(dedup_window),
                ranked: RequestCoordinator::new(dedup_window),
            }),
        }
    }

    pub fn gateway(&self) -> &CacheGateway {
        &self.inner.gateway
    }

    /// Riot ID to account (stable PUUID).
    pub async fn resolve_account(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, RecapError> {
        let key = CacheKey::account(region, game_name, tag_line).to_string();
        let inner = Arc::clone(&self.inner);
        let (region, game_name, tag_line) = (
            region.to_string(),
            game_name.to_string(),
            tag_line.to_string(),
        );

        self.inner
            .accounts
            .dedupe(key, move || async move {
                let gateway = &inner.gateway;
                if let Some(account) = gateway.read_account(&region, &game_name, &tag_line).await.hit() {
                    return Ok(account);
                }
                let account = inner
                    .client
                    .account_by_riot_id(&region, &game_name, &tag_line)
                    .await?;
                gateway
                    .write_account(&region, &game_name, &tag_line, &account)
                    .await;
                Ok(account)
            })
            .await
    }

    pub async fn get_profile(&self, region: &str, puuid: &str) -> Result<Summoner, RecapError> {
        let key = CacheKey::profile(region, puuid).to_string();
        let inner = Arc::clone(&self.inner);
        let (region, puuid) = (region.to_string(), puuid.to_string());

        self.inner
            .profiles
            .dedupe(key, move || async move {
                if let Some(summoner) = inner.gateway.read_profile(&region, &puuid).await.hit() {
                    return Ok(summoner);
                }
                let summoner = inner.client.summoner_by_puuid(&region, &puuid).await?;
                inner.gateway.write_profile(&region, &summoner).await;
                Ok(summoner)
            })
            .await
    }

    /// The player's newest `count` match IDs, newest first.
    pub async fn list_match_ids(
        &self,
        region: &str,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, RecapError> {
        // Different counts are different upstream requests.
        let key = format!("{}:{}", CacheKey::match_ids(region, puuid), count);
        let inner = Arc::clone(&self.inner);
        let (region, puuid) = (region.to_string(), puuid.to_string());

        self.inner
            .match_ids
            .dedupe(key, move || async move {
                if let Some(ids) = inner.gateway.read_match_ids(&region, &puuid, count).await.hit() {
                    return Ok(ids);
                }
                let ids = inner.client.match_ids_by_puuid(&region, &puuid, count).await?;
                inner.gateway.write_match_ids(&region, &puuid, &ids).await;
                Ok(ids)
            })
            .await
    }

    pub async fn get_match(&self, region: &str, match_id: &str) -> Result<Match, RecapError> {
        let key = CacheKey::match_detail(region, match_id).to_string();
        let inner = Arc::clone(&self.inner);
        let (region, match_id) = (region.to_string(), match_id.to_string());

        self.inner
            .matches
            .dedupe(key, move || async move {
                if let Some(game) = inner.gateway.read_match(&region, &match_id).await.hit() {
                    return Ok(game);
                }
                let game = inner.client.match_by_id(&region, &match_id).await?;
                inner.gateway.write_match(&region, &game).await;
                Ok(game)
            })
            .await
    }

    pub async fn get_ranked_standing(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntry>, RecapError> {
        let key = CacheKey::ranked(region, summoner_id).to_string();
        let inner = Arc::clone(&self.inner);
        let (region, summoner_id) = (region.to_string(), summoner_id.to_string());

        self.inner
            .ranked
            .dedupe(key, move || async move {
                if let Some(entries) = inner.gateway.read_ranked(&region, &summoner_id).await.hit() {
                    return Ok(entries);
                }
                let entries = inner.client.league_entries(&region, &summoner_id).await?;
                inner
                    .gateway
                    .write_ranked(&region, &summoner_id, &entries)
                    .await;
                Ok(entries)
            })
            .await
    }

    /// Account lookup followed by the profile for its PUUID.
    pub async fn get_summoner_by_riot_id(
        &self,
        region: &str,
        riot_id: &RiotId,
    ) -> Result<Summoner, RecapError> {
        let account = self
            .resolve_account(region, &riot_id.game_name, &riot_id.tag_line)
            .await?;
        self.get_profile(region, &account.puuid).await
    }

    /// Accepts `Name#TAG`, or a bare name with the platform's default tag.
    pub async fn get_summoner_by_name(&self, region: &str, name: &str) -> Result<Summoner, RecapError> {
        let riot_id = RiotId::parse(name, region);
        debug!(input = name, riot_id = %riot_id, "parsed riot id");
        self.get_summoner_by_riot_id(region, &riot_id).await
    }

    /// Details for the newest `count` matches, in list order.
    pub async fn list_recent_matches(
        &self,
        region: &str,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<Match>, RecapError> {
        let ids = self.list_match_ids(region, puuid, count).await?;
        try_join_all(ids.iter().map(|id| self.get_match(region, id))).await
    }

    /// Matches played within `[start, end]`.
    ///
    /// Walks at most [`MAX_MATCH_FETCH`] IDs and stops at the first match
    /// older than `start`. This relies on upstream returning IDs newest
    /// first, which is not checked here.
    pub async fn matches_in_date_range(
        &self,
        region: &str,
        puuid: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Match>, RecapError> {
        let ids = self.list_match_ids(region, puuid, MAX_MATCH_FETCH).await?;
        let mut matches = Vec::new();

        for (fetched, id) in ids.iter().enumerate() {
            let game = self.get_match(region, id).await?;
            let Some(played_at) = game.played_at() else {
                debug!(match_id = %id, "match has no valid timestamp, skipping");
                continue;
            };

            if played_at < start {
                debug!(
                    match_id = %id,
                    fetched = fetched + 1,
                    listed = ids.len(),
                    "reached matches before range start"
                );
                break;
            }
            if played_at <= end {
                matches.push(game);
            }
        }

        Ok(matches)
    }
}
