//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tft_recap::application::resolver::Resolver;
use tft_recap::domain::error::RecapError;
use tft_recap::domain::traits::{HttpResponse, HttpTransport};
use tft_recap::infrastructure::network::client::{RetryPolicy, RiotClient};
use tft_recap::infrastructure::storage::cache::CacheGateway;
use tft_recap::infrastructure::storage::db::SqliteStore;

/// Stand-in for the Riot API. Routes match on a URL substring; each route
/// replays its responses in order and repeats the last one.
#[derive(Default)]
pub struct FakeRiot {
    routes: Mutex<Vec<(String, VecDeque<(u16, String)>)>>,
    calls: Mutex<Vec<String>>,
    latency: Duration,
}

impl FakeRiot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn route(&self, pattern: &str, status: u16, body: Value) {
        let mut routes = self.routes.lock().unwrap();
        let response = (status, body.to_string());
        match routes.iter_mut().find(|(p, _)| p == pattern) {
            Some((_, queue)) => queue.push_back(response),
            None => routes.push((pattern.to_string(), VecDeque::from([response]))),
        }
    }

    /// Number of requests whose URL contains `pattern`.
    pub fn calls_to(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for FakeRiot {
    async fn get(&self, url: &str, _api_key: &str) -> Result<HttpResponse, RecapError> {
        self.calls.lock().unwrap().push(url.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut routes = self.routes.lock().unwrap();
        let response = routes
            .iter_mut()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front().unwrap_or_default()
                } else {
                    queue.front().cloned().unwrap_or_default()
                }
            });

        let (status, body) = response.unwrap_or_else(|| {
            (404, json!({"status": {"message": "Data not found", "status_code": 404}}).to_string())
        });
        Ok(HttpResponse {
            status,
            retry_after: None,
            body,
        })
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
    }
}

pub async fn resolver_with_cache(fake: Arc<FakeRiot>) -> Resolver {
    let store = SqliteStore::open_in_memory().await.unwrap();
    resolver_with_gateway(fake, CacheGateway::new(Arc::new(store)))
}

pub fn resolver_with_gateway(fake: Arc<FakeRiot>, gateway: CacheGateway) -> Resolver {
    let client = RiotClient::new(fake, "test-key".to_string(), fast_retry());
    Resolver::new(client, gateway, Duration::from_secs(30))
}

pub fn account_json(puuid: &str, game_name: &str, tag_line: &str) -> Value {
    json!({ "puuid": puuid, "gameName": game_name, "tagLine": tag_line })
}

pub fn summoner_json(puuid: &str, id: Option<&str>) -> Value {
    let mut summoner = json!({
        "puuid": puuid,
        "profileIconId": 29,
        "revisionDate": 1_700_000_000_000i64,
        "summonerLevel": 250
    });
    if let Some(id) = id {
        summoner["id"] = json!(id);
    }
    summoner
}

/// One-player match record played at `played_at_ms`.
pub fn match_json(match_id: &str, puuid: &str, played_at_ms: i64, placement: u32) -> Value {
    json!({
        "metadata": {
            "data_version": "5",
            "match_id": match_id,
            "participants": [puuid]
        },
        "info": {
            "game_datetime": played_at_ms,
            "game_length": 2100.0,
            "game_version": "Version 14.1",
            "queue_id": 1100,
            "tft_set_number": 10,
            "participants": [{
                "puuid": puuid,
                "placement": placement,
                "level": 8,
                "gold_left": 4,
                "traits": [{ "name": "Set10_KDA", "num_units": 4, "style": 2 }],
                "units": [{ "character_id": "TFT10_Akali", "itemNames": ["TFT_Item_InfinityEdge"] }]
            }]
        }
    })
}

pub fn millis(year: i32, month: u32, day: u32) -> i64 {
    use chrono::TimeZone;
    chrono::Utc
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .unwrap()
        .timestamp_millis()
}
