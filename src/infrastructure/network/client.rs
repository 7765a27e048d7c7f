use crate::domain::error::RecapError;
use crate::domain::model::{Account, LeagueEntry, Match, Summoner};
use crate::domain::region::regional_route;
use crate::domain::traits::{HttpResponse, HttpTransport};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded exponential backoff for 429s and transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

// Riot error body: {"status": {"message": "...", "status_code": 403}}
#[derive(Deserialize, Debug)]
struct RiotErrorBody {
    status: RiotErrorStatus,
}

#[derive(Deserialize, Debug)]
struct RiotErrorStatus {
    message: String,
}

/// Riot API client. Stateless apart from the retry counter of each call.
pub struct RiotClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    retry: RetryPolicy,
}

impl RiotClient {
    pub fn new(transport: Arc<dyn HttpTransport>, api_key: String, retry: RetryPolicy) -> Self {
        if api_key.is_empty() {
            warn!("Riot API key is not set; upstream calls will be rejected");
        }
        Self {
            transport,
            api_key,
            retry,
        }
    }

    pub async fn account_by_riot_id(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, RecapError> {
        let url = endpoint(
            regional_route(region),
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        )?;
        self.call(url.as_str()).await
    }

    pub async fn summoner_by_puuid(&self, region: &str, puuid: &str) -> Result<Summoner, RecapError> {
        let url = endpoint(
            region,
            &["tft", "summoner", "v1", "summoners", "by-puuid", puuid],
        )?;
        self.call(url.as_str()).await
    }

    pub async fn match_ids_by_puuid(
        &self,
        region: &str,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, RecapError> {
        let mut url = endpoint(
            regional_route(region),
            &["tft", "match", "v1", "matches", "by-puuid", puuid, "ids"],
        )?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());
        self.call(url.as_str()).await
    }

    pub async fn match_by_id(&self, region: &str, match_id: &str) -> Result<Match, RecapError> {
        let url = endpoint(
            regional_route(region),
            &["tft", "match", "v1", "matches", match_id],
        )?;
        self.call(url.as_str()).await
    }

    pub async fn league_entries(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntry>, RecapError> {
        let url = endpoint(
            region,
            &["tft", "league", "v1", "entries", "by-summoner", summoner_id],
        )?;
        self.call(url.as_str()).await
    }

    /// GET `url` and decode the JSON body, retrying 429s and transport
    /// failures per the retry policy. Other failures return immediately.
    pub async fn call<T: DeserializeOwned>(&self, url: &str) -> Result<T, RecapError> {
        let mut attempt: u32 = 0;
        let mut last_delay = Duration::ZERO;

        loop {
            let delay = match self.transport.get(url, &self.api_key).await {
                Ok(response) if is_success(response.status) => {
                    return Ok(serde_json::from_str(&response.body)?);
                }
                Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS.as_u16() => {
                    if attempt >= self.retry.max_retries {
                        warn!(url, attempts = attempt + 1, "rate limit retries exhausted");
                        return Err(RecapError::RateLimited {
                            attempts: attempt + 1,
                        });
                    }
                    response
                        .retry_after
                        .unwrap_or_else(|| self.retry.backoff(attempt))
                }
                Ok(response) => return Err(classify(url, response)),
                Err(e) => {
                    if attempt >= self.retry.max_retries {
                        warn!(url, attempts = attempt + 1, error = %e, "network retries exhausted");
                        return Err(e);
                    }
                    debug!(url, error = %e, "transport failure");
                    self.retry.backoff(attempt)
                }
            };

            attempt += 1;
            debug!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                previous_delay_ms = last_delay.as_millis() as u64,
                "retrying upstream call"
            );
            last_delay = delay;
            tokio::time::sleep(delay).await;
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn classify(url: &str, response: HttpResponse) -> RecapError {
    let message = serde_json::from_str::<RiotErrorBody>(&response.body)
        .map(|body| body.status.message)
        .unwrap_or_else(|_| {
            StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status")
                .to_string()
        });

    match response.status {
        404 => RecapError::NotFound(format!("{} ({})", message, url)),
        400..=499 => RecapError::UpstreamClient {
            status: response.status,
            message,
        },
        status => RecapError::UpstreamServer { status, message },
    }
}

fn endpoint(host: &str, segments: &[&str]) -> Result<Url, RecapError> {
    let mut url = Url::parse(&format!("https://{}.api.riotgames.com", host))
        .map_err(|e| RecapError::Config(format!("Invalid API host '{}': {}", host, e)))?;
    url.path_segments_mut()
        .map_err(|_| RecapError::Config(format!("Invalid API host '{}'", host)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, RecapError>>>,
        fallback: Result<HttpResponse, RecapError>,
        calls: Mutex<Vec<(Instant, String)>>,
    }

    impl ScriptedTransport {
        fn new(
            script: Vec<Result<HttpResponse, RecapError>>,
            fallback: Result<HttpResponse, RecapError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }

        fn urls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(_, u)| u.clone()).collect()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str, _api_key: &str) -> Result<HttpResponse, RecapError> {
            self.calls
                .lock()
                .unwrap()
                .push((Instant::now(), url.to_string()));
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.clone())
        }
    }

    fn response(status: u16, body: &str) -> Result<HttpResponse, RecapError> {
        Ok(HttpResponse {
            status,
            retry_after: None,
            body: body.to_string(),
        })
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }

    fn gaps(times: &[Instant]) -> Vec<Duration> {
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(50),
            "expected ~{:?}, got {:?}",
            expected,
            actual
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_429_exhausts_retry_budget() {
        let transport = ScriptedTransport::new(vec![], response(429, ""));
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let result: Result<serde_json::Value, _> = client.call("https://x/a").await;
        assert_eq!(result, Err(RecapError::RateLimited { attempts: 4 }));

        let times = transport.call_times();
        assert_eq!(times.len(), 4);
        let expected = [100, 200, 400].map(Duration::from_millis);
        for (gap, want) in gaps(&times).into_iter().zip(expected) {
            assert_close(gap, want);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_header_overrides_backoff() {
        let limited = Ok(HttpResponse {
            status: 429,
            retry_after: Some(Duration::from_secs(2)),
            body: String::new(),
        });
        let transport = ScriptedTransport::new(vec![limited], response(200, r#"["NA1_1"]"#));
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let ids: Vec<String> = client.call("https://x/ids").await.unwrap();
        assert_eq!(ids, vec!["NA1_1".to_string()]);

        let times = transport.call_times();
        assert_eq!(times.len(), 2);
        assert_close(times[1] - times[0], Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failures_retry_then_propagate() {
        let transport = ScriptedTransport::new(
            vec![],
            Err(RecapError::Network("connection reset".into())),
        );
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let result: Result<serde_json::Value, _> = client.call("https://x/a").await;
        assert_eq!(result, Err(RecapError::Network("connection reset".into())));
        assert_eq!(transport.call_times().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_recovers() {
        let transport = ScriptedTransport::new(
            vec![Err(RecapError::Network("timeout".into()))],
            response(200, r#"{"puuid":"p1"}"#),
        );
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let account: Account = client.call("https://x/a").await.unwrap();
        assert_eq!(account.puuid, "p1");
        assert_close(
            transport.call_times()[1] - transport.call_times()[0],
            Duration::from_millis(100),
        );
    }

    #[tokio::test]
    async fn test_other_statuses_fail_without_retry() {
        let transport = ScriptedTransport::new(
            vec![
                response(503, ""),
                response(403, r#"{"status":{"message":"Forbidden","status_code":403}}"#),
                response(404, ""),
            ],
            response(200, "{}"),
        );
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let server: Result<serde_json::Value, _> = client.call("https://x/a").await;
        assert!(matches!(server, Err(RecapError::UpstreamServer { status: 503, .. })));

        let forbidden: Result<serde_json::Value, _> = client.call("https://x/b").await;
        assert_eq!(
            forbidden,
            Err(RecapError::UpstreamClient {
                status: 403,
                message: "Forbidden".into()
            })
        );

        let missing: Result<serde_json::Value, _> = client.call("https://x/c").await;
        assert!(matches!(missing, Err(RecapError::NotFound(_))));

        assert_eq!(transport.call_times().len(), 3);
    }

    #[tokio::test]
    async fn test_endpoints_route_and_encode() {
        let transport = ScriptedTransport::new(vec![], response(200, "[]"));
        let client = RiotClient::new(transport.clone(), "key".into(), policy());

        let _: Vec<String> = client.match_ids_by_puuid("euw1", "p1", 20).await.unwrap();
        let _: Vec<LeagueEntry> = client.league_entries("euw1", "s1").await.unwrap();
        let _ = client.account_by_riot_id("kr", "Hide on bush", "KR1").await;

        let urls = transport.urls();
        assert_eq!(
            urls[0],
            "https://europe.api.riotgames.com/tft/match/v1/matches/by-puuid/p1/ids?count=20"
        );
        assert_eq!(
            urls[1],
            "https://euw1.api.riotgames.com/tft/league/v1/entries/by-summoner/s1"
        );
        assert_eq!(
            urls[2],
            "https://asia.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = policy();
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
    }
}
