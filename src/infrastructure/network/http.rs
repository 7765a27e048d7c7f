// HTTP client utilities
use crate::domain::error::RecapError;
use crate::domain::traits::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::time::Duration;

pub const RIOT_TOKEN_HEADER: &str = "X-Riot-Token";

/// Create a default HTTP client with appropriate settings
pub fn create_client(user_agent: &str) -> Result<Client, RecapError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .build()?)
}

/// [`HttpTransport`] backed by a pooled reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<HttpResponse, RecapError> {
        let response = self
            .client
            .get(url)
            .header(RIOT_TOKEN_HEADER, api_key)
            .send()
            .await
            .map_err(|e| RecapError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response
            .text()
            .await
            .map_err(|e| RecapError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// `Retry-After` as delay-seconds. HTTP-date values and delays too large
/// for a `Duration` are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
}
