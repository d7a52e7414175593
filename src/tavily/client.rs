use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{RawHit, SearchRequestBody, SearchResponseBody};
use crate::search::request::ProviderOptions;

const API_BASE: &str = "https://api.tavily.com";
const PLACEHOLDER_KEY: &str = "your-api-key-here";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("TAVILY_API_KEY not set. Get one at https://app.tavily.com")]
    ApiKeyNotSet,

    #[error("request timed out")]
    Timeout,

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Malformed(String),
}

/// Abstraction over the external web search service.
/// Implemented by `TavilyClient` for production; mock implementations used in tests.
pub trait SearchProvider {
    async fn search(&self, query: &str, options: &ProviderOptions)
    -> Result<Vec<RawHit>, ProviderError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl TavilyClient {
    pub fn from_env(http: Client) -> Result<Self, ProviderError> {
        let api_key = env::var("TAVILY_API_KEY").map_err(|_| ProviderError::ApiKeyNotSet)?;
        Self::with_key(http, &api_key)
    }

    fn with_key(http: Client, api_key: &str) -> Result<Self, ProviderError> {
        let api_key = api_key.trim();
        if api_key.is_empty() || api_key == PLACEHOLDER_KEY {
            return Err(ProviderError::ApiKeyNotSet);
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.to_string()),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }

    async fn post_search(
        &self,
        query: &str,
        options: &ProviderOptions,
    ) -> Result<Vec<RawHit>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let body = SearchRequestBody {
            query,
            search_depth: options.search_depth,
            include_domains: &options.include_domains,
            max_results: options.max_results,
            start_date: options.start_date.map(|d| d.to_string()),
            end_date: options.end_date.map(|d| d.to_string()),
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Tavily API rate limited");
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text);
            warn!(status = %status, "Tavily API error");
            return Err(ProviderError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(classify_transport)?;
        let parsed: SearchResponseBody =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        debug!(hits = parsed.results.len(), "tavily search complete");
        Ok(parsed.results)
    }
}

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        options: &ProviderOptions,
    ) -> Result<Vec<RawHit>, ProviderError> {
        let mut last_err = None;
        for attempt in 0..MAX_RETRIES {
            match self.post_search(query, options).await {
                Ok(hits) => return Ok(hits),
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        let delay_ms = jittered_backoff(attempt);
                        debug!(
                            attempt = attempt + 1,
                            delay_ms, "retrying after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(ProviderError::RateLimited))
    }
}

fn classify_transport(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e)
    }
}

fn is_retriable(e: &ProviderError) -> bool {
    matches!(
        e,
        ProviderError::RateLimited
            | ProviderError::Api {
                code: 500..=599,
                ..
            }
    )
}

/// Equal jitter backoff: base/2 + rand(0, base/2).
fn jittered_backoff(attempt: u32) -> u64 {
    let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let half = base / 2;
    half + fastrand::u64(..half.max(1))
}

/// Tavily reports errors as `{"detail": {"error": "..."}}`; older responses use `{"detail": "..."}`.
fn extract_error_message(body: &str) -> String {
    let value = serde_json::from_str::<serde_json::Value>(body).ok();
    value
        .as_ref()
        .and_then(|v| {
            v["detail"]["error"]
                .as_str()
                .or_else(|| v["detail"].as_str())
                .or_else(|| v["message"].as_str())
        })
        .map(String::from)
        .unwrap_or_else(|| body.chars().take(200).collect())
}
