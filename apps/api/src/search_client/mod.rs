//! Web search client — best-effort snippet retrieval via the Brave Search API.
//!
//! Search context is an enrichment, never a hard dependency: every failure
//! mode (missing credential, transport error, non-2xx, malformed body)
//! degrades to an empty result list. This client never returns an error to
//! its caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
/// The search call must never stall a generation request.
const SEARCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// One web-search snippet. Only results with both fields non-empty are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub description: String,
}

/// Best-effort search provider. Implementations must degrade to an empty
/// list rather than fail — callers treat "no context" as a valid state.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Vec<SearchResult>;
}

/// Brave Search API client. Constructed once at startup and shared via state.
///
/// The credential is optional: a `None` key puts the client in silent
/// no-search mode (no network calls at all).
pub struct BraveSearchClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl BraveSearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(SEARCH_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl SearchProvider for BraveSearchClient {
    async fn search(&self, query: &str, count: usize) -> Vec<SearchResult> {
        let Some(api_key) = &self.api_key else {
            debug!("search credential not configured; skipping web search");
            return Vec::new();
        };

        let count_param = count.to_string();
        let response = self
            .client
            .get(BRAVE_SEARCH_URL)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .query(&[("q", query), ("count", count_param.as_str())])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("web search request failed for query {query:?}: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "web search returned status {} for query {query:?}",
                response.status()
            );
            return Vec::new();
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("web search response body was not valid JSON: {e}");
                return Vec::new();
            }
        };

        let results = parse_search_results(&body, count);
        debug!("web search returned {} snippet(s) for {query:?}", results.len());
        results
    }
}

/// Pulls usable snippets out of a Brave response body.
///
/// Brave nests results under `web.results`; a missing field means an empty
/// list, not an error. Results lacking a title or description are dropped
/// before the list is truncated to `count`.
fn parse_search_results(body: &Value, count: usize) -> Vec<SearchResult> {
    let Some(results) = body.pointer("/web/results").and_then(Value::as_array) else {
        warn!("web search response missing 'web.results' field");
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|r| {
            let title = r.get("title")?.as_str()?;
            let description = r.get("description")?.as_str()?;
            if title.is_empty() || description.is_empty() {
                return None;
            }
            Some(SearchResult {
                title: title.to_string(),
                description: description.to_string(),
            })
        })
        .take(count)
        .collect()
}
