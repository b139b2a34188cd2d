use async_trait::async_trait;
use clipix_core::{ClipixError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::provider::*;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Programmable Search (Custom Search JSON API).
pub struct GoogleSearch {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
    timeout_secs: u64,
}

impl GoogleSearch {
    pub fn new(api_key: String, engine_id: String) -> Self {
        Self::with_timeout(api_key, engine_id, 8)
    }

    pub fn with_timeout(api_key: String, engine_id: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "http client setup failed, using per-request timeouts only");
                reqwest::Client::new()
            });
        Self {
            client,
            api_key,
            engine_id,
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_secs,
        }
    }

    /// Use a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Pull hits out of a Custom Search response body. A body without `items`
/// has no results.
pub fn parse_items(data: &serde_json::Value) -> Vec<SearchHit> {
    data["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| SearchHit {
                    title: item["title"].as_str().unwrap_or("").to_string(),
                    snippet: item["snippet"].as_str().unwrap_or("").to_string(),
                    link: item["link"].as_str().unwrap_or("").to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        info!(query = %request.query, count = request.count, "executing web search");
        let num = request.count.to_string();

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", request.query.as_str()),
                ("num", num.as_str()),
            ])
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClipixError::Timeout {
                        service: "google".into(),
                        secs: self.timeout_secs,
                    }
                } else {
                    ClipixError::Search(format!("request failed: {e}"))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClipixError::Search(format!(
                "Google Search API error ({status}): {body}"
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClipixError::Search(format!("failed to parse search results: {e}")))?;

        let hits = parse_items(&data);
        debug!(query = %request.query, results = hits.len(), "web search done");
        Ok(hits)
    }
}
