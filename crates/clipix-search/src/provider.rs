use async_trait::async_trait;
use clipix_core::Result;
use serde::{Deserialize, Serialize};

/// A query sent to a search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Number of results wanted.
    pub count: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, count: u32) -> Self {
        Self {
            query: query.into(),
            count,
        }
    }
}

/// One web result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: String::new(),
        }
    }

    /// The text the assistant answers with: `"{title}: {snippet}"`.
    pub fn answer_text(&self) -> String {
        format!("{}: {}", self.title, self.snippet)
    }
}

/// Trait implemented by each web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Human-readable name, e.g. "google".
    fn name(&self) -> &str;

    /// Run a query. An empty list means nothing was found.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;
}
