//! Mock search provider for deterministic testing.
//!
//! Returns queued results without making any HTTP calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::provider::*;
use clipix_core::{ClipixError, Result};

/// A mock search provider that returns pre-configured results.
///
/// # Example
/// ```
/// use clipix_search::mock::MockSearch;
/// let search = MockSearch::new()
///     .with_hit("Rust", "A language empowering everyone");
/// ```
#[derive(Default)]
pub struct MockSearch {
    responses: Mutex<VecDeque<Result<Vec<SearchHit>>>>,
    /// Every request received, for assertions in tests.
    pub requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a single hit.
    pub fn with_hit(self, title: &str, snippet: &str) -> Self {
        self.with_hits(vec![SearchHit::new(title, snippet)])
    }

    /// Queue a response with these hits.
    pub fn with_hits(self, hits: Vec<SearchHit>) -> Self {
        self.responses.lock().push_back(Ok(hits));
        self
    }

    /// Queue a response with no results.
    pub fn with_no_results(self) -> Self {
        self.with_hits(Vec::new())
    }

    /// Queue a failure.
    pub fn with_error(self, error: &str) -> Self {
        self.responses
            .lock()
            .push_back(Err(ClipixError::Search(error.to_string())));
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.query.clone()).collect()
    }

    pub fn recorded_requests(&self) -> Arc<Mutex<Vec<SearchRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.requests.lock().push(request.clone());
        // Nothing queued reads as "no results".
        self.responses.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
