//! Prometheus-compatible metrics endpoint for the Clipix server.
//!
//! Tracks request counts and where answers came from.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use clipix_runtime::{Answer, AnswerSource};

/// Global metrics registry.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total HTTP requests served.
    http_requests_total: AtomicU64,
    /// Requests rejected by API key auth.
    auth_rejections_total: AtomicU64,
    chat_messages_total: AtomicU64,
    teach_requests_total: AtomicU64,
    memory_answers_total: AtomicU64,
    search_answers_total: AtomicU64,
    llm_answers_total: AtomicU64,
    /// Questions nothing could answer.
    unanswered_total: AtomicU64,
    /// Facts added by chat learning or teaching.
    facts_learned_total: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                http_requests_total: AtomicU64::new(0),
                auth_rejections_total: AtomicU64::new(0),
                chat_messages_total: AtomicU64::new(0),
                teach_requests_total: AtomicU64::new(0),
                memory_answers_total: AtomicU64::new(0),
                search_answers_total: AtomicU64::new(0),
                llm_answers_total: AtomicU64::new(0),
                unanswered_total: AtomicU64::new(0),
                facts_learned_total: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn inc_http_requests(&self) {
        self.inner
            .http_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_auth_rejections(&self) {
        self.inner
            .auth_rejections_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_chat_messages(&self) {
        self.inner
            .chat_messages_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_teach_requests(&self) {
        self.inner
            .teach_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_facts_learned(&self) {
        self.inner
            .facts_learned_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Count an answer by its source, and the fact it taught if any.
    pub fn record_answer(&self, answer: &Answer) {
        let counter = match answer.source {
            AnswerSource::Memory => &self.inner.memory_answers_total,
            AnswerSource::Search(_) => &self.inner.search_answers_total,
            AnswerSource::Llm => &self.inner.llm_answers_total,
            AnswerSource::Unknown => &self.inner.unanswered_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if answer.learned {
            self.inc_facts_learned();
        }
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn render_prometheus(&self, facts: usize) -> String {
        let m = &self.inner;
        let uptime = m.started_at.elapsed().as_secs();

        format!(
            r#"# HELP clipix_uptime_seconds Time since the server started.
# TYPE clipix_uptime_seconds gauge
clipix_uptime_seconds {}

# HELP clipix_facts Facts currently in the knowledge base.
# TYPE clipix_facts gauge
clipix_facts {}

# HELP clipix_http_requests_total Total HTTP requests served.
# TYPE clipix_http_requests_total counter
clipix_http_requests_total {}

# HELP clipix_auth_rejections_total Requests rejected for a missing or wrong API key.
# TYPE clipix_auth_rejections_total counter
clipix_auth_rejections_total {}

# HELP clipix_chat_messages_total Total chat messages processed.
# TYPE clipix_chat_messages_total counter
clipix_chat_messages_total {}

# HELP clipix_teach_requests_total Total teach requests.
# TYPE clipix_teach_requests_total counter
clipix_teach_requests_total {}

# HELP clipix_memory_answers_total Answers served from memory.
# TYPE clipix_memory_answers_total counter
clipix_memory_answers_total {}

# HELP clipix_search_answers_total Answers served from web search.
# TYPE clipix_search_answers_total counter
clipix_search_answers_total {}

# HELP clipix_llm_answers_total Answers served by the LLM.
# TYPE clipix_llm_answers_total counter
clipix_llm_answers_total {}

# HELP clipix_unanswered_total Questions no source could answer.
# TYPE clipix_unanswered_total counter
clipix_unanswered_total {}

# HELP clipix_facts_learned_total Facts added through chat or teaching.
# TYPE clipix_facts_learned_total counter
clipix_facts_learned_total {}
"#,
            uptime,
            facts,
            m.http_requests_total.load(Ordering::Relaxed),
            m.auth_rejections_total.load(Ordering::Relaxed),
            m.chat_messages_total.load(Ordering::Relaxed),
            m.teach_requests_total.load(Ordering::Relaxed),
            m.memory_answers_total.load(Ordering::Relaxed),
            m.search_answers_total.load(Ordering::Relaxed),
            m.llm_answers_total.load(Ordering::Relaxed),
            m.unanswered_total.load(Ordering::Relaxed),
            m.facts_learned_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
