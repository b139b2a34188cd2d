use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use clipix_config::{AssistantConfig, ClipixConfig, TimeSensitivity};
use clipix_core::{Stats, TeachOutcome};
use clipix_llm::{DeepSeekProvider, LlmProvider, LlmRequest};
use clipix_memory::classify::{categorize_question, is_time_sensitive_question};
use clipix_memory::{ExpirationPolicy, FactFilter, FactStore};
use clipix_search::ranking::current_year;
use clipix_search::{GoogleSearch, SearchProvider, SearchRequest, pick_most_recent};

use crate::answer::{Answer, AnswerSource, SearchKind};
use crate::strategy;

/// LLM call settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".into(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// The assistant: answers from memory, then web search, then an LLM, and
/// learns from the outside answers it accepts.
///
/// Shared behind an `Arc`. The fact store lock is never held across an
/// await, so concurrent learn events are applied one at a time.
pub struct Assistant {
    settings: AssistantConfig,
    store: RwLock<FactStore>,
    search: Option<Arc<dyn SearchProvider>>,
    search_count: u32,
    llm: Option<Arc<dyn LlmProvider>>,
    llm_settings: LlmSettings,
    documents_dir: PathBuf,
}

impl Assistant {
    /// An assistant over `store` with no external sources.
    pub fn new(store: FactStore, settings: AssistantConfig) -> Self {
        Self {
            settings,
            store: RwLock::new(store),
            search: None,
            search_count: 5,
            llm: None,
            llm_settings: LlmSettings::default(),
            documents_dir: PathBuf::from("documents"),
        }
    }

    /// Build from configuration: open the knowledge file and connect the
    /// sources whose keys are set.
    pub fn from_config(config: &ClipixConfig) -> Self {
        let policy = ExpirationPolicy {
            max_age_days: config.knowledge.expiration_days,
            categories: config.knowledge.expiring_categories.clone(),
        };
        let store = FactStore::open(&config.knowledge.path, &policy);
        let mut assistant = Self::new(store, config.assistant.clone())
            .with_documents_dir(&config.knowledge.documents_dir)
            .with_search_count(config.search.result_count);

        if config.search.is_usable() {
            if let (Some(key), Some(cx)) = (&config.search.api_key, &config.search.engine_id) {
                let google = GoogleSearch::with_timeout(key.clone(), cx.clone(), config.search.timeout_secs)
                    .with_endpoint(config.search.endpoint.clone());
                assistant = assistant.with_search(Arc::new(google));
            }
        }

        if config.llm.is_usable() {
            let key = config.llm.api_key.clone().unwrap_or_default();
            let deepseek = DeepSeekProvider::with_timeout(key, config.llm.timeout_secs)
                .with_base_url(config.llm.base_url.clone());
            assistant = assistant
                .with_llm(Arc::new(deepseek))
                .with_llm_settings(LlmSettings {
                    model: config.llm.model.clone(),
                    max_tokens: config.llm.max_tokens,
                    temperature: config.llm.temperature,
                });
        }

        info!(
            facts = assistant.total_facts(),
            search = assistant.search.is_some(),
            llm = assistant.llm.is_some(),
            "assistant ready"
        );
        assistant
    }

    pub fn with_search(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    pub fn with_search_count(mut self, count: u32) -> Self {
        self.search_count = count;
        self
    }

    pub fn with_llm(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(provider);
        self
    }

    pub fn with_llm_settings(mut self, settings: LlmSettings) -> Self {
        self.llm_settings = settings;
        self
    }

    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    fn strict(&self) -> bool {
        self.settings.time_sensitivity == TimeSensitivity::Strict
    }

    /// Answer a question.
    ///
    /// Never fails: a source that errors is logged and skipped, and when
    /// nothing answers the reply is [`UNKNOWN_REPLY`](crate::UNKNOWN_REPLY).
    pub async fn chat(&self, question: &str) -> Answer {
        let started = Instant::now();
        let question = question.trim();
        if question.is_empty() {
            return Answer::unknown(started.elapsed());
        }

        // Strict mode keeps perishable questions away from memory and
        // never files their answers.
        let sensitive = is_time_sensitive_question(question);
        let guarded = self.strict() && sensitive;

        if !guarded {
            let filter = if self.strict() {
                FactFilter::Strict
            } else {
                FactFilter::All
            };
            let hit = self.store.read().lookup(question, filter);
            if let Some(hit) = hit {
                debug!(score = hit.score, "answered from memory");
                return Answer {
                    text: hit.fact,
                    source: AnswerSource::Memory,
                    elapsed: started.elapsed(),
                    learned: false,
                };
            }
        }

        if let Some(search) = &self.search {
            if let Some((kind, text)) = self.search_web(search.as_ref(), question, sensitive).await {
                let learned = !guarded && self.learn(question, &text);
                return Answer {
                    text,
                    source: AnswerSource::Search(kind),
                    elapsed: started.elapsed(),
                    learned,
                };
            }
        }

        if let Some(llm) = &self.llm {
            let request = LlmRequest {
                model: self.llm_settings.model.clone(),
                prompt: question.to_string(),
                max_tokens: self.llm_settings.max_tokens,
                temperature: self.llm_settings.temperature,
            };
            match llm.complete(&request).await {
                Ok(resp) if !resp.text.trim().is_empty() => {
                    let text = resp.text.trim().to_string();
                    let learned = !guarded && self.learn(question, &text);
                    return Answer {
                        text,
                        source: AnswerSource::Llm,
                        elapsed: started.elapsed(),
                        learned,
                    };
                }
                Ok(_) => warn!(provider = llm.name(), "llm returned an empty answer"),
                Err(e) => warn!(provider = llm.name(), error = %e, "llm unavailable"),
            }
        }

        Answer::unknown(started.elapsed())
    }

    /// Run the planned queries in order and answer from the first that
    /// returns results, preferring the freshest-looking hit.
    async fn search_web(
        &self,
        search: &dyn SearchProvider,
        question: &str,
        sensitive: bool,
    ) -> Option<(SearchKind, String)> {
        let year = current_year();
        for attempt in strategy::plan(self.settings.search_strategy, question, sensitive, year) {
            let request = SearchRequest::new(attempt.query, self.search_count);
            match search.search(&request).await {
                Ok(hits) => match pick_most_recent(&hits, year) {
                    Some(hit) => return Some((attempt.kind, hit.answer_text())),
                    None => debug!(query = %request.query, "no search results"),
                },
                Err(e) => warn!(provider = search.name(), query = %request.query, error = %e, "search failed"),
            }
        }
        None
    }

    /// File an outside answer under the question's category. Returns
    /// whether it was stored.
    fn learn(&self, question: &str, answer: &str) -> bool {
        let category = categorize_question(question);
        let result = self.store.write().learn(
            category,
            answer,
            self.settings.min_learn_chars,
            self.settings.max_learn_chars,
        );
        match result {
            Ok(learned) => learned,
            Err(e) => {
                warn!(error = %e, "failed to persist learned fact");
                false
            }
        }
    }

    /// Store a fact supplied by a person.
    pub fn teach(&self, category: &str, fact: &str) -> clipix_core::Result<TeachOutcome> {
        self.store.write().teach(category, fact)
    }

    pub fn stats(&self) -> Stats {
        let mut stats = self.store.read().stats();
        stats.search_enabled = self.search.is_some();
        stats.llm_enabled = self.llm.is_some();
        stats
    }

    pub fn total_facts(&self) -> usize {
        self.store.read().total_facts()
    }

    pub fn knowledge_path(&self) -> PathBuf {
        self.store.read().path().to_path_buf()
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    pub(crate) fn store_mut(&self) -> parking_lot::RwLockWriteGuard<'_, FactStore> {
        self.store.write()
    }
}
