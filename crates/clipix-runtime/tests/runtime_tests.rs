#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use clipix_config::{AssistantConfig, SearchStrategy, TimeSensitivity};
    use clipix_llm::MockProvider;
    use clipix_memory::{ExpirationPolicy, FactStore};
    use clipix_runtime::*;
    use clipix_search::MockSearch;
    use clipix_search::ranking::current_year;

    fn store(dir: &tempfile::TempDir) -> FactStore {
        FactStore::open(dir.path().join("kb.json"), &ExpirationPolicy::default())
    }

    fn settings(mode: TimeSensitivity, strategy: SearchStrategy) -> AssistantConfig {
        AssistantConfig {
            time_sensitivity: mode,
            search_strategy: strategy,
            ..Default::default()
        }
    }

    // ── Memory ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_memory_answer_skips_search() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new().with_hit("Paris", "should not be used"));
        let assistant =
            Assistant::new(store(&dir), AssistantConfig::default()).with_search(search.clone());
        assistant
            .teach("geography", "The capital of France is Paris, a major European city.")
            .unwrap();

        let answer = assistant.chat("What is the capital of France?").await;
        assert_eq!(answer.source, AnswerSource::Memory);
        assert_eq!(answer.text, "The capital of France is Paris, a major European city.");
        assert!(answer.to_string().starts_with("🤖 The capital of France"));
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_skips_memory_for_time_sensitive_question() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(
            MockSearch::new().with_hit("Painters", "Many consider Leonardo the greatest painter of Italy."),
        );
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_search(search.clone());
        assistant
            .teach("art", "the best painter of italy was leonardo")
            .unwrap();

        let question = "Who is the best painter of Italy";
        let answer = assistant.chat(question).await;
        assert_eq!(answer.source, AnswerSource::Search(SearchKind::Direct));
        assert!(!answer.learned);
        assert_eq!(assistant.total_facts(), 1);
        assert_eq!(
            search.queries(),
            vec![format!("{question} {} latest news update today", current_year())]
        );
    }

    #[tokio::test]
    async fn test_lenient_mode_answers_time_sensitive_question_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new());
        let assistant = Assistant::new(
            store(&dir),
            settings(TimeSensitivity::Lenient, SearchStrategy::Aggressive),
        )
        .with_search(search.clone());
        assistant
            .teach("art", "the best painter of italy was leonardo")
            .unwrap();

        let answer = assistant.chat("Who is the best painter of Italy").await;
        assert_eq!(answer.source, AnswerSource::Memory);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_ignores_dated_facts() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(store(&dir), AssistantConfig::default());
        assistant
            .teach("sports", "The stadium hosted the cup final match in 2024")
            .unwrap();

        let answer = assistant.chat("Which stadium hosted the cup final match").await;
        assert!(answer.is_unknown());
    }

    // ── Search ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_search_answer_is_learned_under_category() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new().with_hit(
            "Computer memory",
            "Memory stores data and instructions for the processor.",
        ));
        let assistant =
            Assistant::new(store(&dir), AssistantConfig::default()).with_search(search.clone());

        let answer = assistant.chat("How does computer memory work").await;
        assert_eq!(
            answer.text,
            "Computer memory: Memory stores data and instructions for the processor."
        );
        assert!(answer.learned);
        assert!(answer.to_string().starts_with("🔍 Computer memory:"));
        assert_eq!(search.queries(), vec!["How does computer memory work"]);

        let stats = assistant.stats();
        assert_eq!(stats.topics["technology"], 1);
        assert!(stats.search_enabled);
        assert!(!stats.llm_enabled);
    }

    #[tokio::test]
    async fn test_search_prefers_recent_hit() {
        let dir = tempfile::tempdir().unwrap();
        let year = current_year();
        let search = Arc::new(MockSearch::new().with_hits(vec![
            clipix_search::SearchHit::new("Old guide", "An older overview of gardening tools"),
            clipix_search::SearchHit::new(format!("{year} guide"), "Gardening tools reviewed"),
        ]));
        let assistant =
            Assistant::new(store(&dir), AssistantConfig::default()).with_search(search);

        let answer = assistant.chat("gardening tools overview").await;
        assert_eq!(answer.text, format!("{year} guide: Gardening tools reviewed"));
    }

    #[tokio::test]
    async fn test_short_answer_is_not_learned() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new().with_hit("A", "b"));
        let assistant =
            Assistant::new(store(&dir), AssistantConfig::default()).with_search(search);

        let answer = assistant.chat("Describe the ocean floor").await;
        assert_eq!(answer.text, "A: b");
        assert!(!answer.learned);
        assert_eq!(assistant.total_facts(), 0);
    }

    #[tokio::test]
    async fn test_multi_strategy_falls_through_to_news_query() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(
            MockSearch::new()
                .with_error("quota exceeded")
                .with_hit("Race", "The leader is two laps ahead of the pack."),
        );
        let assistant = Assistant::new(
            store(&dir),
            settings(TimeSensitivity::Strict, SearchStrategy::Multi),
        )
        .with_search(search.clone());

        let answer = assistant.chat("Who is leading the race today").await;
        assert_eq!(answer.source, AnswerSource::Search(SearchKind::News));
        assert!(answer.to_string().starts_with("📰 News: Race:"));
        // time-sensitive under strict mode
        assert!(!answer.learned);
        assert_eq!(
            search.queries(),
            vec![
                "Who is leading the race today latest",
                "Who is leading the race today news",
            ]
        );
    }

    #[test]
    fn test_multi_plan_without_current_info() {
        let attempts = strategy::plan(SearchStrategy::Multi, "Describe volcanoes", false, 2030);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].kind, SearchKind::Recent);
        assert_eq!(attempts[0].query, "Describe volcanoes");
    }

    #[test]
    fn test_recency_query_boosters() {
        assert_eq!(strategy::recency_query("weather now", 2030), "weather now latest");
        assert_eq!(strategy::recency_query("breaking stories", 2030), "breaking stories news");
        assert_eq!(strategy::recency_query("events this week", 2030), "events this week 2030");
        assert_eq!(strategy::recency_query("Describe volcanoes", 2030), "Describe volcanoes");
    }

    #[test]
    fn test_multi_plan_skips_duplicate_news_query() {
        let attempts = strategy::plan(SearchStrategy::Multi, "tell me the latest news", true, 2030);
        let queries: Vec<&str> = attempts.iter().map(|a| a.query.as_str()).collect();
        assert_eq!(queries, vec!["tell me the latest news news", "tell me the latest news"]);
    }

    // ── LLM fallback ───────────────────────────────────────────

    #[tokio::test]
    async fn test_search_failure_falls_back_to_llm() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new().with_error("HTTP 403"));
        let llm = Arc::new(
            MockProvider::new("mock")
                .with_response("Rayleigh scattering makes the sky look blue during the day."),
        );
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_search(search)
            .with_llm(llm.clone());

        let answer = assistant.chat("Why does the sky look blue").await;
        assert_eq!(answer.source, AnswerSource::Llm);
        assert!(answer.learned);
        assert!(answer.to_string().starts_with("🧠 Rayleigh"));

        let requests = llm.recorded_requests();
        let requests = requests.lock();
        assert_eq!(requests[0].prompt, "Why does the sky look blue");
        assert_eq!(requests[0].max_tokens, 500);
        assert_eq!(assistant.stats().topics["general"], 1);
    }

    #[tokio::test]
    async fn test_empty_search_results_fall_back_to_llm() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_search(Arc::new(MockSearch::new().with_no_results()))
            .with_llm(Arc::new(MockProvider::new("mock").with_response("Short.")));

        let answer = assistant.chat("Describe the ocean floor").await;
        assert_eq!(answer.source, AnswerSource::Llm);
        assert!(!answer.learned);
    }

    #[tokio::test]
    async fn test_all_sources_fail_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_search(Arc::new(MockSearch::new().with_error("down")))
            .with_llm(Arc::new(MockProvider::new("mock").with_error("timeout")));

        let answer = assistant.chat("Describe the ocean floor").await;
        assert!(answer.is_unknown());
        assert!(
            answer
                .to_string()
                .starts_with("🤖 I don't know about that yet. Try teaching me! ⚡(")
        );
    }

    #[tokio::test]
    async fn test_empty_question_calls_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let search = Arc::new(MockSearch::new());
        let llm = Arc::new(MockProvider::new("mock"));
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_search(search.clone())
            .with_llm(llm.clone());

        assert!(assistant.chat("   ").await.is_unknown());
        assert!(search.queries().is_empty());
        assert!(llm.recorded_requests().lock().is_empty());
    }

    // ── Rendering ──────────────────────────────────────────────

    #[test]
    fn test_render_timings() {
        let memory = Answer {
            text: "x".into(),
            source: AnswerSource::Memory,
            elapsed: Duration::from_millis(4),
            learned: false,
        };
        assert_eq!(memory.to_string(), "🤖 x ⚡(0.004s)");

        let recent = Answer {
            text: "y".into(),
            source: AnswerSource::Search(SearchKind::Recent),
            elapsed: Duration::from_millis(1234),
            learned: true,
        };
        assert_eq!(recent.to_string(), "🕒 Recent: y ⚡(1.23s)");
    }

    // ── Teach / stats / training ───────────────────────────────

    #[test]
    fn test_teach_empty_fact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(store(&dir), AssistantConfig::default());
        assert!(matches!(
            assistant.teach("science", ""),
            Err(clipix_core::ClipixError::InvalidFact(_))
        ));
    }

    #[test]
    fn test_train_from_documents() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("documents");
        std::fs::create_dir_all(docs.join("science")).unwrap();
        std::fs::write(
            docs.join("science/cells.txt"),
            "Cells\n\nThe mitochondria is the part of the cell that produces most of its energy.\n",
        )
        .unwrap();

        let assistant =
            Assistant::new(store(&dir), AssistantConfig::default()).with_documents_dir(&docs);
        let report = assistant.train_from_documents().unwrap();
        assert_eq!(report.facts_added, 1);
        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].category, "science");
        assert_eq!(assistant.stats().topics["science"], 1);
        assert!(assistant.knowledge_path().exists());
    }

    #[test]
    fn test_train_without_documents_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(store(&dir), AssistantConfig::default())
            .with_documents_dir(dir.path().join("missing"));
        let report = assistant.train_from_documents().unwrap();
        assert!(report.documents.is_empty());
        assert_eq!(report.facts_added, 0);
    }

    // ── Concurrency ────────────────────────────────────────────

    #[tokio::test]
    async fn test_concurrent_learning_keeps_every_fact() {
        let dir = tempfile::tempdir().unwrap();
        let mut llm = MockProvider::new("mock");
        for i in 0..10 {
            llm = llm.with_response(&format!("Answer number {i} is long enough to be learned."));
        }
        let assistant = Arc::new(
            Assistant::new(store(&dir), AssistantConfig::default()).with_llm(Arc::new(llm)),
        );

        let mut handles = Vec::new();
        for i in 0..10 {
            let assistant = Arc::clone(&assistant);
            handles.push(tokio::spawn(async move {
                assistant.chat(&format!("tell me {i}")).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().learned);
        }

        assert_eq!(assistant.total_facts(), 10);
        let reopened = store(&dir);
        assert_eq!(reopened.total_facts(), 10);
    }

    // ── Wiring from config ─────────────────────────────────────

    #[test]
    fn test_from_config_enables_llm_only_with_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = clipix_config::ClipixConfig::default();
        config.knowledge.path = dir.path().join("kb.json");
        config.knowledge.documents_dir = dir.path().join("documents");

        for (key, enabled) in [(None, false), (Some(""), false), (Some("sk-test"), true)] {
            config.llm.api_key = key.map(str::to_string);
            let stats = Assistant::from_config(&config).stats();
            assert_eq!(stats.llm_enabled, enabled, "api_key = {key:?}");
            assert!(!stats.search_enabled);
        }
    }
}
