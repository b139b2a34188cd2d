use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use clipix_core::{ClipixError, DEFAULT_CATEGORY, Stats, TeachOutcome};

use crate::index::{FactFilter, MemoryIndex, MemoryMatch};
use crate::knowledge::{ExpirationPolicy, KnowledgeBase, preview};

/// On-disk layout of the knowledge file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    knowledge_base: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    fact_timestamps: BTreeMap<String, String>,
    /// Informational only; never read back.
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

/// Parse a stored timestamp. Older files wrote naive local times without an
/// offset; those are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The knowledge base bound to its JSON file, with a memory index kept in
/// step with every change.
pub struct FactStore {
    path: PathBuf,
    knowledge: KnowledgeBase,
    index: MemoryIndex,
}

impl FactStore {
    /// Open the store at `path`, dropping expired facts.
    ///
    /// A missing file gives an empty store. An unreadable or malformed file
    /// is logged and also gives an empty store; it is overwritten on the
    /// next save.
    pub fn open(path: impl Into<PathBuf>, policy: &ExpirationPolicy) -> Self {
        Self::open_at(path, policy, Utc::now())
    }

    /// [`open`](Self::open) with an explicit clock.
    pub fn open_at(path: impl Into<PathBuf>, policy: &ExpirationPolicy, now: DateTime<Utc>) -> Self {
        let path = path.into();
        let mut knowledge = match Self::read(&path) {
            Ok(Some(kb)) => kb,
            Ok(None) => {
                info!(path = %path.display(), "no knowledge file yet, starting empty");
                KnowledgeBase::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load knowledge, starting empty");
                KnowledgeBase::new()
            }
        };

        knowledge.migrate_legacy_timestamps();
        let expired = knowledge.prune_expired(policy, now);

        let store = Self {
            index: MemoryIndex::build(&knowledge),
            path,
            knowledge,
        };
        info!(
            facts = store.knowledge.total_facts(),
            topics = store.knowledge.total_topics(),
            expired = expired.len(),
            "knowledge loaded"
        );
        store
    }

    fn read(path: &Path) -> clipix_core::Result<Option<KnowledgeBase>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&raw)?;

        let mut timestamps = BTreeMap::new();
        for (key, value) in file.fact_timestamps {
            match parse_timestamp(&value) {
                Some(at) => {
                    timestamps.insert(key, at);
                }
                None => debug!(key = %key, value = %value, "skipping unparseable timestamp"),
            }
        }
        Ok(Some(KnowledgeBase::from_parts(file.knowledge_base, timestamps)))
    }

    /// Write the whole store to disk.
    ///
    /// The JSON goes to a sibling temp file first and is then renamed over
    /// the target.
    pub fn save(&self) -> clipix_core::Result<()> {
        let file = StoreFile {
            knowledge_base: self.knowledge.category_map().clone(),
            fact_timestamps: self
                .knowledge
                .timestamps()
                .iter()
                .map(|(id, at)| (id.clone(), at.to_rfc3339()))
                .collect(),
            metadata: Some(serde_json::json!({
                "total_facts": self.knowledge.total_facts(),
                "total_topics": self.knowledge.total_topics(),
                "last_updated": Utc::now().to_rfc3339(),
            })),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            ClipixError::Knowledge(format!("cannot write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            ClipixError::Knowledge(format!("cannot replace {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), facts = self.knowledge.total_facts(), "knowledge saved");
        Ok(())
    }

    /// Add a fact without saving. The index is rebuilt.
    pub fn insert(&mut self, category: &str, fact: &str) {
        self.insert_at(category, fact, Utc::now());
    }

    pub fn insert_at(&mut self, category: &str, fact: &str, now: DateTime<Utc>) {
        self.knowledge.insert(category, fact, now);
        self.index = MemoryIndex::build(&self.knowledge);
    }

    /// Add many facts under one category with a single index rebuild.
    pub fn insert_many<'a>(&mut self, category: &str, facts: impl IntoIterator<Item = &'a str>) -> usize {
        let now = Utc::now();
        let mut added = 0;
        for fact in facts {
            self.knowledge.insert(category, fact, now);
            added += 1;
        }
        if added > 0 {
            self.index = MemoryIndex::build(&self.knowledge);
        }
        added
    }

    /// Store a fact supplied by a person and persist.
    ///
    /// Surrounding whitespace is trimmed; an empty category means
    /// `general`, an empty fact is rejected.
    pub fn teach(&mut self, category: &str, fact: &str) -> clipix_core::Result<TeachOutcome> {
        let fact = fact.trim();
        if fact.is_empty() {
            return Err(ClipixError::InvalidFact("No fact provided".into()));
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };

        self.insert(category, fact);
        self.save()?;
        info!(category = %category, fact = %preview(fact), "learned fact");

        Ok(TeachOutcome {
            category: category.to_string(),
            fact: fact.to_string(),
            total_facts: self.knowledge.total_facts(),
        })
    }

    /// Store an answer from an outside source when its length is strictly
    /// between `min_chars` and `max_chars`, and persist. Returns whether it
    /// was stored.
    pub fn learn(
        &mut self,
        category: &str,
        answer: &str,
        min_chars: usize,
        max_chars: usize,
    ) -> clipix_core::Result<bool> {
        let len = answer.chars().count();
        if len <= min_chars || len >= max_chars {
            debug!(len, "answer not learned, outside length bounds");
            return Ok(false);
        }
        self.insert(category, answer);
        self.save()?;
        info!(category = %category, fact = %preview(answer), "learned");
        Ok(true)
    }

    pub fn lookup(&self, question: &str, filter: FactFilter) -> Option<MemoryMatch> {
        self.index.lookup(question, filter)
    }

    /// Fact counts; source availability is filled in by the caller.
    pub fn stats(&self) -> Stats {
        Stats {
            total_facts: self.knowledge.total_facts(),
            topics: self.knowledge.topic_counts(),
            search_enabled: false,
            llm_enabled: false,
        }
    }

    pub fn total_facts(&self) -> usize {
        self.knowledge.total_facts()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn index(&self) -> &MemoryIndex {
        &self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
