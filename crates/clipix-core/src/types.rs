use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category used when nothing more specific applies.
pub const DEFAULT_CATEGORY: &str = "general";

/// Categories offered when teaching a fact by hand.
pub const TEACH_CATEGORIES: &[&str] = &[
    "programming",
    "science",
    "technology",
    "mathematics",
    "history",
    "geography",
    "literature",
    "general",
];

/// Snapshot of the knowledge base and of which external sources are usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_facts: usize,
    /// Fact count per category.
    pub topics: BTreeMap<String, usize>,
    pub search_enabled: bool,
    pub llm_enabled: bool,
}

impl Stats {
    pub fn total_topics(&self) -> usize {
        self.topics.len()
    }
}

/// Result of a successful teach operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachOutcome {
    pub category: String,
    pub fact: String,
    /// Facts in the whole knowledge base after the insert.
    pub total_facts: usize,
}
