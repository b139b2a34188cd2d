use std::collections::{HashMap, HashSet};

use crate::classify::is_fact_time_sensitive;
use crate::knowledge::KnowledgeBase;

/// Question words that never drive a lookup.
pub const STOP_WORDS: &[&str] = &[
    "what", "is", "the", "a", "an", "how", "why", "when", "where", "tell", "me", "about",
];

/// Minimum score (exclusive) for a fact to count as an answer.
pub const MATCH_THRESHOLD: usize = 3;

/// Which facts a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactFilter {
    /// Skip facts that look dated.
    Strict,
    /// Consider every fact.
    All,
}

/// The best fact found for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMatch {
    pub fact: String,
    pub score: usize,
}

/// Inverted index from lowercase word to the facts containing it.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    words: HashMap<String, Vec<String>>,
}

/// Words a fact is indexed under: lowercase, whitespace-split, longer than
/// three characters.
fn index_words(fact: &str) -> impl Iterator<Item = String> + '_ {
    fact.split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() > 3)
}

/// Score a fact against a question: twice the number of distinct
/// whitespace tokens they share. Both inputs are expected lowercased.
pub fn relevance(question_lower: &str, fact_lower: &str) -> usize {
    let q: HashSet<&str> = question_lower.split_whitespace().collect();
    let f: HashSet<&str> = fact_lower.split_whitespace().collect();
    q.intersection(&f).count() * 2
}

/// Words of a question worth looking up, in first-appearance order.
pub fn meaningful_words(question_lower: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    question_lower
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > 3)
        .filter(|w| seen.insert(*w))
        .collect()
}

impl MemoryIndex {
    /// Build the index from every fact in the knowledge base.
    pub fn build(kb: &KnowledgeBase) -> Self {
        let mut words: HashMap<String, Vec<String>> = HashMap::new();
        for (_, facts) in kb.iter() {
            for fact in facts {
                for word in index_words(fact) {
                    words.entry(word).or_default().push(fact.clone());
                }
            }
        }
        Self { words }
    }

    /// Number of distinct indexed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Facts indexed under `word`.
    pub fn facts_for(&self, word: &str) -> &[String] {
        self.words.get(word).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Find the most relevant fact for a question.
    ///
    /// Candidates come from the index entries of the question's meaningful
    /// words. The first fact to reach the highest score wins, and it is only
    /// returned when that score exceeds [`MATCH_THRESHOLD`].
    pub fn lookup(&self, question: &str, filter: FactFilter) -> Option<MemoryMatch> {
        let question_lower = question.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for word in meaningful_words(&question_lower) {
            for fact in self.facts_for(word) {
                if filter == FactFilter::Strict && is_fact_time_sensitive(fact) {
                    continue;
                }
                let score = relevance(&question_lower, &fact.to_lowercase());
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((fact.as_str(), score));
                }
            }
        }

        best.filter(|(_, score)| *score > MATCH_THRESHOLD)
            .map(|(fact, score)| MemoryMatch {
                fact: fact.to_string(),
                score,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_counts_distinct_shared_tokens() {
        assert_eq!(relevance("the cat the dog", "the cat sat"), 4);
        assert_eq!(relevance("nothing", "shared"), 0);
    }

    #[test]
    fn test_meaningful_words_dedup_and_filter() {
        let words = meaningful_words("tell me about rust rust and the borrow checker");
        assert_eq!(words, vec!["rust", "borrow", "checker"]);
    }
}
