use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Stable identifier of a fact's content within its category.
pub type FactId = String;

/// Compute the id under which a fact's timestamp is stored: the hex BLAKE3
/// digest of `category`, a newline, and the fact text.
///
/// Identical text in the same category maps to the same id.
pub fn fact_id(category: &str, fact: &str) -> FactId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(category.as_bytes());
    hasher.update(b"\n");
    hasher.update(fact.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Key format used by older knowledge files: category, underscore, and the
/// first 50 characters of the fact.
pub fn legacy_key(category: &str, fact: &str) -> String {
    let prefix: String = fact.chars().take(50).collect();
    format!("{category}_{prefix}")
}

/// Whether `key` has the shape of a [`fact_id`]: 64 lowercase hex digits.
fn is_fact_id(key: &str) -> bool {
    key.len() == 64 && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Which facts are dropped for age, and how old they must be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// Facts whose age in whole days is at least this are expired.
    pub max_age_days: i64,
    /// Only these categories ever expire.
    pub categories: Vec<String>,
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            max_age_days: 30,
            categories: ["sports", "news", "current", "technology", "politics"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// A fact removed by [`KnowledgeBase::prune_expired`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredFact {
    pub category: String,
    pub fact: String,
    pub added_at: DateTime<Utc>,
}

/// Categorized facts plus the time each one was added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    facts: BTreeMap<String, Vec<String>>,
    timestamps: BTreeMap<FactId, DateTime<Utc>>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw parts, e.g. a deserialized knowledge file.
    pub fn from_parts(
        facts: BTreeMap<String, Vec<String>>,
        timestamps: BTreeMap<FactId, DateTime<Utc>>,
    ) -> Self {
        Self { facts, timestamps }
    }

    /// Append a fact to a category and stamp it with `now`.
    /// Duplicates are kept.
    pub fn insert(&mut self, category: &str, fact: &str, now: DateTime<Utc>) {
        self.facts
            .entry(category.to_string())
            .or_default()
            .push(fact.to_string());
        self.timestamps.insert(fact_id(category, fact), now);
    }

    /// Facts in a category, in insertion order.
    pub fn facts(&self, category: &str) -> &[String] {
        self.facts
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate `(category, facts)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.facts.iter().map(|(c, f)| (c.as_str(), f.as_slice()))
    }

    pub fn categories(&self) -> Vec<&str> {
        self.facts.keys().map(|s| s.as_str()).collect()
    }

    pub fn total_facts(&self) -> usize {
        self.facts.values().map(|v| v.len()).sum()
    }

    /// Number of categories, including ones emptied by expiration.
    pub fn total_topics(&self) -> usize {
        self.facts.len()
    }

    pub fn topic_counts(&self) -> BTreeMap<String, usize> {
        self.facts
            .iter()
            .map(|(c, f)| (c.clone(), f.len()))
            .collect()
    }

    /// When a fact was added, if known.
    pub fn timestamp(&self, category: &str, fact: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(&fact_id(category, fact)).copied()
    }

    pub fn category_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.facts
    }

    pub fn timestamps(&self) -> &BTreeMap<FactId, DateTime<Utc>> {
        &self.timestamps
    }

    /// Re-key timestamps stored under the old `category_prefix` format to
    /// content ids. Returns how many were migrated.
    ///
    /// Legacy keys are shared by every fact with the same 50-char prefix, so
    /// each such fact inherits the one stored time. Legacy keys left over
    /// afterwards belong to facts that are gone and are dropped.
    pub fn migrate_legacy_timestamps(&mut self) -> usize {
        let mut migrated = Vec::new();
        for (category, facts) in &self.facts {
            for fact in facts {
                let id = fact_id(category, fact);
                if self.timestamps.contains_key(&id) {
                    continue;
                }
                if let Some(at) = self.timestamps.get(&legacy_key(category, fact)) {
                    migrated.push((id, *at));
                }
            }
        }
        let count = migrated.len();
        self.timestamps.extend(migrated);
        let before = self.timestamps.len();
        self.timestamps.retain(|key, _| is_fact_id(key));
        let dropped = before - self.timestamps.len();
        if dropped > 0 {
            info!(migrated = count, dropped, "migrated legacy fact timestamps");
        }
        count
    }

    /// Drop facts in the policy's categories that are at least
    /// `max_age_days` old at `now`.
    ///
    /// Facts without a timestamp are kept and stamped with `now`. Facts in
    /// other categories are never touched.
    pub fn prune_expired(&mut self, policy: &ExpirationPolicy, now: DateTime<Utc>) -> Vec<ExpiredFact> {
        let mut expired = Vec::new();

        for category in &policy.categories {
            let Some(facts) = self.facts.get_mut(category) else {
                continue;
            };

            let mut kept = Vec::with_capacity(facts.len());
            for fact in facts.drain(..) {
                let id = fact_id(category, &fact);
                match self.timestamps.get(&id).copied() {
                    Some(added_at) if (now - added_at).num_days() >= policy.max_age_days => {
                        debug!(category = %category, fact = %preview(&fact), "removed outdated fact");
                        expired.push(ExpiredFact {
                            category: category.clone(),
                            fact,
                            added_at,
                        });
                    }
                    Some(_) => kept.push(fact),
                    None => {
                        self.timestamps.insert(id, now);
                        kept.push(fact);
                    }
                }
            }
            *facts = kept;
        }

        // A duplicate that survived keeps the shared timestamp.
        for gone in &expired {
            if !self.facts(&gone.category).contains(&gone.fact) {
                self.timestamps.remove(&fact_id(&gone.category, &gone.fact));
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "removed outdated facts");
        }
        expired
    }
}

/// First 50 characters of a fact, for log lines.
pub(crate) fn preview(fact: &str) -> String {
    fact.chars().take(50).collect()
}
