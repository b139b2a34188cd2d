//! Preferring fresh results.

use chrono::{Datelike, Utc};

use crate::provider::SearchHit;

/// The calendar year used for recency boosts.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Recency score of a hit: +20 when `year` appears in the title or
/// snippet, plus +10 when any of `year`, the previous year, "latest" or
/// "current" does. A hit naming the current year therefore scores 30.
pub fn recency_score(hit: &SearchHit, year: i32) -> u32 {
    let title = hit.title.to_lowercase();
    let snippet = hit.snippet.to_lowercase();
    let mentions = |term: &str| title.contains(term) || snippet.contains(term);

    let mut score = 0;
    let (this, previous) = (year.to_string(), (year - 1).to_string());
    if mentions(&this) {
        score += 20;
    }
    if [this.as_str(), previous.as_str(), "latest", "current"]
        .iter()
        .any(|term| mentions(term))
    {
        score += 10;
    }
    score
}

/// The hit with the highest recency score; among equals the earliest one.
pub fn pick_most_recent(hits: &[SearchHit], year: i32) -> Option<&SearchHit> {
    let mut best: Option<(&SearchHit, u32)> = None;
    for hit in hits {
        let score = recency_score(hit, year);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((hit, score));
        }
    }
    best.map(|(hit, _)| hit)
}
