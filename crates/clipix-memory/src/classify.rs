//! Keyword classifiers for questions and facts.
//!
//! All matching is a case-insensitive substring test with no stemming or
//! context, so "now" also fires on "know" and "new" on "news". A single hit
//! anywhere marks the whole text.

use clipix_core::DEFAULT_CATEGORY;

const TIME_SENSITIVE_KEYWORDS: &[&str] = &[
    "current",
    "now",
    "today",
    "recent",
    "latest",
    "new",
    "nowadays",
    "who is",
    "what is happening",
    "breaking",
    "news",
    "update",
    "coach",
    "manager",
    "president",
    "prime minister",
    "ceo",
    "score",
    "result",
    "winner",
    "election",
    "appointed",
];

const SPORTS_CLUBS: &[&str] = &[
    "tottenham",
    "spurs",
    "arsenal",
    "chelsea",
    "manchester",
    "liverpool",
    "real madrid",
    "barcelona",
    "bayern",
    "psg",
];

const TIME_SENSITIVE_FACT_INDICATORS: &[&str] = &[
    "2021",
    "2022",
    "2023",
    "2024",
    "coach",
    "manager",
    "appointed",
    "tottenham",
    "conte",
    "kane",
    "contract",
];

const CURRENT_INFO_INDICATORS: &[&str] = &[
    "current",
    "now",
    "today",
    "recent",
    "latest",
    "new",
    "nowadays",
    "2024",
    "2025",
    "this year",
    "present",
    "modern",
    "update",
    "who is",
    "what is happening",
    "breaking",
    "news",
    "yesterday",
    "last week",
    "last month",
    "this week",
    "this month",
];

/// Categories assigned to learned answers, checked in order.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "technology",
        &["computer", "programming", "software", "hardware", "code", "ai", "tech"],
    ),
    (
        "science",
        &["physics", "chemistry", "biology", "scientific", "research", "space"],
    ),
    (
        "history",
        &["history", "historical", "war", "ancient", "century", "battle"],
    ),
    (
        "mathematics",
        &["math", "calculus", "algebra", "equation", "geometry", "calculate"],
    ),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Whether a question asks about perishable information (current events,
/// office holders, scores, football clubs).
pub fn is_time_sensitive_question(text: &str) -> bool {
    let lower = text.to_lowercase();
    contains_any(&lower, TIME_SENSITIVE_KEYWORDS) || contains_any(&lower, SPORTS_CLUBS)
}

/// Whether a stored fact looks dated (explicit recent years, appointments,
/// contracts).
pub fn is_fact_time_sensitive(fact: &str) -> bool {
    contains_any(&fact.to_lowercase(), TIME_SENSITIVE_FACT_INDICATORS)
}

/// Whether a search for this question should be biased towards recent results.
pub fn needs_current_info(question: &str) -> bool {
    contains_any(&question.to_lowercase(), CURRENT_INFO_INDICATORS)
}

/// Pick the category a learned answer is filed under.
pub fn categorize_question(question: &str) -> &'static str {
    let lower = question.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_anywhere_marks_question() {
        assert!(is_time_sensitive_question("Who won the ELECTION?"));
        assert!(is_time_sensitive_question("tell me about Real Madrid"));
        // substring false positive is accepted
        assert!(is_time_sensitive_question("Do you know Rust?"));
        assert!(!is_time_sensitive_question("What is the capital of France?"));
    }

    #[test]
    fn test_categorize_order() {
        // "software" also contains "war"; technology is checked first
        assert_eq!(categorize_question("Explain software testing"), "technology");
        assert_eq!(categorize_question("Ancient Rome"), "history");
        assert_eq!(categorize_question("Solve this equation"), "mathematics");
        assert_eq!(categorize_question("Best pizza in Naples"), "general");
    }
}
