//! Building web search queries from a question.

use clipix_config::SearchStrategy;
use clipix_memory::classify::needs_current_info;

use crate::answer::SearchKind;

/// One query to try, in order, until a search returns results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub kind: SearchKind,
    pub query: String,
}

/// `"{question} {year} latest news update today"`.
pub fn aggressive_query(question: &str, year: i32) -> String {
    format!("{question} {year} latest news update today")
}

/// Append one recency booster to questions that want current information:
/// "latest" for today/now/current, "news" for news/breaking, else the year.
/// Other questions are returned unchanged.
pub fn recency_query(question: &str, year: i32) -> String {
    if !needs_current_info(question) {
        return question.to_string();
    }
    let lower = question.to_lowercase();
    let booster = if ["today", "now", "current"].iter().any(|w| lower.contains(w)) {
        "latest".to_string()
    } else if ["news", "breaking"].iter().any(|w| lower.contains(w)) {
        "news".to_string()
    } else {
        year.to_string()
    };
    format!("{question} {booster}")
}

/// The queries to run for a question under `strategy`.
///
/// `time_sensitive` only matters to the aggressive strategy. The multi
/// strategy never repeats a query it has already planned.
pub fn plan(strategy: SearchStrategy, question: &str, time_sensitive: bool, year: i32) -> Vec<SearchAttempt> {
    match strategy {
        SearchStrategy::Aggressive => {
            let query = if time_sensitive {
                aggressive_query(question, year)
            } else {
                question.to_string()
            };
            vec![SearchAttempt {
                kind: SearchKind::Direct,
                query,
            }]
        }
        SearchStrategy::Multi => {
            let mut attempts: Vec<SearchAttempt> = Vec::new();
            let mut push = |kind, query: String| {
                if attempts.iter().all(|a| a.query != query) {
                    attempts.push(SearchAttempt { kind, query });
                }
            };
            push(SearchKind::Recent, recency_query(question, year));
            if needs_current_info(question) {
                push(SearchKind::News, format!("{question} news"));
            }
            push(SearchKind::Standard, question.to_string());
            attempts
        }
    }
}
