use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Reply when no source could answer.
pub const UNKNOWN_REPLY: &str = "I don't know about that yet. Try teaching me!";

/// Which search query produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// The single query of the aggressive strategy.
    Direct,
    /// Query boosted with a recency word or the year.
    Recent,
    /// Query with "news" appended.
    News,
    /// The question as asked.
    Standard,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Direct => "🔍",
            SearchKind::Recent => "🕒 Recent",
            SearchKind::News => "📰 News",
            SearchKind::Standard => "🔍 Standard",
        }
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "search", rename_all = "snake_case")]
pub enum AnswerSource {
    Memory,
    Search(SearchKind),
    Llm,
    Unknown,
}

/// The assistant's reply to one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
    /// Wall-clock time spent answering.
    #[serde(serialize_with = "as_secs")]
    pub elapsed: Duration,
    /// Whether the answer was stored as a new fact.
    pub learned: bool,
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl Answer {
    pub fn unknown(elapsed: Duration) -> Self {
        Self {
            text: UNKNOWN_REPLY.to_string(),
            source: AnswerSource::Unknown,
            elapsed,
            learned: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.source == AnswerSource::Unknown
    }
}

/// The chat line shown to people, e.g. `🤖 Paris is the capital ⚡(0.004s)`.
/// Memory answers show the time with three decimals, the rest with two.
impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        match self.source {
            AnswerSource::Memory => write!(f, "🤖 {} ⚡({:.3}s)", self.text, secs),
            AnswerSource::Search(SearchKind::Direct) => {
                write!(f, "🔍 {} ⚡({:.2}s)", self.text, secs)
            }
            AnswerSource::Search(kind) => {
                write!(f, "{}: {} ⚡({:.2}s)", kind.label(), self.text, secs)
            }
            AnswerSource::Llm => write!(f, "🧠 {} ⚡({:.2}s)", self.text, secs),
            AnswerSource::Unknown => write!(f, "🤖 {} ⚡({:.2}s)", self.text, secs),
        }
    }
}
