use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, mapped from `clipix.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipixConfig {
    pub assistant: AssistantConfig,
    pub knowledge: KnowledgeConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

// ── Assistant ──────────────────────────────────────────────────

/// How the assistant treats questions about perishable information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSensitivity {
    /// Skip memory for time-sensitive questions, ignore time-sensitive facts,
    /// and never learn answers to time-sensitive questions.
    #[default]
    Strict,
    /// Always consult memory and always learn.
    Lenient,
}

/// How web search queries are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// One query; time-sensitive questions get a year/"latest news" suffix.
    #[default]
    Aggressive,
    /// Recency-boosted query, then a news query, then the raw question.
    Multi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub time_sensitivity: TimeSensitivity,
    pub search_strategy: SearchStrategy,
    /// Answers must be strictly longer than this (in chars) to be learned.
    pub min_learn_chars: usize,
    /// Answers must be strictly shorter than this (in chars) to be learned.
    pub max_learn_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            time_sensitivity: TimeSensitivity::Strict,
            search_strategy: SearchStrategy::Aggressive,
            min_learn_chars: 30,
            max_learn_chars: 500,
        }
    }
}

// ── Knowledge ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// JSON file holding the knowledge base.
    pub path: PathBuf,
    /// Folder scanned by document training; sub-folder names are categories.
    pub documents_dir: PathBuf,
    /// Facts in expiring categories older than this are dropped on load.
    pub expiration_days: i64,
    /// Categories subject to expiration.
    pub expiring_categories: Vec<String>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ai_knowledge.json"),
            documents_dir: PathBuf::from("documents"),
            expiration_days: 30,
            expiring_categories: vec![
                "sports".into(),
                "news".into(),
                "current".into(),
                "technology".into(),
                "politics".into(),
            ],
        }
    }
}

// ── Search ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Master switch; search also needs both `api_key` and `engine_id`.
    pub enabled: bool,
    /// Google Custom Search API key.
    /// Can also be set via GOOGLE_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Programmable Search Engine id (`cx`).
    /// Can also be set via GOOGLE_SEARCH_ENGINE_ID environment variable.
    pub engine_id: Option<String>,
    pub endpoint: String,
    /// Results requested per query.
    pub result_count: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            engine_id: None,
            endpoint: "https://www.googleapis.com/customsearch/v1".into(),
            result_count: 5,
            timeout_secs: 8,
        }
    }
}

impl SearchConfig {
    /// Search is usable only when switched on and fully keyed.
    pub fn is_usable(&self) -> bool {
        self.enabled
            && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.engine_id.as_deref().is_some_and(|k| !k.is_empty())
    }
}

// ── LLM ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// DeepSeek API key. The LLM fallback is enabled only when set.
    /// Can also be set via DEEPSEEK_API_KEY environment variable.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Temperature (0.0 - 2.0).
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.deepseek.com/v1".into(),
            model: "deepseek-chat".into(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 15,
        }
    }
}

impl LlmConfig {
    pub fn is_usable(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen: String,
    /// Optional bearer token required on `/api/*`.
    pub api_key: Option<String>,
    /// Permissive CORS for the mobile client.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:5000".into(),
            api_key: None,
            cors: true,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl ClipixConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Learn bounds ───
        if self.assistant.min_learn_chars >= self.assistant.max_learn_chars {
            warnings.push(ConfigWarning {
                field: "assistant.min_learn_chars".into(),
                message: format!(
                    "min_learn_chars {} is not below max_learn_chars {}",
                    self.assistant.min_learn_chars, self.assistant.max_learn_chars
                ),
                severity: WarningSeverity::Error,
                hint: Some("Defaults are 30 and 500".into()),
            });
        }

        // ── Knowledge ───
        if self.knowledge.path.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                field: "knowledge.path".into(),
                message: "knowledge path is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'ai_knowledge.json'".into()),
            });
        }
        if self.knowledge.expiration_days <= 0 {
            warnings.push(ConfigWarning {
                field: "knowledge.expiration_days".into(),
                message: format!(
                    "expiration_days {} drops every expiring fact on load",
                    self.knowledge.expiration_days
                ),
                severity: WarningSeverity::Warning,
                hint: Some("The usual value is 30".into()),
            });
        }

        // ── Search ───
        if self.search.enabled && !self.search.is_usable() {
            warnings.push(ConfigWarning {
                field: "search".into(),
                message: "web search is enabled but api_key or engine_id is missing".into(),
                severity: WarningSeverity::Info,
                hint: Some("Run 'clipix trainer' → Configure APIs, or set GOOGLE_API_KEY and GOOGLE_SEARCH_ENGINE_ID".into()),
            });
        }
        if self.search.result_count == 0 || self.search.result_count > 10 {
            warnings.push(ConfigWarning {
                field: "search.result_count".into(),
                message: format!("result_count {} is outside 1-10", self.search.result_count),
                severity: WarningSeverity::Error,
                hint: Some("Google Custom Search returns at most 10 results per query".into()),
            });
        }

        // ── LLM ───
        if self.llm.temperature < 0.0 || self.llm.temperature > 2.0 {
            warnings.push(ConfigWarning {
                field: "llm.temperature".into(),
                message: format!("temperature {} is out of range", self.llm.temperature),
                severity: WarningSeverity::Error,
                hint: Some("Temperature must be between 0.0 and 2.0".into()),
            });
        }
        if self.llm.max_tokens == 0 {
            warnings.push(ConfigWarning {
                field: "llm.max_tokens".into(),
                message: "max_tokens is 0, so the LLM won't produce output".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 500".into()),
            });
        }

        // ── Server ───
        if self.server.listen.is_empty() {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: "listen address is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. '127.0.0.1:5000'".into()),
            });
        } else if self.server.listen.starts_with("0.0.0.0") && self.server.api_key.is_none() {
            warnings.push(ConfigWarning {
                field: "server.api_key".into(),
                message: "no API key set while server is network-accessible".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Set server.api_key to protect the teach endpoint".into()),
            });
        }

        // ── Logging ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
