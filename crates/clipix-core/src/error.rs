use thiserror::Error;

/// Unified error type for every Clipix crate.
#[derive(Error, Debug)]
pub enum ClipixError {
    // ── Knowledge errors ───────────────────────────────────────
    #[error("knowledge store error: {0}")]
    Knowledge(String),

    #[error("invalid fact: {0}")]
    InvalidFact(String),

    #[error("ingest failed: {path}: {reason}")]
    Ingest { path: String, reason: String },

    // ── External source errors ─────────────────────────────────
    #[error("search provider error: {0}")]
    Search(String),

    #[error("llm provider error: {0}")]
    Llm(String),

    #[error("{service} timed out after {secs}s")]
    Timeout { service: String, secs: u64 },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClipixError>;
