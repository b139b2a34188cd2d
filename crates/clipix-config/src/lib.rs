//! # clipix-config
//!
//! Configuration for Clipix: the `clipix.toml` schema, environment overrides,
//! validation, and in-place edits used by `clipix set` and the trainer.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    AssistantConfig, ClipixConfig, ConfigWarning, SearchStrategy, TimeSensitivity,
    WarningSeverity,
};
