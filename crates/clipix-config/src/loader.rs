use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::schema::ClipixConfig;

/// Starter `clipix.toml` written by `clipix init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Clipix configuration

[assistant]
# time_sensitivity = "strict"   # strict | lenient
# search_strategy = "aggressive" # aggressive | multi

[knowledge]
path = "ai_knowledge.json"
documents_dir = "documents"
# expiration_days = 30
# expiring_categories = ["sports", "news", "current", "technology", "politics"]

[search]
enabled = true
# api_key = "..."     # or env: GOOGLE_API_KEY
# engine_id = "..."   # or env: GOOGLE_SEARCH_ENGINE_ID

[llm]
# api_key = "sk-..."  # or env: DEEPSEEK_API_KEY
# model = "deepseek-chat"

[server]
listen = "127.0.0.1:5000"
# api_key = "your-secret-key"

[logging]
level = "info"
# format = "pretty"
"#;

/// Loads the Clipix configuration and applies edits to it.
pub struct ConfigLoader {
    config: Arc<RwLock<ClipixConfig>>,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > CLIPIX_CONFIG env > ./clipix.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("CLIPIX_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("clipix.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> clipix_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            Self::read_file(&config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            ClipixConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(clipix_core::ClipixError::Config(e));
            }
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    fn read_file(path: &Path) -> clipix_core::Result<ClipixConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str::<ClipixConfig>(&raw).map_err(|e| {
            clipix_core::ClipixError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> ClipixConfig {
        self.config.read().clone()
    }

    /// Path of the config file (it may not exist yet).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides from the process environment.
    pub fn apply_env_overrides(config: ClipixConfig) -> ClipixConfig {
        Self::apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides using `lookup` as the environment.
    ///
    /// API keys only fill in when the config file leaves them unset; the
    /// remaining variables always win.
    pub fn apply_overrides_from(
        mut config: ClipixConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClipixConfig {
        if config.search.api_key.is_none() {
            if let Some(v) = lookup("GOOGLE_API_KEY") {
                config.search.api_key = Some(v);
            }
        }
        if config.search.engine_id.is_none() {
            if let Some(v) = lookup("GOOGLE_SEARCH_ENGINE_ID") {
                config.search.engine_id = Some(v);
            }
        }
        if config.llm.api_key.is_none() {
            if let Some(v) = lookup("DEEPSEEK_API_KEY") {
                config.llm.api_key = Some(v);
            }
        }
        // Hosting platforms hand out the port this way.
        if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
            config.server.listen = format!("0.0.0.0:{port}");
        }
        if let Some(v) = lookup("CLIPIX_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("CLIPIX_KNOWLEDGE_PATH") {
            config.knowledge.path = PathBuf::from(v);
        }
        config
    }

    /// Reload the config from disk.
    pub fn reload(&self) -> clipix_core::Result<()> {
        if !self.config_path.exists() {
            return Err(clipix_core::ClipixError::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }
        let new_config = Self::apply_env_overrides(Self::read_file(&self.config_path)?);
        *self.config.write() = new_config;
        info!("configuration reloaded");
        Ok(())
    }

    /// Set one dot-notation key (e.g. `search.result_count`) in the config
    /// file, keeping comments and layout, then reload. The value type is
    /// inferred. Creates the file if needed. Returns the previous value.
    pub fn set_value(&self, key: &str, value: &str) -> clipix_core::Result<Option<String>> {
        self.edit(key, value, true)
    }

    /// Like [`set_value`](Self::set_value) but always writes a string, for
    /// secrets such as `llm.api_key` that may look numeric.
    pub fn set_string(&self, key: &str, value: &str) -> clipix_core::Result<Option<String>> {
        self.edit(key, value, false)
    }

    fn edit(&self, key: &str, value: &str, infer: bool) -> clipix_core::Result<Option<String>> {
        let content = if self.config_path.exists() {
            std::fs::read_to_string(&self.config_path).map_err(|e| {
                clipix_core::ClipixError::Config(format!(
                    "Cannot read {}: {}",
                    self.config_path.display(),
                    e
                ))
            })?
        } else {
            String::new()
        };

        let (doc, old) = set_toml_value(&content, key, value, infer)?;

        std::fs::write(&self.config_path, doc).map_err(|e| {
            clipix_core::ClipixError::Config(format!(
                "Cannot write {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        self.reload()?;
        Ok(old)
    }
}

/// Set a dotted key inside a TOML document. With `infer`, "true"/"false" and
/// numbers are written as such; otherwise the value is always a string.
/// Returns the edited document and the previous value rendered as text.
pub fn set_toml_value(
    content: &str,
    key: &str,
    value: &str,
    infer: bool,
) -> clipix_core::Result<(String, Option<String>)> {
    let mut doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        clipix_core::ClipixError::Config(format!("Invalid TOML: {}", e))
    })?;

    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf_key, table_parts)) = parts.split_last() else {
        return Err(clipix_core::ClipixError::Config("Empty key".into()));
    };

    let mut table: &mut toml_edit::Item = doc.as_item_mut();
    for part in table_parts {
        if table.get(part).is_none() {
            table[part] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        table = &mut table[part];
    }

    let toml_value = if !infer {
        toml_edit::value(value)
    } else if value == "true" {
        toml_edit::value(true)
    } else if value == "false" {
        toml_edit::value(false)
    } else if let Ok(i) = value.parse::<i64>() {
        toml_edit::value(i)
    } else if let Ok(f) = value.parse::<f64>() {
        toml_edit::value(f)
    } else {
        toml_edit::value(value)
    };

    let old_value = table
        .get(leaf_key)
        .map(|v| v.to_string().trim().to_string());
    table[*leaf_key] = toml_value;

    Ok((doc.to_string(), old_value))
}
