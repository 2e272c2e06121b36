//! Configuration loading.
//!
//! Settings come from `config.toml`. The file is located by an explicit
//! path, else `$LAPTOP_ADVISOR_CONFIG`, else `~/.laptop-advisor/config.toml`.
//! A missing file means defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::agents::AgentRole;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "LAPTOP_ADVISOR_CONFIG";
/// Env var overriding `models.default`.
pub const MODEL_ENV: &str = "LAPTOP_ADVISOR_MODEL";
/// Env var overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "LAPTOP_ADVISOR_LOG_LEVEL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Model selection for the agent roster.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Log filtering.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model routing: a default model plus per-role overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Model used by every agent without an override.
    #[serde(default = "default_model")]
    pub default: String,

    /// Per-role overrides keyed by role name (`root`, `recommender`,
    /// `web_search`, `comparison`).
    #[serde(default)]
    pub roles: HashMap<String, String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            roles: HashMap::new(),
        }
    }
}

impl ModelsConfig {
    /// Model for `role`, falling back to the default.
    pub fn model_for(&self, role: AgentRole) -> &str {
        self.roles
            .get(role.as_str())
            .map_or(self.default.as_str(), String::as_str)
    }
}

/// Log filtering settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_owned()
}
fn default_log_level() -> String {
    "info".to_owned()
}

impl Config {
    /// Load configuration from `explicit` (or the resolved default path)
    /// and apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the home directory cannot be determined.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = resolve_config_path(explicit, env)?;
        let mut config = load_or_default(&path)?;
        config.apply_overrides(env);
        Ok(config)
    }

    /// Apply env overrides using a custom resolver (for testing).
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(model) = env(MODEL_ENV) {
            self.models.default = model;
        }
        if let Some(level) = env(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
    }
}

/// Load config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load config from a TOML file, returning defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file found, using defaults");
        return Ok(Config::default());
    }
    tracing::debug!(path = %path.display(), "loading config from file");
    load_config(path)
}

/// Pick the config file path: explicit, then env, then the config dir.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.toml"))
}

/// Resolve the default config directory (`~/.laptop-advisor/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".laptop-advisor"))
}
