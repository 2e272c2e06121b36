//! Coverage for config parsing, path resolution and env overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use laptop_advisor::agents::AgentRole;
use laptop_advisor::config::{
    config_dir, load_config, load_or_default, resolve_config_path, Config, CONFIG_PATH_ENV,
    LOG_LEVEL_ENV, MODEL_ENV,
};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn parse_minimal_config() {
    let config_parse = toml::from_str::<Config>(
        r#"
[models]
default = "gemini-2.5-pro"
"#,
    );
    let config = match config_parse {
        Ok(config) => config,
        Err(err) => panic!("minimal config should parse: {err}"),
    };
    assert_eq!(config.models.default, "gemini-2.5-pro");
    assert_eq!(config.models.model_for(AgentRole::WebSearch), "gemini-2.5-pro");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn empty_file_gives_defaults() {
    let config = toml::from_str::<Config>("").expect("empty config should parse");
    assert_eq!(config.models.default, "gemini-2.5-flash");
}

#[test]
fn load_config_reads_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[models.roles]\nroot = \"gemini-2.0-flash\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .expect("should write config");

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.models.model_for(AgentRole::Root), "gemini-2.0-flash");
    assert_eq!(config.models.model_for(AgentRole::Recommender), "gemini-2.5-flash");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn load_config_reports_invalid_toml() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[models\n").expect("should write config");

    let err = load_config(&path).expect_err("invalid TOML should fail");
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let config = load_or_default(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn env_overrides_beat_file_values() {
    let mut config = toml::from_str::<Config>(
        "[models]\ndefault = \"file-model\"\n[logging]\nlevel = \"warn\"\n",
    )
    .expect("should parse");
    config.apply_overrides(env_of(&[(MODEL_ENV, "env-model"), (LOG_LEVEL_ENV, "trace")]));
    assert_eq!(config.models.default, "env-model");
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn config_path_prefers_env_over_default_dir() {
    let path = resolve_config_path(None, env_of(&[(CONFIG_PATH_ENV, "/etc/advisor.toml")]))
        .expect("should resolve");
    assert_eq!(path, PathBuf::from("/etc/advisor.toml"));

    let fallback = resolve_config_path(None, env_of(&[])).expect("should resolve");
    let dir = config_dir().expect("config dir should resolve");
    assert_eq!(fallback, dir.join("config.toml"));
    assert!(fallback.starts_with(Path::new(&dir)));
}
