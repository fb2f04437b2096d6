//! Configuration file management for Charla.
//!
//! Reads `~/.config/charla/config.json` and layers environment overrides on
//! top. Priority: environment > config file > built-in defaults.

use charla_core::config::EngineConfig;
use charla_core::error::{ChatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the completion endpoint.
pub const ENV_ENDPOINT: &str = "CHARLA_CHAT_API_URL";
/// Overrides the request timeout, in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "CHARLA_REQUEST_TIMEOUT_SECS";

/// Returns the path to the configuration file: ~/.config/charla/config.json
pub fn config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| ChatError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("charla").join("config.json"))
}

/// Loads the configuration from the default location and the process
/// environment, then validates it.
pub fn load_config() -> Result<EngineConfig> {
    let path = config_path()?;
    let mut config = load_config_file(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Reads a config file, returning defaults when it does not exist.
pub fn load_config_file(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!("[Config] No config file at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ChatError::config(format!(
            "Failed to read configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = serde_json::from_str(&content).map_err(|e| {
        ChatError::config(format!(
            "Failed to parse configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::info!("[Config] Loaded configuration from {}", path.display());
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut EngineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
        config.endpoint = endpoint.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            ChatError::config(format!(
                "{ENV_REQUEST_TIMEOUT} must be a whole number of seconds, got '{raw}'"
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_file(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_file_values_are_used() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "endpoint": "https://api.example.com/bedrock-chat/chat",
                "default_mode": "profesor",
                "catalog": [ { "title": "Rust", "questions": ["¿Hablamos de ownership?"] } ]
            }"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.endpoint, "https://api.example.com/bedrock-chat/chat");
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(
            config.default_mode,
            charla_core::session::ConversationMode::Instructive
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ endpoint: nope").unwrap();

        assert!(load_config_file(&path).unwrap_err().is_config());
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = EngineConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_ENDPOINT, " https://override.example/chat "),
                (ENV_REQUEST_TIMEOUT, "5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://override.example/chat");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_zero_timeout_override_fails_validation() {
        let mut config = EngineConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_REQUEST_TIMEOUT, "0")])).unwrap();
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let mut config = EngineConfig::default();
        let err =
            apply_env_overrides(&mut config, env(&[(ENV_REQUEST_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.is_config());
    }
}
