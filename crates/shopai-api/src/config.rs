//! Server configuration: optional TOML file, then environment overrides

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use shopai_rank::RecommenderConfig;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/shopai.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

// Main config structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    // address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // when set, /api/* requires a matching X-API-Key header
    #[serde(default)]
    pub api_key: Option<String>,

    // LLM timeout in seconds, overrides the engine default
    #[serde(default)]
    pub llm_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_key: None,
            llm_timeout_secs: None,
        }
    }
}

// default value helper for serde
fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

impl ServerConfig {
    /// Load from SHOPAI_CONFIG (or the default path), then apply env overrides.
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SHOPAI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = if Path::new(&path).exists() {
            load_config(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply SHOPAI_BIND_ADDR / PORT, SHOPAI_API_KEY and SHOPAI_LLM_TIMEOUT_SECS.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("SHOPAI_BIND_ADDR") {
            self.bind_addr = addr;
        } else if let Some(port) = get("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.bind_addr = format!("0.0.0.0:{}", port);
        }
        if let Some(key) = get("SHOPAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(secs) = get("SHOPAI_LLM_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) {
            self.llm_timeout_secs = Some(secs);
        }
        // empty key in the file means auth disabled
        self.api_key = self.api_key.filter(|k| !k.is_empty());
        self
    }

    /// Fold server-level overrides into the engine configuration
    pub fn apply_to(&self, mut engine: RecommenderConfig) -> RecommenderConfig {
        if let Some(secs) = self.llm_timeout_secs {
            engine.llm_timeout = Duration::from_secs(secs);
        }
        engine
    }
}

// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
bind_addr = "127.0.0.1:8080"
api_key = "secret"
llm_timeout_secs = 4
"#;
        let config: ServerConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.llm_timeout_secs, Some(4));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config("../../config/shopai.toml").unwrap();
        assert_eq!(config.llm_timeout_secs, Some(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::default().with_overrides(env(&[
            ("PORT", "7000"),
            ("SHOPAI_API_KEY", "k1"),
            ("SHOPAI_LLM_TIMEOUT_SECS", "2"),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0:7000");
        assert_eq!(config.api_key.as_deref(), Some("k1"));
        assert_eq!(config.llm_timeout_secs, Some(2));

        // explicit bind address wins over PORT
        let config = ServerConfig::default()
            .with_overrides(env(&[("PORT", "7000"), ("SHOPAI_BIND_ADDR", "127.0.0.1:9000")]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_empty_api_key_disables_auth() {
        let config = ServerConfig {
            api_key: Some(String::new()),
            ..Default::default()
        }
        .with_overrides(env(&[]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_timeout_applies_to_engine() {
        let config = ServerConfig {
            llm_timeout_secs: Some(3),
            ..Default::default()
        };
        let engine = config.apply_to(RecommenderConfig::local_only());
        assert_eq!(engine.llm_timeout, Duration::from_secs(3));
    }
}
